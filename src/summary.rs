use serde::{Deserialize, Serialize};

use crate::roster::{Team, TeamSide};

/// Final-state handoff for the export collaborator: the two scores, the
/// ordered goal list and both player stat tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub score_a: u32,
    pub score_b: u32,
    pub goals: Vec<GoalLine>,
    pub team_a: TeamTable,
    pub team_b: TeamTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalLine {
    pub team: TeamSide,
    pub team_label: String,
    pub scorer: String,
    pub assister: Option<String>,
    pub clock: String,
    pub second: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTable {
    pub label: String,
    pub rows: Vec<PlayerRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub name: String,
    pub goals: u32,
    pub assists: u32,
}

impl TeamTable {
    pub fn from_team(side: TeamSide, team: &Team) -> Self {
        Self {
            label: side.label().to_string(),
            rows: team
                .players
                .iter()
                .map(|player| PlayerRow {
                    name: player.name.clone(),
                    goals: player.goals,
                    assists: player.assists,
                })
                .collect(),
        }
    }
}

impl MatchReport {
    /// Plain-text rendition, shared by the summary panel and the replay
    /// runner.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Match Summary".to_string(),
            format!(
                "Final score: {} {} - {} {}",
                self.team_a.label, self.score_a, self.score_b, self.team_b.label
            ),
            String::new(),
            "Goals:".to_string(),
        ];
        if self.goals.is_empty() {
            lines.push("  (none)".to_string());
        }
        for (idx, goal) in self.goals.iter().enumerate() {
            lines.push(format!(
                "  {}. {} ({}) - {}",
                idx + 1,
                goal.scorer,
                goal.team_label,
                goal.clock
            ));
            if let Some(assister) = &goal.assister {
                lines.push(format!("     assist: {assister}"));
            }
        }
        lines.push(String::new());
        lines.push("Player stats:".to_string());
        for table in [&self.team_a, &self.team_b] {
            lines.push(format!("  {}", table.label));
            for row in &table.rows {
                lines.push(format!(
                    "    {}: {} goals, {} assists",
                    row.name, row.goals, row.assists
                ));
            }
        }
        lines
    }
}
