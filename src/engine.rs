use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::{Team, TeamSide};
use crate::summary::{GoalLine, MatchReport, TeamTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub team: TeamSide,
    pub scorer: String,
    pub assister: Option<String>,
    pub second: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClock {
    pub elapsed_secs: u32,
    pub running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    NotStarted,
    Running,
    Paused,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("match has not kicked off")]
    NotStarted,
    #[error("match is already underway")]
    AlreadyStarted,
    #[error("match has ended")]
    MatchEnded,
    #[error("goal needs a scorer")]
    IncompleteGoal,
    #[error("{0} is not on the scoring team's roster")]
    UnknownPlayer(String),
}

/// The match state: both rosters, the clock, the ordered goal log and the
/// phase machine. Every mutation goes through the methods here; rejected
/// operations leave the state untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEngine {
    team_a: Team,
    team_b: Team,
    clock: MatchClock,
    goals: Vec<GoalEvent>,
    phase: MatchPhase,
    pending_goal_second: Option<u32>,
}

impl MatchEngine {
    pub fn new(team_a: Team, team_b: Team) -> Self {
        Self {
            team_a,
            team_b,
            clock: MatchClock::default(),
            goals: Vec::new(),
            phase: MatchPhase::NotStarted,
            pending_goal_second: None,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn clock(&self) -> MatchClock {
        self.clock
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.clock.elapsed_secs
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn goals(&self) -> &[GoalEvent] {
        &self.goals
    }

    pub fn ended(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.phase {
            MatchPhase::NotStarted => {
                self.phase = MatchPhase::Running;
                self.clock.running = true;
                Ok(())
            }
            MatchPhase::Ended => Err(EngineError::MatchEnded),
            _ => Err(EngineError::AlreadyStarted),
        }
    }

    pub fn toggle_running(&mut self) -> Result<(), EngineError> {
        match self.phase {
            MatchPhase::Running => {
                self.phase = MatchPhase::Paused;
                self.clock.running = false;
                Ok(())
            }
            MatchPhase::Paused => {
                self.phase = MatchPhase::Running;
                self.clock.running = true;
                Ok(())
            }
            MatchPhase::NotStarted => Err(EngineError::NotStarted),
            MatchPhase::Ended => Err(EngineError::MatchEnded),
        }
    }

    /// One whole second of match time. Only counts while the match is
    /// running, so a tick still queued in the channel after the clock is
    /// cancelled falls through harmlessly.
    pub fn tick(&mut self) {
        if self.phase == MatchPhase::Running {
            self.clock.elapsed_secs = self.clock.elapsed_secs.saturating_add(1);
        }
    }

    /// Freezes the current clock second for the goal about to be recorded.
    /// The clock keeps advancing while the dialog is open; the goal gets
    /// the second captured here, not the one at confirm time.
    pub fn open_goal_form(&mut self) -> Result<u32, EngineError> {
        match self.phase {
            MatchPhase::Running | MatchPhase::Paused => {
                self.pending_goal_second = Some(self.clock.elapsed_secs);
                Ok(self.clock.elapsed_secs)
            }
            MatchPhase::NotStarted => Err(EngineError::NotStarted),
            MatchPhase::Ended => Err(EngineError::MatchEnded),
        }
    }

    pub fn cancel_goal_form(&mut self) {
        self.pending_goal_second = None;
    }

    /// Appends a goal and applies the stat update in one step. Validation
    /// happens before anything is touched: a rejected goal changes no
    /// field, and a pending time capture survives for a retry.
    pub fn record_goal(
        &mut self,
        side: TeamSide,
        scorer: &str,
        assister: Option<&str>,
    ) -> Result<(), EngineError> {
        match self.phase {
            MatchPhase::Running | MatchPhase::Paused => {}
            MatchPhase::NotStarted => return Err(EngineError::NotStarted),
            MatchPhase::Ended => return Err(EngineError::MatchEnded),
        }

        let scorer = scorer.trim();
        if scorer.is_empty() {
            return Err(EngineError::IncompleteGoal);
        }
        let assister = assister.map(str::trim).filter(|name| !name.is_empty());

        let team = self.team(side);
        if !team.has_player(scorer) {
            return Err(EngineError::UnknownPlayer(scorer.to_string()));
        }
        if let Some(name) = assister
            && !team.has_player(name)
        {
            return Err(EngineError::UnknownPlayer(name.to_string()));
        }

        let second = self
            .pending_goal_second
            .take()
            .unwrap_or(self.clock.elapsed_secs);
        self.goals.push(GoalEvent {
            team: side,
            scorer: scorer.to_string(),
            assister: assister.map(str::to_string),
            second,
        });

        let team = self.team_side_mut(side);
        if let Some(player) = team.player_mut(scorer) {
            player.goals += 1;
        }
        if let Some(name) = assister
            && let Some(player) = team.player_mut(name)
        {
            player.assists += 1;
        }
        Ok(())
    }

    pub fn end(&mut self) -> Result<(), EngineError> {
        match self.phase {
            MatchPhase::Running | MatchPhase::Paused => {
                self.phase = MatchPhase::Ended;
                self.clock.running = false;
                self.pending_goal_second = None;
                Ok(())
            }
            MatchPhase::NotStarted => Err(EngineError::NotStarted),
            MatchPhase::Ended => Err(EngineError::MatchEnded),
        }
    }

    pub fn score_of(&self, side: TeamSide) -> u32 {
        self.goals.iter().filter(|goal| goal.team == side).count() as u32
    }

    pub fn summary(&self) -> MatchReport {
        MatchReport {
            score_a: self.score_of(TeamSide::A),
            score_b: self.score_of(TeamSide::B),
            goals: self
                .goals
                .iter()
                .map(|goal| GoalLine {
                    team: goal.team,
                    team_label: goal.team.label().to_string(),
                    scorer: goal.scorer.clone(),
                    assister: goal.assister.clone(),
                    clock: format_clock(goal.second),
                    second: goal.second,
                })
                .collect(),
            team_a: TeamTable::from_team(TeamSide::A, &self.team_a),
            team_b: TeamTable::from_team(TeamSide::B, &self.team_b),
        }
    }

    fn team_side_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }
}

/// `MM:SS`, both fields zero-padded. Minutes are unbounded; a match left
/// running past the hour renders as "61:01", not "01:01:01".
pub fn format_clock(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
