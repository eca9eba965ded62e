use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn label(self) -> &'static str {
        match self {
            TeamSide::A => "Team A",
            TeamSide::B => "Team B",
        }
    }

    pub fn other(self) -> Self {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub goals: u32,
    pub assists: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goals: 0,
            assists: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub players: Vec<Player>,
}

impl Team {
    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|player| player.name == name)
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("player name is empty")]
    EmptyName,
    #[error("{0} is already on that team")]
    DuplicateName(String),
    #[error("both teams need at least one player")]
    EmptyRoster,
}

/// Collects the two rosters before kick-off. Players can only be appended;
/// once `build` hands the teams to the engine the rosters are frozen.
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    team_a: Team,
    team_b: Team,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, side: TeamSide, name: &str) -> Result<(), RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let team = self.team_mut(side);
        if team.has_player(name) {
            return Err(RosterError::DuplicateName(name.to_string()));
        }
        team.players.push(Player::new(name));
        Ok(())
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }

    pub fn can_start(&self) -> bool {
        !self.team_a.players.is_empty() && !self.team_b.players.is_empty()
    }

    pub fn build(self) -> Result<(Team, Team), RosterError> {
        if !self.can_start() {
            return Err(RosterError::EmptyRoster);
        }
        Ok((self.team_a, self.team_b))
    }
}
