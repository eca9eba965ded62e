use std::collections::VecDeque;
use std::mem;
use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::clock::{self, ClockHandle};
use crate::engine::{MatchEngine, MatchPhase, format_clock};
use crate::export;
use crate::roster::{RosterBuilder, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Live,
}

#[derive(Debug, Clone)]
pub enum Delta {
    ClockTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalFormStage {
    Team,
    Scorer,
    Assister,
    Confirm,
}

/// Staged goal dialog: team, then scorer, then optional assister, then an
/// explicit confirm. The frozen clock second lives in the engine; the copy
/// here is only for the dialog title.
#[derive(Debug, Clone)]
pub struct GoalForm {
    pub stage: GoalFormStage,
    pub team: Option<TeamSide>,
    pub scorer: Option<String>,
    pub assister: Option<String>,
    pub selected: usize,
    pub second: u32,
}

impl GoalForm {
    fn new(second: u32) -> Self {
        Self {
            stage: GoalFormStage::Team,
            team: None,
            scorer: None,
            assister: None,
            selected: 0,
            second,
        }
    }
}

pub struct AppState {
    pub screen: Screen,
    pub roster: RosterBuilder,
    pub setup_side: TeamSide,
    pub name_input: String,
    pub engine: Option<MatchEngine>,
    pub goal_form: Option<GoalForm>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    tx: Sender<Delta>,
    tick_period: Duration,
    clock: Option<ClockHandle>,
}

impl AppState {
    pub fn new(tx: Sender<Delta>) -> Self {
        Self {
            screen: Screen::Setup,
            roster: RosterBuilder::new(),
            setup_side: TeamSide::A,
            name_input: String::new(),
            engine: None,
            goal_form: None,
            logs: VecDeque::new(),
            help_overlay: false,
            tx,
            tick_period: clock::tick_period(),
            clock: None,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_some()
    }

    // --- setup screen -----------------------------------------------------

    pub fn toggle_setup_side(&mut self) {
        self.setup_side = self.setup_side.other();
    }

    pub fn submit_player_name(&mut self) {
        let name = mem::take(&mut self.name_input);
        match self.roster.add_player(self.setup_side, &name) {
            Ok(()) => {
                self.push_log(format!(
                    "[INFO] {} joins {}",
                    name.trim(),
                    self.setup_side.label()
                ));
            }
            Err(err) => {
                // Leave the rejected name in the input so it can be fixed.
                self.name_input = name;
                self.push_log(format!("[WARN] {err}"));
            }
        }
    }

    pub fn start_match(&mut self) {
        if self.engine.is_some() {
            return;
        }
        if !self.roster.can_start() {
            self.push_log("[WARN] Need at least one player on each team");
            return;
        }
        match mem::take(&mut self.roster).build() {
            Ok((team_a, team_b)) => {
                self.engine = Some(MatchEngine::new(team_a, team_b));
                self.screen = Screen::Live;
                self.push_log("[INFO] Rosters locked, press Space to kick off");
            }
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    // --- live screen ------------------------------------------------------

    /// Space: kick off, pause, or resume. The clock thread is acquired on
    /// entering Running and cancelled on leaving it.
    pub fn toggle_clock(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let result = match engine.phase() {
            MatchPhase::NotStarted => engine.start(),
            _ => engine.toggle_running(),
        };
        let phase = engine.phase();
        match result {
            Ok(()) => match phase {
                MatchPhase::Running => {
                    self.acquire_clock();
                    self.push_log("[INFO] Clock running");
                }
                MatchPhase::Paused => {
                    self.release_clock();
                    self.push_log("[INFO] Clock paused");
                }
                _ => {}
            },
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn open_goal_form(&mut self) {
        if self.goal_form.is_some() {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.phase() != MatchPhase::Running {
            self.push_log("[WARN] Goals are recorded while the clock runs");
            return;
        }
        match engine.open_goal_form() {
            Ok(second) => self.goal_form = Some(GoalForm::new(second)),
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn cancel_goal_form(&mut self) {
        if self.goal_form.take().is_some()
            && let Some(engine) = self.engine.as_mut()
        {
            engine.cancel_goal_form();
        }
    }

    /// Options for the goal dialog's current stage.
    pub fn goal_form_options(&self) -> Vec<String> {
        let (Some(form), Some(engine)) = (&self.goal_form, &self.engine) else {
            return Vec::new();
        };
        match form.stage {
            GoalFormStage::Team => vec![
                TeamSide::A.label().to_string(),
                TeamSide::B.label().to_string(),
            ],
            GoalFormStage::Scorer => {
                let side = form.team.unwrap_or(TeamSide::A);
                engine
                    .team(side)
                    .players
                    .iter()
                    .map(|player| player.name.clone())
                    .collect()
            }
            GoalFormStage::Assister => {
                let side = form.team.unwrap_or(TeamSide::A);
                let mut options = vec!["No assist".to_string()];
                options.extend(
                    engine
                        .team(side)
                        .players
                        .iter()
                        .map(|player| player.name.clone()),
                );
                options
            }
            GoalFormStage::Confirm => Vec::new(),
        }
    }

    pub fn goal_form_next(&mut self) {
        let len = self.goal_form_options().len();
        if let Some(form) = self.goal_form.as_mut()
            && len > 0
        {
            form.selected = (form.selected + 1).min(len - 1);
        }
    }

    pub fn goal_form_prev(&mut self) {
        if let Some(form) = self.goal_form.as_mut() {
            form.selected = form.selected.saturating_sub(1);
        }
    }

    /// Enter: picks the highlighted option and advances the stage.
    pub fn goal_form_pick(&mut self) {
        let options = self.goal_form_options();
        let Some(form) = self.goal_form.as_mut() else {
            return;
        };
        match form.stage {
            GoalFormStage::Team => {
                form.team = Some(if form.selected == 0 {
                    TeamSide::A
                } else {
                    TeamSide::B
                });
                form.stage = GoalFormStage::Scorer;
                form.selected = 0;
            }
            GoalFormStage::Scorer => {
                if let Some(name) = options.get(form.selected) {
                    form.scorer = Some(name.clone());
                    form.stage = GoalFormStage::Assister;
                    form.selected = 0;
                }
            }
            GoalFormStage::Assister => {
                form.assister = if form.selected == 0 {
                    None
                } else {
                    options.get(form.selected).cloned()
                };
                form.stage = GoalFormStage::Confirm;
            }
            GoalFormStage::Confirm => {}
        }
    }

    /// Confirm gate: a goal with no team or no scorer never reaches the
    /// engine; the dialog stays open and nothing changes. The engine
    /// re-validates on its own regardless.
    pub fn confirm_goal(&mut self) {
        let Some(form) = &self.goal_form else {
            return;
        };
        let (Some(side), Some(scorer)) = (form.team, form.scorer.clone()) else {
            self.push_log("[WARN] Pick a team and a scorer before confirming");
            return;
        };
        let assister = form.assister.clone();
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match engine.record_goal(side, &scorer, assister.as_deref()) {
            Ok(()) => {
                let second = engine.goals().last().map(|goal| goal.second).unwrap_or(0);
                self.goal_form = None;
                self.push_log(format!(
                    "[INFO] Goal: {} ({}) at {}",
                    scorer,
                    side.label(),
                    format_clock(second)
                ));
            }
            Err(err) => self.push_log(format!("[WARN] Goal not recorded: {err}")),
        }
    }

    pub fn end_match(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match engine.end() {
            Ok(()) => {
                // Cancel after end(): the phase guard absorbs any tick still
                // queued in the channel.
                self.release_clock();
                self.goal_form = None;
                self.push_log("[INFO] Full time");
            }
            Err(err) => self.push_log(format!("[WARN] {err}")),
        }
    }

    pub fn export_summary(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            self.push_log("[WARN] Nothing to export yet");
            return;
        };
        if engine.phase() != MatchPhase::Ended {
            self.push_log("[WARN] Export is available after full time");
            return;
        }
        let report = engine.summary();
        let path = export::default_export_path();
        match export::export_summary(&path, &report) {
            Ok(done) => self.push_log(format!(
                "[INFO] Exported {} goals and {} player rows to {}",
                done.goals,
                done.players,
                path.display()
            )),
            Err(err) => self.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    // --- clock resource ---------------------------------------------------

    fn acquire_clock(&mut self) {
        if self.clock.is_none() {
            self.clock = Some(clock::spawn_clock(self.tx.clone(), self.tick_period));
        }
    }

    fn release_clock(&mut self) {
        if let Some(handle) = self.clock.take() {
            handle.cancel();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::ClockTick => {
            if let Some(engine) = state.engine.as_mut() {
                engine.tick();
            }
        }
    }
}
