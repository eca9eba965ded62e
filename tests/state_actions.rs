use std::sync::mpsc;

use matchday_terminal::engine::MatchPhase;
use matchday_terminal::roster::TeamSide;
use matchday_terminal::state::{AppState, Delta, GoalFormStage, Screen, apply_delta};

fn state() -> (AppState, mpsc::Receiver<Delta>) {
    let (tx, rx) = mpsc::channel();
    (AppState::new(tx), rx)
}

fn add_player(state: &mut AppState, side: TeamSide, name: &str) {
    while state.setup_side != side {
        state.toggle_setup_side();
    }
    state.name_input = name.to_string();
    state.submit_player_name();
}

fn live_state() -> (AppState, mpsc::Receiver<Delta>) {
    let (mut state, rx) = state();
    add_player(&mut state, TeamSide::A, "Ana");
    add_player(&mut state, TeamSide::A, "Beto");
    add_player(&mut state, TeamSide::B, "Caio");
    state.start_match();
    (state, rx)
}

fn engine_phase(state: &AppState) -> MatchPhase {
    state.engine.as_ref().map(|e| e.phase()).unwrap()
}

#[test]
fn setup_flow_builds_rosters_and_goes_live() {
    let (mut state, _rx) = state();
    assert_eq!(state.screen, Screen::Setup);

    add_player(&mut state, TeamSide::A, "Ana");
    add_player(&mut state, TeamSide::B, "Caio");
    assert!(state.name_input.is_empty());

    state.start_match();
    assert_eq!(state.screen, Screen::Live);
    assert_eq!(engine_phase(&state), MatchPhase::NotStarted);
}

#[test]
fn start_is_blocked_while_a_roster_is_empty() {
    let (mut state, _rx) = state();
    add_player(&mut state, TeamSide::A, "Ana");

    state.start_match();
    assert_eq!(state.screen, Screen::Setup);
    assert!(state.engine.is_none());
    assert!(
        state
            .logs
            .back()
            .is_some_and(|line| line.starts_with("[WARN]"))
    );
}

#[test]
fn rejected_name_stays_in_the_input() {
    let (mut state, _rx) = state();
    add_player(&mut state, TeamSide::A, "Ana");
    add_player(&mut state, TeamSide::A, "Ana");
    assert_eq!(state.name_input, "Ana");
    assert_eq!(state.roster.team(TeamSide::A).players.len(), 1);
}

#[test]
fn clock_ticks_route_into_the_engine() {
    let (mut state, _rx) = live_state();
    state.toggle_clock();
    assert_eq!(engine_phase(&state), MatchPhase::Running);
    assert!(state.clock_running());

    apply_delta(&mut state, Delta::ClockTick);
    apply_delta(&mut state, Delta::ClockTick);
    assert_eq!(state.engine.as_ref().unwrap().elapsed_secs(), 2);

    // Pause releases the clock resource; a straggler tick is absorbed.
    state.toggle_clock();
    assert_eq!(engine_phase(&state), MatchPhase::Paused);
    assert!(!state.clock_running());
    apply_delta(&mut state, Delta::ClockTick);
    assert_eq!(state.engine.as_ref().unwrap().elapsed_secs(), 2);

    state.end_match();
    assert_eq!(engine_phase(&state), MatchPhase::Ended);
}

#[test]
fn goal_form_walks_team_scorer_assister_stages() {
    let (mut state, _rx) = live_state();
    state.toggle_clock();
    apply_delta(&mut state, Delta::ClockTick);

    state.open_goal_form();
    let form = state.goal_form.as_ref().unwrap();
    assert_eq!(form.stage, GoalFormStage::Team);
    assert_eq!(form.second, 1);

    // Team A.
    state.goal_form_pick();
    assert_eq!(
        state.goal_form.as_ref().unwrap().stage,
        GoalFormStage::Scorer
    );
    assert_eq!(state.goal_form_options(), ["Ana", "Beto"]);

    // Scorer: Ana.
    state.goal_form_pick();
    assert_eq!(
        state.goal_form.as_ref().unwrap().stage,
        GoalFormStage::Assister
    );
    assert_eq!(state.goal_form_options()[0], "No assist");

    // Assister: Beto.
    state.goal_form_next();
    state.goal_form_next();
    state.goal_form_pick();
    let form = state.goal_form.as_ref().unwrap();
    assert_eq!(form.stage, GoalFormStage::Confirm);
    assert_eq!(form.assister.as_deref(), Some("Beto"));

    state.confirm_goal();
    assert!(state.goal_form.is_none());

    let engine = state.engine.as_ref().unwrap();
    assert_eq!(engine.score_of(TeamSide::A), 1);
    assert_eq!(engine.goals()[0].scorer, "Ana");
    assert_eq!(engine.goals()[0].assister.as_deref(), Some("Beto"));
    assert_eq!(engine.goals()[0].second, 1);
}

#[test]
fn goal_form_needs_a_running_clock() {
    let (mut state, _rx) = live_state();
    state.open_goal_form();
    assert!(state.goal_form.is_none());
    assert!(
        state
            .logs
            .back()
            .is_some_and(|line| line.starts_with("[WARN]"))
    );
}

#[test]
fn confirm_without_team_and_scorer_keeps_form_open() {
    let (mut state, _rx) = live_state();
    state.toggle_clock();
    state.open_goal_form();

    // Straight to confirm without picking anything.
    state.confirm_goal();
    assert!(state.goal_form.is_some());
    assert!(state.engine.as_ref().unwrap().goals().is_empty());
    assert!(
        state
            .logs
            .back()
            .is_some_and(|line| line.starts_with("[WARN]"))
    );

    state.end_match();
}

#[test]
fn export_is_gated_on_full_time() {
    let (mut state, _rx) = live_state();
    state.toggle_clock();
    state.export_summary();
    assert!(
        state
            .logs
            .back()
            .is_some_and(|line| line.contains("after full time"))
    );
    state.end_match();
}

#[test]
fn end_match_closes_the_goal_form() {
    let (mut state, _rx) = live_state();
    state.toggle_clock();
    state.open_goal_form();
    assert!(state.goal_form.is_some());

    state.end_match();
    assert!(state.goal_form.is_none());
    assert!(!state.clock_running());
}
