use matchday_terminal::engine::{EngineError, MatchEngine, MatchPhase};
use matchday_terminal::roster::{RosterBuilder, TeamSide};

fn live_engine() -> MatchEngine {
    let mut builder = RosterBuilder::new();
    builder.add_player(TeamSide::A, "Ana").unwrap();
    builder.add_player(TeamSide::A, "Beto").unwrap();
    builder.add_player(TeamSide::B, "Caio").unwrap();
    let (team_a, team_b) = builder.build().unwrap();
    let mut engine = MatchEngine::new(team_a, team_b);
    engine.start().unwrap();
    engine
}

#[test]
fn recording_updates_log_score_and_scorer_stats() {
    let mut engine = live_engine();
    for _ in 0..12 {
        engine.tick();
    }
    engine
        .record_goal(TeamSide::A, "Ana", Some("Beto"))
        .unwrap();

    assert_eq!(engine.goals().len(), 1);
    let goal = &engine.goals()[0];
    assert_eq!(goal.team, TeamSide::A);
    assert_eq!(goal.scorer, "Ana");
    assert_eq!(goal.assister.as_deref(), Some("Beto"));
    assert_eq!(goal.second, 12);

    assert_eq!(engine.score_of(TeamSide::A), 1);
    assert_eq!(engine.score_of(TeamSide::B), 0);

    let team = engine.team(TeamSide::A);
    assert_eq!(team.player("Ana").unwrap().goals, 1);
    assert_eq!(team.player("Ana").unwrap().assists, 0);
    assert_eq!(team.player("Beto").unwrap().assists, 1);
    assert_eq!(team.player("Beto").unwrap().goals, 0);
}

#[test]
fn assists_count_only_when_an_assister_is_named() {
    let mut engine = live_engine();
    engine.record_goal(TeamSide::B, "Caio", None).unwrap();

    assert_eq!(engine.goals()[0].assister, None);
    assert_eq!(engine.team(TeamSide::B).player("Caio").unwrap().goals, 1);
    assert!(
        engine
            .team(TeamSide::B)
            .players
            .iter()
            .all(|player| player.assists == 0)
    );
}

#[test]
fn blank_assister_is_treated_as_no_assist() {
    let mut engine = live_engine();
    engine.record_goal(TeamSide::A, "Ana", Some("  ")).unwrap();
    assert_eq!(engine.goals()[0].assister, None);
}

#[test]
fn goal_time_is_frozen_when_the_form_opens() {
    let mut engine = live_engine();
    for _ in 0..65 {
        engine.tick();
    }
    assert_eq!(engine.open_goal_form().unwrap(), 65);

    // The clock keeps running while the dialog is open.
    for _ in 0..10 {
        engine.tick();
    }
    engine
        .record_goal(TeamSide::A, "Ana", Some("Beto"))
        .unwrap();

    assert_eq!(engine.goals()[0].second, 65);
    assert_eq!(engine.elapsed_secs(), 75);
}

#[test]
fn record_without_a_capture_uses_the_current_second() {
    let mut engine = live_engine();
    for _ in 0..7 {
        engine.tick();
    }
    engine.record_goal(TeamSide::A, "Beto", None).unwrap();
    assert_eq!(engine.goals()[0].second, 7);
}

#[test]
fn capture_is_consumed_by_the_recorded_goal() {
    let mut engine = live_engine();
    for _ in 0..20 {
        engine.tick();
    }
    engine.open_goal_form().unwrap();
    engine.record_goal(TeamSide::A, "Ana", None).unwrap();

    for _ in 0..5 {
        engine.tick();
    }
    engine.record_goal(TeamSide::A, "Beto", None).unwrap();
    // The second goal must not reuse the first capture.
    assert_eq!(engine.goals()[1].second, 25);
}

#[test]
fn pending_capture_survives_a_rejected_confirm() {
    let mut engine = live_engine();
    for _ in 0..40 {
        engine.tick();
    }
    engine.open_goal_form().unwrap();

    assert_eq!(
        engine.record_goal(TeamSide::A, "Caio", None),
        Err(EngineError::UnknownPlayer("Caio".to_string()))
    );

    for _ in 0..3 {
        engine.tick();
    }
    engine.record_goal(TeamSide::A, "Ana", None).unwrap();
    assert_eq!(engine.goals()[0].second, 40);
}

#[test]
fn cancel_goal_form_drops_the_capture() {
    let mut engine = live_engine();
    for _ in 0..40 {
        engine.tick();
    }
    engine.open_goal_form().unwrap();
    engine.cancel_goal_form();

    for _ in 0..5 {
        engine.tick();
    }
    engine.record_goal(TeamSide::A, "Ana", None).unwrap();
    assert_eq!(engine.goals()[0].second, 45);
}

#[test]
fn blank_scorer_is_rejected_without_any_change() {
    let mut engine = live_engine();
    assert_eq!(
        engine.record_goal(TeamSide::A, "  ", None),
        Err(EngineError::IncompleteGoal)
    );
    assert!(engine.goals().is_empty());
    assert_eq!(engine.score_of(TeamSide::A), 0);
}

#[test]
fn scorer_must_be_on_the_scoring_team() {
    let mut engine = live_engine();
    assert_eq!(
        engine.record_goal(TeamSide::B, "Ana", None),
        Err(EngineError::UnknownPlayer("Ana".to_string()))
    );
    assert!(engine.goals().is_empty());
}

#[test]
fn unknown_assister_rejects_without_partial_update() {
    let mut engine = live_engine();
    assert_eq!(
        engine.record_goal(TeamSide::A, "Ana", Some("Zico")),
        Err(EngineError::UnknownPlayer("Zico".to_string()))
    );
    // Atomic: the scorer's tally must not have moved either.
    assert!(engine.goals().is_empty());
    assert_eq!(engine.team(TeamSide::A).player("Ana").unwrap().goals, 0);
}

#[test]
fn recording_before_kickoff_is_rejected() {
    let mut builder = RosterBuilder::new();
    builder.add_player(TeamSide::A, "Ana").unwrap();
    builder.add_player(TeamSide::B, "Caio").unwrap();
    let (team_a, team_b) = builder.build().unwrap();
    let mut engine = MatchEngine::new(team_a, team_b);

    assert_eq!(
        engine.record_goal(TeamSide::A, "Ana", None),
        Err(EngineError::NotStarted)
    );
}

#[test]
fn recording_while_paused_is_allowed() {
    let mut engine = live_engine();
    for _ in 0..30 {
        engine.tick();
    }
    engine.open_goal_form().unwrap();
    engine.toggle_running().unwrap();
    assert_eq!(engine.phase(), MatchPhase::Paused);

    engine.record_goal(TeamSide::A, "Ana", None).unwrap();
    assert_eq!(engine.goals()[0].second, 30);
}

#[test]
fn self_assist_counts_for_both_columns() {
    let mut engine = live_engine();
    engine.record_goal(TeamSide::A, "Ana", Some("Ana")).unwrap();

    let ana = engine.team(TeamSide::A).player("Ana").unwrap();
    assert_eq!(ana.goals, 1);
    assert_eq!(ana.assists, 1);
}

#[test]
fn score_matches_goal_count_per_team_after_every_record() {
    let mut engine = live_engine();
    let plan = [
        (TeamSide::A, "Ana"),
        (TeamSide::B, "Caio"),
        (TeamSide::A, "Beto"),
        (TeamSide::A, "Ana"),
    ];
    for (idx, (side, scorer)) in plan.iter().enumerate() {
        engine.tick();
        engine.record_goal(*side, scorer, None).unwrap();
        assert_eq!(engine.goals().len(), idx + 1);
        let count_a = engine
            .goals()
            .iter()
            .filter(|goal| goal.team == TeamSide::A)
            .count() as u32;
        let count_b = engine
            .goals()
            .iter()
            .filter(|goal| goal.team == TeamSide::B)
            .count() as u32;
        assert_eq!(engine.score_of(TeamSide::A), count_a);
        assert_eq!(engine.score_of(TeamSide::B), count_b);
    }

    // Per-player tallies equal their appearances in the log.
    for side in [TeamSide::A, TeamSide::B] {
        for player in &engine.team(side).players {
            let scored = engine
                .goals()
                .iter()
                .filter(|goal| goal.team == side && goal.scorer == player.name)
                .count() as u32;
            assert_eq!(player.goals, scored);
        }
    }
}
