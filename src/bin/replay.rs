use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use matchday_terminal::engine::{MatchEngine, MatchPhase};
use matchday_terminal::export;
use matchday_terminal::roster::{RosterBuilder, TeamSide};

#[derive(Debug, Deserialize)]
struct MatchScript {
    team_a: Vec<String>,
    team_b: Vec<String>,
    actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Action {
    Tick {
        seconds: u32,
    },
    Pause,
    Resume,
    Goal {
        team: TeamSide,
        scorer: String,
        #[serde(default)]
        assister: Option<String>,
    },
    End,
}

fn main() -> Result<()> {
    let mut script_path = PathBuf::from("tests/fixtures/friendly.json");
    let mut export_path: Option<PathBuf> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--export" => {
                export_path = Some(PathBuf::from(args.next().context("--export needs a path")?));
            }
            other => script_path = PathBuf::from(other),
        }
    }

    let raw = fs::read_to_string(&script_path)
        .with_context(|| format!("read script {}", script_path.display()))?;
    let script: MatchScript = serde_json::from_str(&raw).context("parse match script")?;

    let mut builder = RosterBuilder::new();
    for name in &script.team_a {
        builder.add_player(TeamSide::A, name)?;
    }
    for name in &script.team_b {
        builder.add_player(TeamSide::B, name)?;
    }
    let (team_a, team_b) = builder.build()?;

    let mut engine = MatchEngine::new(team_a, team_b);
    engine.start()?;

    for action in script.actions {
        match action {
            Action::Tick { seconds } => {
                for _ in 0..seconds {
                    engine.tick();
                }
            }
            Action::Pause => {
                if engine.phase() == MatchPhase::Running {
                    engine.toggle_running()?;
                }
            }
            Action::Resume => {
                if engine.phase() == MatchPhase::Paused {
                    engine.toggle_running()?;
                }
            }
            Action::Goal {
                team,
                scorer,
                assister,
            } => {
                engine.open_goal_form()?;
                engine
                    .record_goal(team, &scorer, assister.as_deref())
                    .with_context(|| format!("record goal by {scorer}"))?;
            }
            Action::End => engine.end()?,
        }
    }

    let report = engine.summary();
    for line in report.to_lines() {
        println!("{line}");
    }

    if let Some(path) = export_path {
        let done = export::export_summary(&path, &report)?;
        println!();
        println!(
            "Exported {} goals and {} player rows to {}",
            done.goals,
            done.players,
            path.display()
        );
    }
    Ok(())
}
