use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchday_terminal::engine::{MatchEngine, MatchPhase, format_clock};
use matchday_terminal::roster::TeamSide;
use matchday_terminal::state::{
    AppState, Delta, GoalForm, GoalFormStage, Screen, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.goal_form.is_some() {
            self.on_key_goal_form(key);
            return;
        }
        match self.state.screen {
            Screen::Setup => self.on_key_setup(key),
            Screen::Live => self.on_key_live(key),
        }
    }

    fn on_key_setup(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.state.toggle_setup_side(),
            KeyCode::Enter => self.state.submit_player_name(),
            KeyCode::Backspace => {
                self.state.name_input.pop();
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.start_match();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.name_input.push(c);
            }
            _ => {}
        }
    }

    fn on_key_live(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => self.state.toggle_clock(),
            KeyCode::Char('g') => self.state.open_goal_form(),
            KeyCode::Char('e') => self.state.end_match(),
            KeyCode::Char('x') => self.state.export_summary(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_key_goal_form(&mut self, key: KeyEvent) {
        let confirming = self
            .state
            .goal_form
            .as_ref()
            .is_some_and(|form| form.stage == GoalFormStage::Confirm);
        match key.code {
            KeyCode::Esc => self.state.cancel_goal_form(),
            KeyCode::Char('j') | KeyCode::Down => self.state.goal_form_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.goal_form_prev(),
            KeyCode::Enter => {
                if confirming {
                    self.state.confirm_goal();
                } else {
                    self.state.goal_form_pick();
                }
            }
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(AppState::new(tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Setup => render_setup(frame, chunks[1], &app.state),
        Screen::Live => render_live(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if let Some(form) = &app.state.goal_form {
        render_goal_dialog(frame, frame.size(), &app.state, form);
    }

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    match state.screen {
        Screen::Setup => "MATCHDAY | Roster setup".to_string(),
        Screen::Live => {
            let phase = state
                .engine
                .as_ref()
                .map(|engine| phase_label(engine.phase()))
                .unwrap_or("");
            format!("MATCHDAY | Live match | {phase}")
        }
    }
}

fn footer_text(state: &AppState) -> String {
    if state.goal_form.is_some() {
        return "j/k/up/down Move | Enter Select | Esc Cancel".to_string();
    }
    match state.screen {
        Screen::Setup => {
            "Type name | Enter Add player | Tab Switch team | Ctrl+S Lock rosters | Esc Quit"
                .to_string()
        }
        Screen::Live => {
            let ended = state.engine.as_ref().is_some_and(MatchEngine::ended);
            if ended {
                "x Export summary | ? Help | q Quit".to_string()
            } else {
                "Space Start/Pause | g Goal | e Full time | ? Help | q Quit".to_string()
            }
        }
    }
}

fn phase_label(phase: MatchPhase) -> &'static str {
    match phase {
        MatchPhase::NotStarted => "KICK-OFF PENDING",
        MatchPhase::Running => "LIVE",
        MatchPhase::Paused => "PAUSED",
        MatchPhase::Ended => "FULL TIME",
    }
}

fn render_setup(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = Paragraph::new(format!(
        "{} > {}_",
        state.setup_side.label(),
        state.name_input
    ))
    .block(Block::default().title("Add player").borders(Borders::ALL));
    frame.render_widget(input, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_roster_column(frame, cols[0], state, TeamSide::A);
    render_roster_column(frame, cols[1], state, TeamSide::B);
}

fn render_roster_column(frame: &mut Frame, area: Rect, state: &AppState, side: TeamSide) {
    let team = state.roster.team(side);
    let focused = state.setup_side == side;
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = format!("{} ({})", side.label(), team.players.len());
    let text = if team.players.is_empty() {
        "No players yet".to_string()
    } else {
        team.players
            .iter()
            .map(|player| player.name.clone())
            .collect::<Vec<_>>()
            .join("\n")
    };
    let column = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(column, area);
}

fn render_live(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(engine) = &state.engine else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let scoreboard = Paragraph::new(scoreboard_text(engine))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(scoreboard, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(40)])
        .split(rows[1]);

    let tape = Paragraph::new(goal_tape_text(engine, cols[0].height))
        .block(Block::default().title("Goal Tape").borders(Borders::ALL));
    frame.render_widget(tape, cols[0]);

    let stat_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(cols[1]);
    render_stat_column(frame, stat_rows[0], engine, TeamSide::A);
    render_stat_column(frame, stat_rows[1], engine, TeamSide::B);
}

fn scoreboard_text(engine: &MatchEngine) -> String {
    format!(
        "{} {} - {} {}\n{}  {}",
        TeamSide::A.label(),
        engine.score_of(TeamSide::A),
        engine.score_of(TeamSide::B),
        TeamSide::B.label(),
        format_clock(engine.elapsed_secs()),
        phase_label(engine.phase())
    )
}

fn goal_tape_text(engine: &MatchEngine, height: u16) -> String {
    if engine.goals().is_empty() {
        return "No goals yet".to_string();
    }
    let visible = height.saturating_sub(2).max(1) as usize;
    let start = engine.goals().len().saturating_sub(visible);
    engine.goals()[start..]
        .iter()
        .map(|goal| {
            let mut line = format!(
                "{} GOAL {} {}",
                format_clock(goal.second),
                goal.team.label(),
                goal.scorer
            );
            if let Some(assister) = &goal.assister {
                line.push_str(&format!(" (assist {assister})"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_stat_column(frame: &mut Frame, area: Rect, engine: &MatchEngine, side: TeamSide) {
    let text = engine
        .team(side)
        .players
        .iter()
        .map(|player| format!("{}: {}G {}A", player.name, player.goals, player.assists))
        .collect::<Vec<_>>()
        .join("\n");
    let column =
        Paragraph::new(text).block(Block::default().title(side.label()).borders(Borders::ALL));
    frame.render_widget(column, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(1)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_goal_dialog(frame: &mut Frame, area: Rect, state: &AppState, form: &GoalForm) {
    let popup_area = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup_area);

    let title = format!("Record goal - {}", format_clock(form.second));
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![stage_prompt(form).to_string(), String::new()];
    if form.stage == GoalFormStage::Confirm {
        lines.push(format!(
            "Team:    {}",
            form.team.map(TeamSide::label).unwrap_or("-")
        ));
        lines.push(format!("Scorer:  {}", form.scorer.as_deref().unwrap_or("-")));
        lines.push(format!(
            "Assist:  {}",
            form.assister.as_deref().unwrap_or("none")
        ));
        lines.push(String::new());
        lines.push("Enter to confirm, Esc to cancel".to_string());
        let body = Paragraph::new(lines.join("\n"));
        frame.render_widget(body, inner);
        return;
    }

    for (idx, option) in state.goal_form_options().iter().enumerate() {
        let marker = if idx == form.selected { "> " } else { "  " };
        lines.push(format!("{marker}{option}"));
    }
    let body = Paragraph::new(lines.join("\n"));
    frame.render_widget(body, inner);
}

fn stage_prompt(form: &GoalForm) -> &'static str {
    match form.stage {
        GoalFormStage::Team => "Which team scored?",
        GoalFormStage::Scorer => "Who scored?",
        GoalFormStage::Assister => "Who assisted?",
        GoalFormStage::Confirm => "Confirm goal",
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday Terminal - Help",
        "",
        "Setup:",
        "  Type a name, Enter adds it to the focused team",
        "  Tab          Switch team",
        "  Ctrl+S       Lock rosters and go live",
        "  Esc          Quit",
        "",
        "Live:",
        "  Space        Kick off / pause / resume",
        "  g            Record a goal (freezes the clock time)",
        "  e            Full time",
        "  x            Export summary (after full time)",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
