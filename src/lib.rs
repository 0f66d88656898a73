//! # quiz-trainer
//!
//! A terminal quiz trainer: chapter quizzes and a mixed cross-subject
//! challenge with a countdown, points, streaks and achievements.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_trainer::{Quiz, QuizConfig, QuizError, QuizMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let quiz = Quiz::from_json("questions.json", QuizMode::Mixed, QuizConfig::default())?;
//!
//!     if let Some(result) = quiz.run().await? {
//!         println!("{} / {}", result.score, result.total);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod app;
pub mod config;
mod data;
pub mod logging;
mod models;
pub mod session;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;

pub use app::{App, QuizMode, Toast, ToastKind, format_clock};
pub use config::{ConfigError, QuizConfig};
pub use data::{
    Chapter, DEFAULT_QUESTIONS_PATH, LoadError, QuestionBank, QuestionSource, Subject,
    load_bank_from_json,
};
pub use models::{AppState, Difficulty, Question, QuestionError};
pub use session::{QuizResult, QuizSession, SessionError, Tick};

/// Redraw often enough for toasts to disappear on time.
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("bad configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz that can be run in the terminal.
pub struct Quiz {
    app: App,
    ticks: mpsc::UnboundedReceiver<Tick>,
}

impl Quiz {
    pub fn new(source: Box<dyn QuestionSource>, mode: QuizMode, config: QuizConfig) -> Self {
        let (tx, ticks) = mpsc::unbounded_channel();
        Self {
            app: App::new(source, mode, config, tx),
            ticks,
        }
    }

    /// Load the question bank from a JSON file.
    pub fn from_json<P: AsRef<Path>>(
        path: P,
        mode: QuizMode,
        config: QuizConfig,
    ) -> Result<Self, QuizError> {
        config.validate()?;
        let bank = load_bank_from_json(path)?;
        Ok(Self::new(Box::new(bank), mode, config))
    }

    /// Run the quiz in the terminal until the user quits.
    ///
    /// Returns the result of the last completed attempt, if any.
    pub async fn run(mut self) -> Result<Option<QuizResult>, QuizError> {
        let mut guard = terminal::TerminalGuard::enter()?;
        let outcome = run_event_loop(guard.terminal(), &mut self.app, &mut self.ticks).await;
        self.app.abandon();
        drop(guard);
        outcome.map(|()| self.app.last_result().cloned())
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::QuizTerminal,
    app: &mut App,
    ticks: &mut mpsc::UnboundedReceiver<Tick>,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);

    loop {
        app.expire_toasts(Instant::now());
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_input(app, key.code) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
            Some(tick) = ticks.recv() => app.on_tick(tick),
            _ = redraw.tick() => {}
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter if app.notice().is_none() => {
            app.start_quiz();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.highlight_previous();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.highlight_next();
            false
        }
        KeyCode::Char(' ') => {
            app.select_highlighted();
            false
        }
        KeyCode::Char(c @ 'a'..='h') => {
            app.select_option(usize::from(c as u8 - b'a'));
            false
        }
        KeyCode::Enter => {
            app.confirm(Instant::now());
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        _ => false,
    }
}
