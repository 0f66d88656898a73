//! Quiz session state: sequencing, scoring, achievements and the clock.

mod achievements;
mod controller;
mod scoring;
mod timer;

use thiserror::Error;

pub use achievements::{Achievement, AchievementSet};
pub use controller::{
    CommitOutcome, CompletionReason, Phase, Progress, QuizResult, QuizSession, SessionMeta,
    TickOutcome, TimeBudget,
};
pub use scoring::{Award, ScoringPolicy};
pub use timer::{TICK_PERIOD, Tick, Ticker};

/// Rejected session operations. None of them change session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no questions available for this quiz")]
    EmptyContent,
    #[error("the time budget must be at least one second")]
    NoTime,
    #[error("question {id} is malformed")]
    InvalidQuestion { id: String },
    #[error("{0:?} is not an option of the current question")]
    UnknownOption(String),
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
}
