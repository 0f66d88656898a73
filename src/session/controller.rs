//! State machine for a single quiz attempt.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::SessionError;
use super::achievements::{Achievement, AchievementSet};
use super::scoring::{Award, ScoringPolicy};
use crate::models::{Difficulty, Question};

/// How the total time of an attempt is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBudget {
    /// One wall-clock allotment for the whole attempt.
    Fixed { seconds: u32 },
    /// `seconds` for every question in the sequence.
    PerQuestion { seconds: u32 },
}

impl TimeBudget {
    fn total(self, questions: usize) -> u32 {
        match self {
            TimeBudget::Fixed { seconds } => seconds,
            TimeBudget::PerQuestion { seconds } => {
                let count = u32::try_from(questions).unwrap_or(u32::MAX);
                seconds.saturating_mul(count)
            }
        }
    }

    /// Thinking time expected per question, used for the speed bonus.
    fn per_question(self, questions: usize) -> u32 {
        match self {
            TimeBudget::Fixed { seconds } => {
                let count = u32::try_from(questions.max(1)).unwrap_or(u32::MAX);
                seconds / count
            }
            TimeBudget::PerQuestion { seconds } => seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    Finished,
    TimeExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Active { feedback: bool },
    Completed(CompletionReason),
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Active { feedback: false } => "answering",
            Phase::Active { feedback: true } => "showing feedback",
            Phase::Completed(_) => "completed",
        }
    }
}

/// Labels carried through to the final result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionMeta {
    pub label: String,
    pub difficulty: Option<Difficulty>,
}

/// What a commit did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub correct: bool,
    pub award: Award,
    pub streak: u32,
    pub unlocked: Vec<Achievement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Next { position: usize },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u32 },
    /// Feedback is on screen; the clock does not move.
    Paused,
    Expired,
}

/// Final tally of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub label: String,
    pub difficulty: Option<Difficulty>,
    pub points: u32,
    pub best_streak: u32,
    pub achievements: Vec<Achievement>,
    pub reason: CompletionReason,
}

impl QuizResult {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Owns one quiz attempt: question sequence, answers, clock and scoring.
///
/// Every operation checks the current [`Phase`] first and returns
/// [`SessionError::InvalidTransition`] without touching any state when it
/// does not apply.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    phase: Phase,
    meta: SessionMeta,
    scoring: ScoringPolicy,
    questions: Vec<Question>,
    position: usize,
    answers: BTreeMap<usize, String>,
    correct: usize,
    remaining: u32,
    question_allowance: u32,
    question_elapsed: u32,
    pending: Option<String>,
    points: u32,
    streak: u32,
    best_streak: u32,
    last_award: Option<Award>,
    achievements: AchievementSet,
    new_achievement: Option<Achievement>,
}

impl QuizSession {
    pub fn new(scoring: ScoringPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Uninitialized,
            meta: SessionMeta::default(),
            scoring,
            questions: Vec::new(),
            position: 0,
            answers: BTreeMap::new(),
            correct: 0,
            remaining: 0,
            question_allowance: 0,
            question_elapsed: 0,
            pending: None,
            points: 0,
            streak: 0,
            best_streak: 0,
            last_award: None,
            achievements: AchievementSet::default(),
            new_achievement: None,
        }
    }

    /// Start a fresh attempt over `questions`.
    ///
    /// Any previous attempt is discarded. On error the session is left
    /// uninitialized.
    pub fn initialize(
        &mut self,
        questions: Vec<Question>,
        meta: SessionMeta,
        budget: TimeBudget,
    ) -> Result<(), SessionError> {
        self.reset();

        if questions.is_empty() {
            return Err(SessionError::EmptyContent);
        }
        if let Some(invalid) = questions.iter().find(|q| q.validate().is_err()) {
            return Err(SessionError::InvalidQuestion {
                id: invalid.id.clone(),
            });
        }

        let total = budget.total(questions.len());
        if total == 0 {
            return Err(SessionError::NoTime);
        }

        self.remaining = total;
        self.question_allowance = budget.per_question(questions.len());
        self.questions = questions;
        self.meta = meta;
        self.phase = Phase::Active { feedback: false };

        info!(
            session = %self.id,
            label = %self.meta.label,
            questions = self.questions.len(),
            seconds = self.remaining,
            "quiz session started"
        );
        Ok(())
    }

    /// Back to uninitialized with a new id; all counters zeroed.
    pub fn reset(&mut self) {
        *self = Self::new(self.scoring.clone());
    }

    pub fn select_answer(&mut self, option: &str) -> Result<(), SessionError> {
        self.expect_answering("select an answer")?;

        let question = &self.questions[self.position];
        if !question.has_option(option) {
            return Err(SessionError::UnknownOption(option.to_string()));
        }

        self.pending = Some(option.to_string());
        Ok(())
    }

    pub fn commit_answer(&mut self) -> Result<CommitOutcome, SessionError> {
        self.expect_answering("commit an answer")?;
        let Some(answer) = self.pending.clone() else {
            return Err(SessionError::InvalidTransition {
                operation: "commit an answer",
                state: "nothing selected",
            });
        };
        if self.answers.contains_key(&self.position) {
            return Err(SessionError::InvalidTransition {
                operation: "commit an answer",
                state: "already answered",
            });
        }

        let question = &self.questions[self.position];
        let correct = question.is_correct(&answer);
        let difficulty = question.difficulty;
        self.answers.insert(self.position, answer);

        let prior_streak = self.streak;
        let unused = self.question_allowance.saturating_sub(self.question_elapsed);
        let award = self.scoring.award(correct, difficulty, prior_streak, unused);

        let unlocked = if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            self.points = self.points.saturating_add(award.total());
            self.achievements.evaluate(self.streak, self.points)
        } else {
            self.streak = 0;
            Vec::new()
        };

        self.last_award = Some(award);
        self.new_achievement = unlocked.first().copied();
        self.phase = Phase::Active { feedback: true };

        debug!(
            session = %self.id,
            position = self.position,
            correct,
            points = award.total(),
            streak = self.streak,
            "answer committed"
        );

        Ok(CommitOutcome {
            correct,
            award,
            streak: self.streak,
            unlocked,
        })
    }

    pub fn advance(&mut self) -> Result<Progress, SessionError> {
        if self.phase != (Phase::Active { feedback: true }) {
            return Err(self.invalid("advance"));
        }

        self.pending = None;
        self.new_achievement = None;
        self.last_award = None;

        if self.position + 1 >= self.questions.len() {
            self.complete(CompletionReason::Finished);
            return Ok(Progress::Completed);
        }

        self.position += 1;
        self.question_elapsed = 0;
        self.phase = Phase::Active { feedback: false };
        Ok(Progress::Next {
            position: self.position,
        })
    }

    /// One second of wall-clock time has passed.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        match self.phase {
            Phase::Active { feedback: true } => Ok(TickOutcome::Paused),
            Phase::Active { feedback: false } => {
                self.remaining = self.remaining.saturating_sub(1);
                self.question_elapsed = self.question_elapsed.saturating_add(1);
                if self.remaining == 0 {
                    self.complete(CompletionReason::TimeExpired);
                    Ok(TickOutcome::Expired)
                } else {
                    Ok(TickOutcome::Running {
                        remaining: self.remaining,
                    })
                }
            }
            _ => Err(self.invalid("advance the clock")),
        }
    }

    /// Completes an active attempt and returns its result. Calling it again
    /// after completion returns the same result.
    pub fn finish(&mut self) -> Result<QuizResult, SessionError> {
        match self.phase {
            Phase::Uninitialized => Err(self.invalid("finish")),
            Phase::Active { .. } => {
                self.complete(CompletionReason::Finished);
                Ok(self.tally(CompletionReason::Finished))
            }
            Phase::Completed(reason) => Ok(self.tally(reason)),
        }
    }

    /// The result once completed, `None` before.
    pub fn result(&self) -> Option<QuizResult> {
        match self.phase {
            Phase::Completed(reason) => Some(self.tally(reason)),
            _ => None,
        }
    }

    fn complete(&mut self, reason: CompletionReason) {
        self.phase = Phase::Completed(reason);
        self.pending = None;
        info!(
            session = %self.id,
            ?reason,
            score = self.score(),
            total = self.questions.len(),
            points = self.points,
            "quiz session completed"
        );
    }

    fn tally(&self, reason: CompletionReason) -> QuizResult {
        QuizResult {
            score: self.score(),
            total: self.questions.len(),
            label: self.meta.label.clone(),
            difficulty: self.meta.difficulty,
            points: self.points,
            best_streak: self.best_streak,
            achievements: self.achievements.as_slice().to_vec(),
            reason,
        }
    }

    /// Recomputed from the answer map; unanswered positions never count.
    fn score(&self) -> usize {
        self.questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.answers
                    .get(index)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count()
    }

    fn expect_answering(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.phase == (Phase::Active { feedback: false }) {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.phase.name(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, Phase::Completed(_))
    }

    pub fn feedback_active(&self) -> bool {
        self.phase == (Phase::Active { feedback: true })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_active() {
            self.questions.get(self.position)
        } else {
            None
        }
    }

    pub fn options(&self) -> &[String] {
        self.current_question()
            .map(|question| question.options.as_slice())
            .unwrap_or_default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn answer_at(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn question_allowance(&self) -> u32 {
        self.question_allowance
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn last_award(&self) -> Option<Award> {
        self.last_award
    }

    /// First achievement unlocked by the latest commit, until the next advance.
    pub fn new_achievement(&self) -> Option<Achievement> {
        self.new_achievement
    }

    pub fn achievements(&self) -> &[Achievement] {
        self.achievements.as_slice()
    }

    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }
}
