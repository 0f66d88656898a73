use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::QuizConfig;
use crate::data::QuestionSource;
use crate::models::{AppState, Difficulty, Question};
use crate::session::{
    Achievement, Progress, QuizResult, QuizSession, SessionError, SessionMeta, TICK_PERIOD,
    Tick, TickOutcome, Ticker, TimeBudget,
};

/// Which kind of attempt the app starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizMode {
    Chapter {
        subject: String,
        chapter: String,
        difficulty: Difficulty,
    },
    Mixed,
}

/// A short-lived notification drawn over the quiz screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastKind {
    Achievement(Achievement),
    Points(u32),
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    expires_at: Instant,
}

/// Presentation state around one [`QuizSession`].
///
/// Turns key presses and ticks into session operations. Rejected operations
/// are logged and ignored.
pub struct App {
    pub state: AppState,
    source: Box<dyn QuestionSource>,
    mode: QuizMode,
    config: QuizConfig,
    session: QuizSession,
    ticker: Option<Ticker>,
    ticks: mpsc::UnboundedSender<Tick>,
    rng: StdRng,
    highlighted: usize,
    toasts: Vec<Toast>,
    notice: Option<String>,
    result_scroll: usize,
    last_result: Option<QuizResult>,
}

impl App {
    pub fn new(
        source: Box<dyn QuestionSource>,
        mode: QuizMode,
        config: QuizConfig,
        ticks: mpsc::UnboundedSender<Tick>,
    ) -> Self {
        let session = QuizSession::new(config.scoring.clone());
        Self {
            state: AppState::Welcome,
            source,
            mode,
            config,
            session,
            ticker: None,
            ticks,
            rng: StdRng::from_entropy(),
            highlighted: 0,
            toasts: Vec::new(),
            notice: None,
            result_scroll: 0,
            last_result: None,
        }
    }

    /// Use a fixed seed for mixed shuffles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn mode(&self) -> &QuizMode {
        &self.mode
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn last_result(&self) -> Option<&QuizResult> {
        self.last_result.as_ref()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn title(&self) -> String {
        match &self.mode {
            QuizMode::Chapter {
                subject, chapter, ..
            } => self
                .source
                .chapter_label(subject, chapter)
                .unwrap_or_else(|| format!("{} · {}", subject, chapter)),
            QuizMode::Mixed => "Mixed Challenge".to_string(),
        }
    }

    /// Draw questions and begin a new attempt. Needs a tokio runtime for the
    /// ticker.
    pub fn start_quiz(&mut self) {
        self.stop_clock();
        self.toasts.clear();
        self.highlighted = 0;
        self.result_scroll = 0;

        let (questions, meta, budget) = self.draw_questions();
        match self.session.initialize(questions, meta, budget) {
            Ok(()) => {
                self.notice = None;
                self.ticker = Some(Ticker::start(
                    self.session.id(),
                    TICK_PERIOD,
                    self.ticks.clone(),
                ));
                self.state = AppState::Quiz;
            }
            Err(err) => {
                warn!(error = %err, mode = ?self.mode, "quiz could not start");
                self.notice = Some(err.to_string());
                self.state = AppState::Welcome;
            }
        }
    }

    fn draw_questions(&mut self) -> (Vec<Question>, SessionMeta, TimeBudget) {
        let label = self.title();
        match &self.mode {
            QuizMode::Chapter {
                subject,
                chapter,
                difficulty,
            } => {
                let questions = self.source.questions(
                    subject,
                    chapter,
                    *difficulty,
                    self.config.questions_per_quiz,
                );
                let meta = SessionMeta {
                    label,
                    difficulty: Some(*difficulty),
                };
                let budget = TimeBudget::PerQuestion {
                    seconds: self.config.seconds_per_question,
                };
                (questions, meta, budget)
            }
            QuizMode::Mixed => {
                let questions = self.source.mixed_questions(
                    &self.config.mixed.subjects,
                    self.config.mixed.count,
                    &mut self.rng,
                );
                let meta = SessionMeta {
                    label,
                    difficulty: None,
                };
                let budget = TimeBudget::Fixed {
                    seconds: self.config.mixed.time_limit_seconds,
                };
                (questions, meta, budget)
            }
        }
    }

    pub fn highlight_next(&mut self) {
        let count = self.session.options().len();
        if count > 0 && !self.session.feedback_active() {
            self.highlighted = (self.highlighted + 1) % count;
        }
    }

    pub fn highlight_previous(&mut self) {
        let count = self.session.options().len();
        if count > 0 && !self.session.feedback_active() {
            self.highlighted = (self.highlighted + count - 1) % count;
        }
    }

    /// Select the option under the cursor.
    pub fn select_highlighted(&mut self) {
        self.select_option(self.highlighted);
    }

    pub fn select_option(&mut self, index: usize) {
        let Some(option) = self.session.options().get(index).cloned() else {
            debug!(index, "no option at index");
            return;
        };
        match self.session.select_answer(&option) {
            Ok(()) => self.highlighted = index,
            Err(err) => log_rejected(&err),
        }
    }

    /// Enter: submit the pending answer, or move on once feedback is shown.
    pub fn confirm(&mut self, now: Instant) {
        if self.session.feedback_active() {
            self.continue_quiz();
        } else {
            self.submit_answer(now);
        }
    }

    pub fn submit_answer(&mut self, now: Instant) {
        let outcome = match self.session.commit_answer() {
            Ok(outcome) => outcome,
            Err(err) => return log_rejected(&err),
        };

        if outcome.correct {
            self.push_toast(
                ToastKind::Points(outcome.award.total()),
                now + self.config.toasts.points(),
            );
        }
        if let Some(achievement) = self.session.new_achievement() {
            info!(achievement = achievement.id(), "achievement unlocked");
            self.push_toast(
                ToastKind::Achievement(achievement),
                now + self.config.toasts.achievement(),
            );
        }
    }

    pub fn continue_quiz(&mut self) {
        match self.session.advance() {
            Ok(Progress::Next { .. }) => self.highlighted = 0,
            Ok(Progress::Completed) => self.show_result(),
            Err(err) => log_rejected(&err),
        }
    }

    pub fn on_tick(&mut self, tick: Tick) {
        let current = self.ticker.as_ref().map(Ticker::session);
        if current != Some(tick.session) {
            debug!(session = %tick.session, "dropping stale tick");
            return;
        }

        match self.session.tick() {
            Ok(TickOutcome::Expired) => {
                info!(session = %tick.session, "time is up");
                self.show_result();
            }
            Ok(TickOutcome::Running { .. } | TickOutcome::Paused) => {}
            Err(err) => log_rejected(&err),
        }
    }

    fn show_result(&mut self) {
        self.stop_clock();
        match self.session.finish() {
            Ok(result) => {
                self.last_result = Some(result);
                self.result_scroll = 0;
                self.state = AppState::Result;
            }
            Err(err) => log_rejected(&err),
        }
    }

    /// From the result screen: discard the attempt and start over.
    pub fn restart(&mut self) {
        self.stop_clock();
        self.session.reset();
        self.start_quiz();
    }

    /// Leaving the app mid-attempt: stop the clock and drop the session.
    pub fn abandon(&mut self) {
        self.stop_clock();
        if self.session.is_active() {
            info!(session = %self.session.id(), "quiz abandoned");
            self.session.reset();
        }
    }

    fn stop_clock(&mut self) {
        self.ticker = None;
    }

    fn push_toast(&mut self, kind: ToastKind, expires_at: Instant) {
        self.toasts.push(Toast { kind, expires_at });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    pub fn scroll_results_down(&mut self) {
        let total = self.session.total_questions();
        if self.result_scroll + 1 < total {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.abandon();
    }
}

fn log_rejected(err: &SessionError) {
    warn!(error = %err, "ignored quiz action");
}

/// `m:ss` clock display.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
