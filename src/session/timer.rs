//! Countdown ticks for a running session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;
use uuid::Uuid;

/// The session clock ticks once per second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One timer wake-up for the session it was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub session: Uuid,
}

/// Handle to a periodic tick task.
///
/// The task stops when the handle is dropped. Ticks queued before that still
/// carry the old session id, so receivers must compare it.
pub struct Ticker {
    session: Uuid,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Start sending a [`Tick`] every `period`, first one after a full period.
    /// Must be called from within a tokio runtime.
    pub fn start(session: Uuid, period: Duration, sink: mpsc::UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sink.send(Tick { session }).is_err() {
                    break;
                }
            }
        });
        debug!(session = %session, ?period, "ticker started");
        Self { session, handle }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(session = %self.session, "ticker stopped");
    }
}
