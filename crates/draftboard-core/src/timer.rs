// Turn timer: a per-turn countdown that reports each tick and fires once
// when it runs out.
//
// The countdown runs as its own tokio task and only sends events; whoever
// owns the draft applies them. Every start bumps a generation counter so
// events still queued from a cancelled countdown can be told apart and
// dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default time a coach gets to make a pick.
pub const DEFAULT_TURN_DURATION: Duration = Duration::from_secs(60);

/// How often the countdown reports the time remaining.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Events emitted by a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Time left on the clock, sent once per tick starting at the full
    /// duration.
    Tick { remaining: Duration, generation: u64 },
    /// The clock hit zero. Sent exactly once per countdown, after which the
    /// countdown stops.
    Expired { generation: u64 },
}

impl TimerEvent {
    pub fn generation(&self) -> u64 {
        match self {
            TimerEvent::Tick { generation, .. } | TimerEvent::Expired { generation } => *generation,
        }
    }
}

/// An owned, cancellable countdown.
///
/// Dropping the timer cancels any countdown in flight.
pub struct TurnTimer {
    duration: Duration,
    tick: Duration,
    tx: mpsc::Sender<TimerEvent>,
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl TurnTimer {
    /// Create a stopped timer that will send its events through `tx`.
    pub fn new(duration: Duration, tx: mpsc::Sender<TimerEvent>) -> Self {
        TurnTimer {
            duration,
            tick: TICK_INTERVAL,
            tx,
            task: None,
            generation: 0,
        }
    }

    /// Override the tick interval (mostly useful for tests).
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Start a fresh countdown, cancelling any countdown already running.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// stamped on this countdown's events.
    pub fn start(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        debug!(
            "Starting turn timer generation {} for {:?}",
            generation, self.duration
        );
        self.task = Some(tokio::spawn(countdown(
            self.duration,
            self.tick,
            generation,
            self.tx.clone(),
        )));
        generation
    }

    /// Stop the running countdown, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                debug!("Cancelled turn timer generation {}", self.generation);
                true
            }
            None => false,
        }
    }

    /// Whether a countdown is still ticking.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Whether events stamped with `generation` belong to the countdown this
    /// timer last started and has not cancelled since.
    pub fn is_current(&self, generation: u64) -> bool {
        self.task.is_some() && self.generation == generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn countdown(
    total: Duration,
    tick: Duration,
    generation: u64,
    tx: mpsc::Sender<TimerEvent>,
) {
    let mut interval = tokio::time::interval(tick);
    let mut remaining = total;

    loop {
        interval.tick().await;
        if remaining.is_zero() {
            let _ = tx.send(TimerEvent::Expired { generation }).await;
            break;
        }
        if tx
            .send(TimerEvent::Tick {
                remaining,
                generation,
            })
            .await
            .is_err()
        {
            break;
        }
        remaining = remaining.saturating_sub(tick);
    }
}
