//! Trailing-edge debouncing of document edits.
//!
//! ```text
//!            edit (arm, clear overlay)
//!   Idle ───────────────────────────────▶ PendingCommit ──┐ edit (re-arm)
//!    ▲                                         │  ▲       │
//!    └──────────── deadline reached ───────────┘  └───────┘
//!                  (commit document text)
//! ```
//!
//! Timers are plain deadlines compared against caller-supplied `Instant`s so
//! the host decides how to wait for them and tests can step through time.

use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Identifies one arming of a [`TimerSlot`]. Firing with a stale token is a
/// no-op, which is how a cancelled timer that races its own callback is
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    token: TimerToken,
    deadline: Instant,
}

/// Single-slot cancellable timer: arming replaces whatever was pending.
#[derive(Debug, Default)]
pub struct TimerSlot {
    pending: Option<PendingTimer>,
    generation: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending timer and schedules a new one at `deadline`.
    pub fn arm(&mut self, deadline: Instant) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);
        self.pending = Some(PendingTimer { token, deadline });
        token
    }

    /// Drops the pending timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|timer| timer.deadline)
    }

    pub fn current_token(&self) -> Option<TimerToken> {
        self.pending.map(|timer| timer.token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the pending timer if `token` is still current and its
    /// deadline has passed.
    pub fn fire(&mut self, token: TimerToken, now: Instant) -> bool {
        match self.pending {
            Some(timer) if timer.token == token && now >= timer.deadline => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    PendingCommit,
}

/// What the caller has to do after an edit was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// The burst just started (Idle → PendingCommit).
    pub burst_started: bool,
    pub deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    timer: TimerSlot,
    edits_in_burst: u32,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: TimerSlot::new(),
            edits_in_burst: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> DebounceState {
        if self.timer.is_pending() {
            DebounceState::PendingCommit
        } else {
            DebounceState::Idle
        }
    }

    /// Registers an edit at `now`, restarting the quiet period.
    pub fn edit(&mut self, now: Instant) -> EditOutcome {
        let burst_started = !self.timer.is_pending();
        if burst_started {
            self.edits_in_burst = 0;
        }
        self.edits_in_burst = self.edits_in_burst.saturating_add(1);
        let deadline = now + self.delay;
        self.timer.arm(deadline);
        tracing::trace!(
            edits = self.edits_in_burst,
            delay_ms = self.delay.as_millis() as u64,
            "debounce timer armed"
        );
        EditOutcome {
            burst_started,
            deadline,
        }
    }

    /// Returns true exactly once per burst, when the quiet period has
    /// elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(token) = self.timer.current_token() else {
            return false;
        };
        let fired = self.timer.fire(token, now);
        if fired {
            tracing::debug!(edits = self.edits_in_burst, "edit burst settled");
        }
        fired
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Abandons the pending commit, if any.
    pub fn cancel(&mut self) -> bool {
        self.timer.cancel()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: Duration = Duration::from_millis(500);

    #[test]
    fn stale_token_never_fires() {
        let start = Instant::now();
        let mut slot = TimerSlot::new();
        let first = slot.arm(start + D);
        let second = slot.arm(start + D * 2);

        assert!(!slot.fire(first, start + D * 3));
        assert!(slot.is_pending());
        assert!(slot.fire(second, start + D * 3));
        assert!(!slot.is_pending());
    }

    #[test]
    fn fire_waits_for_deadline() {
        let start = Instant::now();
        let mut slot = TimerSlot::new();
        let token = slot.arm(start + D);
        assert!(!slot.fire(token, start + D - Duration::from_millis(1)));
        assert!(slot.fire(token, start + D));
        assert!(!slot.fire(token, start + D));
    }

    #[test]
    fn cancel_clears_slot() {
        let start = Instant::now();
        let mut slot = TimerSlot::new();
        let token = slot.arm(start);
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert!(!slot.fire(token, start + D));
    }

    #[test]
    fn rapid_edits_extend_the_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(D);

        let first = debouncer.edit(start);
        assert!(first.burst_started);
        let second = debouncer.edit(start + Duration::from_millis(300));
        assert!(!second.burst_started);
        assert_eq!(second.deadline, start + Duration::from_millis(800));

        assert!(!debouncer.poll(start + Duration::from_millis(600)));
        assert_eq!(debouncer.state(), DebounceState::PendingCommit);
        assert!(debouncer.poll(start + Duration::from_millis(800)));
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert!(!debouncer.poll(start + Duration::from_secs(5)));
    }

    #[test]
    fn idle_poll_is_noop() {
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.delay(), DEFAULT_DEBOUNCE);
        assert!(!debouncer.poll(Instant::now()));
        assert_eq!(debouncer.deadline(), None);
    }
}
