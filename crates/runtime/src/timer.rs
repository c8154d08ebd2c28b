use std::time::Duration;

use tracing::trace;

/// Identifies one start of a [`TimerSlot`].
///
/// Every start hands out a fresh token, so ticks scheduled for a cancelled or
/// replaced timer can be recognised and dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LiveTimer {
    pub token: TimerToken,
    pub period: Duration,
}

/// Holds at most one live repeating timer.
///
/// The slot only tracks ownership; whoever drives the clock asks for the
/// [`live`](TimerSlot::live) timer and reports ticks back with its token.
/// Starting always cancels the previous timer first, and cancelling is
/// synchronous and idempotent.
#[derive(Debug, Default)]
pub struct TimerSlot {
    next_token: u64,
    live: Option<LiveTimer>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, period: Duration) -> TimerToken {
        self.cancel();
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        self.live = Some(LiveTimer { token, period });
        trace!(token = token.0, ?period, "timer started");
        token
    }

    /// Returns `true` if a timer was live.
    pub fn cancel(&mut self) -> bool {
        match self.live.take() {
            Some(t) => {
                trace!(token = t.token.0, "timer cancelled");
                true
            }
            None => false,
        }
    }

    pub fn live(&self) -> Option<LiveTimer> {
        self.live
    }

    pub fn is_live(&self, token: TimerToken) -> bool {
        self.live.is_some_and(|t| t.token == token)
    }
}

#[cfg(test)]
mod tests {
    use super::TimerSlot;
    use std::time::Duration;

    #[test]
    fn start_replaces_previous_timer() {
        let mut slot = TimerSlot::new();
        let a = slot.start(Duration::from_millis(700));
        let b = slot.start(Duration::from_millis(350));
        assert_ne!(a, b);
        assert!(!slot.is_live(a));
        assert!(slot.is_live(b));
        assert_eq!(slot.live().unwrap().period, Duration::from_millis(350));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut slot = TimerSlot::new();
        let t = slot.start(Duration::from_millis(80));
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert!(!slot.is_live(t));
        assert!(slot.live().is_none());
    }

    #[test]
    fn tokens_are_never_reused() {
        let mut slot = TimerSlot::new();
        let a = slot.start(Duration::from_millis(80));
        slot.cancel();
        let b = slot.start(Duration::from_millis(80));
        assert!(b > a);
    }
}
