//! Fixed-cadence frame pacing with backlog drop
//!
//! Pacing is advisory: the pacer only answers "is a cycle due?" each time it
//! is polled. If polls stop for a while, the missed cycles are not replayed;
//! once the target lags more than [`BACKLOG_LIMIT`] behind, it is snapped to
//! just before `now` and a single cycle runs.

use crate::config::{BACKLOG_LIMIT, BACKLOG_SNAP, FRAME_PERIOD};
use std::time::Duration;

/// Decides when the next processing cycle runs
#[derive(Debug, Clone)]
pub struct FramePacer {
    target: Duration,
    frame_id: u64,
    backlog_drops: u64,
}

impl FramePacer {
    /// Create a pacer whose first cycle is due at `start`
    pub fn new(start: Duration) -> Self {
        Self {
            target: start,
            frame_id: 0,
            backlog_drops: 0,
        }
    }

    /// Whether a cycle should run at clock reading `now`
    ///
    /// Drops the backlog first if the target fell too far behind.
    pub fn poll(&mut self, now: Duration) -> bool {
        let lag = now.saturating_sub(self.target);
        if lag > BACKLOG_LIMIT {
            log::debug!(
                "Pacer {:.1} ms behind at frame {}, dropping backlog",
                lag.as_secs_f64() * 1000.0,
                self.frame_id
            );
            self.target = now.saturating_sub(BACKLOG_SNAP);
            self.backlog_drops += 1;
        }
        now >= self.target
    }

    /// Record a finished cycle; returns its frame id
    pub fn complete(&mut self) -> u64 {
        let id = self.frame_id;
        self.frame_id += 1;
        self.target += FRAME_PERIOD;
        id
    }

    /// Id the next completed cycle will get (= cycles completed so far)
    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Clock reading at which the next cycle is due
    pub fn target(&self) -> Duration {
        self.target
    }

    /// Number of times the backlog was dropped
    pub fn backlog_drops(&self) -> u64 {
        self.backlog_drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_cycle_per_period() {
        let mut pacer = FramePacer::new(Duration::ZERO);
        let mut now = Duration::ZERO;

        for expected in 0..120u64 {
            assert!(pacer.poll(now));
            assert_eq!(pacer.complete(), expected);
            // Not due again until a full period has passed
            assert!(!pacer.poll(now));
            now += FRAME_PERIOD;
        }
        assert_eq!(pacer.backlog_drops(), 0);
    }

    #[test]
    fn test_not_due_before_target() {
        let mut pacer = FramePacer::new(Duration::from_millis(100));
        assert!(!pacer.poll(Duration::from_millis(99)));
        assert!(pacer.poll(Duration::from_millis(100)));
    }

    #[test]
    fn test_small_lag_is_caught_up() {
        let mut pacer = FramePacer::new(Duration::ZERO);
        // 50 ms late: within the limit, so cycles run back to back
        let now = Duration::from_millis(50);
        let mut ran = 0;
        while pacer.poll(now) {
            pacer.complete();
            ran += 1;
        }
        assert_eq!(ran, 3);
        assert_eq!(pacer.backlog_drops(), 0);
    }

    #[test]
    fn test_large_lag_drops_backlog() {
        let mut pacer = FramePacer::new(Duration::ZERO);
        assert!(pacer.poll(Duration::ZERO));
        pacer.complete();

        let now = Duration::from_secs(1);
        assert!(pacer.poll(now));
        assert_eq!(pacer.backlog_drops(), 1);
        assert_eq!(pacer.target(), now - BACKLOG_SNAP);

        pacer.complete();
        // Only one cycle for the whole second
        assert!(!pacer.poll(now));
        assert!(pacer.poll(now + FRAME_PERIOD));
    }
}
