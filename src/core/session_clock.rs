// Session clock - fixed-duration window measured on the tokio clock

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started: Instant,
    duration: Duration,
}

impl SessionClock {
    /// Start a window of `duration` from now
    pub fn start(duration: Duration) -> Self {
        Self {
            started: Instant::now(),
            duration,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.duration
    }

    /// Whole seconds left, rounded up and never negative
    pub fn remaining_seconds(&self) -> u64 {
        remaining_seconds(self.duration, self.elapsed())
    }
}

/// `max(0, ceil((duration - elapsed) / 1s))`
pub fn remaining_seconds(duration: Duration, elapsed: Duration) -> u64 {
    let left = duration.saturating_sub(elapsed).as_millis() as u64;
    left.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_seconds_rounds_up() {
        let minute = Duration::from_secs(60);
        assert_eq!(remaining_seconds(minute, Duration::ZERO), 60);
        assert_eq!(remaining_seconds(minute, Duration::from_millis(1)), 60);
        assert_eq!(remaining_seconds(minute, Duration::from_millis(999)), 60);
        assert_eq!(remaining_seconds(minute, Duration::from_millis(1000)), 59);
        assert_eq!(remaining_seconds(minute, Duration::from_millis(59_001)), 1);
        assert_eq!(remaining_seconds(minute, Duration::from_millis(60_000)), 0);
    }

    #[test]
    fn test_remaining_seconds_never_negative() {
        let minute = Duration::from_secs(60);
        assert_eq!(remaining_seconds(minute, Duration::from_millis(60_250)), 0);
        assert_eq!(remaining_seconds(minute, Duration::from_secs(3600)), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_expires() {
        let clock = SessionClock::start(Duration::from_secs(2));
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining_seconds(), 2);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!clock.is_expired());
        assert_eq!(clock.remaining_seconds(), 1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(clock.is_expired());
        assert_eq!(clock.remaining_seconds(), 0);
    }
}
