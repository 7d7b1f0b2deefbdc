//! Pause-aware play time

use std::time::{Duration, Instant};

/// Accumulates time spent actually playing
///
/// The clock only advances while running. Callers pass `now` explicitly so
/// the driver samples the wall clock once per event and tests can step time
/// by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayClock {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl PlayClock {
    /// A clock that starts running at `now`
    pub fn started(now: Instant) -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: Some(now),
        }
    }

    /// Stop accumulating; no-op if already stopped
    pub fn stop(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    /// Resume accumulating; no-op if already running
    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }
}

/// Format a duration as `MM:SS`
pub fn format_duration(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_clock_tracks_time() {
        let t0 = Instant::now();
        let clock = PlayClock::started(t0);
        assert_eq!(clock.elapsed(t0 + Duration::from_secs(3)), Duration::from_secs(3));
    }

    #[test]
    fn test_paused_time_is_excluded() {
        let t0 = Instant::now();
        let mut clock = PlayClock::started(t0);

        clock.stop(t0 + Duration::from_secs(2));
        assert_eq!(clock.elapsed(t0 + Duration::from_secs(60)), Duration::from_secs(2));

        clock.resume(t0 + Duration::from_secs(60));
        assert_eq!(clock.elapsed(t0 + Duration::from_secs(65)), Duration::from_secs(7));
    }

    #[test]
    fn test_double_stop_and_resume_are_noops() {
        let t0 = Instant::now();
        let mut clock = PlayClock::started(t0);
        clock.resume(t0 + Duration::from_secs(5));
        clock.stop(t0 + Duration::from_secs(10));
        clock.stop(t0 + Duration::from_secs(20));
        assert_eq!(clock.elapsed(t0 + Duration::from_secs(30)), Duration::from_secs(10));
    }

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_duration(Duration::from_secs(125)), "02:05");
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00");
        assert_eq!(format_duration(Duration::from_secs(3661)), "61:01");
    }
}
