use std::time::{Duration, Instant};

/// Counters for one bridge session
///
/// Per-episode figures live in [`EpisodeStats`](super::EpisodeStats).
pub struct SessionMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub signals_sent: usize,
    pub actions_received: usize,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            signals_sent: 0,
            actions_received: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_signal_sent(&mut self) {
        self.signals_sent += 1;
    }

    pub fn on_action_received(&mut self) {
        self.actions_received += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Time: {} | Signals: {} | Actions: {}",
            self.format_time(),
            self.signals_sent,
            self.actions_received,
        )
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut metrics = SessionMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_message_counters() {
        let mut metrics = SessionMetrics::new();
        metrics.on_signal_sent();
        metrics.on_action_received();
        metrics.on_signal_sent();

        assert_eq!(metrics.signals_sent, 2);
        assert_eq!(metrics.actions_received, 1);

        let summary = metrics.format_summary();
        assert!(summary.contains("Signals: 2"));
        assert!(summary.contains("Actions: 1"));
    }
}
