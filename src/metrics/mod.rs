pub mod episode_stats;
pub mod session_metrics;

pub use episode_stats::EpisodeStats;
pub use session_metrics::SessionMetrics;
