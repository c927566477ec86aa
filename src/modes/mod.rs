pub mod autoplay;
pub mod bridge;

pub use autoplay::{AutoplayMode, AutoplaySummary, HeuristicAgent};
pub use bridge::BridgeMode;
