//! Headless runner game
//!
//! A small side-scrolling runner: a trex that can jump, cacti on the ground
//! and pterodactyls at three heights. It has no rendering and no I/O of its
//! own, so the bridge can drive it like any other game.

pub mod action;
pub mod config;
pub mod engine;
pub mod handle;
pub mod state;

// Re-export commonly used types
pub use action::{Action, InputCode};
pub use config::RunnerConfig;
pub use engine::{RunnerEngine, TickOutcome};
pub use handle::RunnerHandle;
pub use state::{Obstacle, ObstacleKind, Rect, RunnerState, Trex};
