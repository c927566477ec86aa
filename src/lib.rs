//! Dino Bridge - connects a side-scrolling runner game to a learning agent
//!
//! This library provides:
//! - A headless runner simulation (game module)
//! - Key code mapping for the runner (input module)
//! - The agent bridge: observation, reward shaping, timed input and the
//!   episode loop (bridge module)
//! - Session and episode statistics (metrics module)
//! - Execution modes (bridge, autoplay)

pub mod bridge;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
