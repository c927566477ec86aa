//! Agent wire protocol
//!
//! Inbound: `{"action": "jump" | "none"}`.
//! Outbound: `{"state": [distance, height, type, speed], "reward": r, "done": b}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::observation::RawGameState;
use crate::game::Action;

/// Message sent by the agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCommand {
    pub action: String,
}

impl AgentCommand {
    pub fn new(action: Action) -> Self {
        Self {
            action: action.label().to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize agent command")
    }
}

/// Parse an inbound message into an action
///
/// Anything unparseable or unrecognised counts as [`Action::None`], so a bad
/// message never stalls the loop.
pub fn parse_action(text: &str) -> Action {
    match serde_json::from_str::<AgentCommand>(text) {
        Ok(command) => Action::from_label(&command.action).unwrap_or_else(|| {
            warn!(action = %command.action, "unknown action, treating as none");
            Action::None
        }),
        Err(err) => {
            warn!(%err, "malformed agent message, treating as none");
            Action::None
        }
    }
}

/// One observation/reward/termination triple sent to the agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSignal {
    pub state: (f64, f64, u8, f64),
    pub reward: f64,
    pub done: bool,
}

impl EpisodeSignal {
    pub fn new(state: &RawGameState, reward: f64, done: bool) -> Self {
        Self {
            state: state.to_tuple(),
            reward,
            done,
        }
    }

    pub fn distance(&self) -> f64 {
        self.state.0
    }

    pub fn height(&self) -> f64 {
        self.state.1
    }

    pub fn is_aerial(&self) -> bool {
        self.state.2 == 1
    }

    pub fn speed(&self) -> f64 {
        self.state.3
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize episode signal")
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse episode signal")
    }
}
