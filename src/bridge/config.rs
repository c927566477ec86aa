//! Bridge configuration
//!
//! Timing policy, reward constants and the simulated game's tuning, loadable
//! from a JSON file. Every field has a default, so a file only needs to list
//! what it changes.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::game::RunnerConfig;

/// Reward shaping constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardConfig {
    /// Reward for a crashed transition
    ///
    /// Default: -1000
    pub crash_reward: f64,

    /// Bonus for not jumping
    ///
    /// Default: 1
    pub idle_bonus: f64,

    /// Penalty for jumping while the next obstacle is far away
    ///
    /// Default: 100
    pub premature_jump_penalty: f64,

    /// Distance beyond which a jump counts as premature
    ///
    /// Default: 80
    pub premature_jump_distance: f64,

    /// Flat bonus on every surviving transition
    ///
    /// Default: 0.5
    pub survival_bonus: f64,

    /// Flyers positioned above this line (smaller y) must not be jumped
    ///
    /// Default: 75
    pub aerial_height_threshold: f64,

    /// Bonus or penalty for handling a flyer right or wrong
    ///
    /// Default: 500
    pub aerial_bonus: f64,

    /// Rewards are clamped to `[-reward_limit, reward_limit]`
    ///
    /// Default: 1000
    pub reward_limit: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            crash_reward: -1000.0,
            idle_bonus: 1.0,
            premature_jump_penalty: 100.0,
            premature_jump_distance: 80.0,
            survival_bonus: 0.5,
            aerial_height_threshold: 75.0,
            aerial_bonus: 500.0,
            reward_limit: 1000.0,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.reward_limit.is_nan() || self.reward_limit <= 0.0 {
            return Err(format!(
                "reward_limit must be positive, got {}",
                self.reward_limit
            ));
        }

        let terms = [
            ("crash_reward", self.crash_reward),
            ("idle_bonus", self.idle_bonus),
            ("premature_jump_penalty", self.premature_jump_penalty),
            ("premature_jump_distance", self.premature_jump_distance),
            ("survival_bonus", self.survival_bonus),
            ("aerial_height_threshold", self.aerial_height_threshold),
            ("aerial_bonus", self.aerial_bonus),
        ];
        for (name, value) in terms {
            if !value.is_finite() {
                return Err(format!("{name} must be finite, got {value}"));
            }
        }

        Ok(())
    }
}

/// Everything the bridge can be tuned with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// WebSocket URL of the agent
    pub agent_url: String,

    /// Fixed horizontal position of the player on the track
    pub agent_x: f64,

    /// How long a jump key stays pressed
    pub jump_press_ms: u64,

    /// Time after the release before another jump is accepted
    pub jump_cooldown_ms: u64,

    /// How long the start key stays pressed
    pub start_hold_ms: u64,

    /// Wait between seeing a crash and pressing start
    pub restart_delay_ms: u64,

    /// Backoff while the game or the channel is not ready
    pub ready_poll_ms: u64,

    /// Start each restarted episode from a zero score instead of carrying
    /// over the crashed run's distance
    pub reset_score_on_restart: bool,

    /// Reconnect to the agent after the channel closes
    pub reconnect: bool,

    /// Wait before reconnecting
    pub reconnect_delay_ms: u64,

    pub reward: RewardConfig,

    pub runner: RunnerConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            agent_url: "ws://localhost:8765".to_string(),
            agent_x: 24.0,
            jump_press_ms: 100,
            jump_cooldown_ms: 400,
            start_hold_ms: 300,
            restart_delay_ms: 700,
            ready_poll_ms: 100,
            reset_score_on_restart: true,
            reconnect: false,
            reconnect_delay_ms: 1000,
            reward: RewardConfig::default(),
            runner: RunnerConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn jump_press(&self) -> Duration {
        Duration::from_millis(self.jump_press_ms)
    }

    pub fn jump_cooldown(&self) -> Duration {
        Duration::from_millis(self.jump_cooldown_ms)
    }

    pub fn start_hold(&self) -> Duration {
        Duration::from_millis(self.start_hold_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn ready_poll(&self) -> Duration {
        Duration::from_millis(self.ready_poll_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.agent_url.is_empty() {
            return Err("agent_url must not be empty".to_string());
        }

        if self.jump_press_ms == 0 {
            return Err("jump_press_ms must be at least 1".to_string());
        }

        if self.jump_cooldown_ms <= self.jump_press_ms {
            return Err(format!(
                "jump_cooldown_ms ({}) must exceed jump_press_ms ({})",
                self.jump_cooldown_ms, self.jump_press_ms
            ));
        }

        let frame = self.runner.frame_millis();
        if (self.jump_cooldown_ms as f64) <= frame {
            return Err(format!(
                "jump_cooldown_ms ({}) must exceed one game frame ({:.1} ms)",
                self.jump_cooldown_ms, frame
            ));
        }

        if self.start_hold_ms == 0 {
            return Err("start_hold_ms must be at least 1".to_string());
        }

        if self.ready_poll_ms == 0 {
            return Err("ready_poll_ms must be at least 1".to_string());
        }

        self.reward.validate()?;
        self.runner.validate()?;

        Ok(())
    }
}
