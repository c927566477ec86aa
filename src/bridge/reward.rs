//! Reward shaping
//!
//! Turns one transition into a scalar learning signal. The shaper is a pure
//! function of its inputs so the same transition always yields the same
//! reward, bit for bit.

use super::config::RewardConfig;
use super::observation::{ObstacleType, RawGameState};
use crate::game::Action;

/// Reward for one transition together with the score to carry forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shaped {
    pub reward: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RewardShaper {
    config: RewardConfig,
}

impl RewardShaper {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Compute the reward for reaching `state` after `last_action`
    ///
    /// `current_score` is the game's distance counter at extraction time. A
    /// crash short-circuits every other term and leaves the score untouched.
    pub fn shape(
        &self,
        prev_score: f64,
        current_score: f64,
        state: &RawGameState,
        crashed: bool,
        last_action: Action,
    ) -> Shaped {
        let cfg = &self.config;

        if crashed {
            return Shaped {
                reward: self.clamp(cfg.crash_reward),
                score: prev_score,
            };
        }

        let mut reward = current_score - prev_score;

        if last_action == Action::None {
            reward += cfg.idle_bonus;
        }
        if last_action == Action::Jump && state.distance > cfg.premature_jump_distance {
            reward -= cfg.premature_jump_penalty;
        }
        reward += cfg.survival_bonus;

        if state.obstacle_type == ObstacleType::Aerial {
            let high = state.height < cfg.aerial_height_threshold;
            match (last_action, high) {
                // Jumping into a high or mid flyer
                (Action::Jump, true) => reward -= cfg.aerial_bonus,
                // Running under a high or mid flyer
                (Action::None, true) => reward += cfg.aerial_bonus,
                // Jumping a low flyer
                (Action::Jump, false) => reward += cfg.aerial_bonus,
                (Action::None, false) => {}
            }
        }

        Shaped {
            reward: self.clamp(reward),
            score: current_score,
        }
    }

    fn clamp(&self, reward: f64) -> f64 {
        reward.clamp(-self.config.reward_limit, self.config.reward_limit)
    }
}
