use serde::{Deserialize, Serialize};

/// Tuning of the headless runner simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Simulation ticks per second
    pub fps: u32,
    /// Width of the visible track
    pub world_width: f64,

    // Trex
    pub trex_x: f64,
    pub trex_width: f64,
    pub trex_height: f64,
    /// Top of the trex box while standing on the ground
    pub ground_y: f64,
    pub gravity: f64,
    pub initial_jump_velocity: f64,
    /// Upward velocity a released jump is cut down to
    pub drop_velocity: f64,

    // Speed
    pub initial_speed: f64,
    pub max_speed: f64,
    pub acceleration: f64,

    // Obstacles
    /// Frames without obstacles after a (re)start
    pub clear_frames: u32,
    pub min_gap: f64,
    pub gap_coefficient: f64,
    /// Pterodactyls only appear at or above this speed
    pub pterodactyl_min_speed: f64,

    /// Seed for obstacle generation; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            world_width: 600.0,
            trex_x: 24.0,
            trex_width: 44.0,
            trex_height: 47.0,
            ground_y: 93.0,
            gravity: 0.6,
            initial_jump_velocity: -10.0,
            drop_velocity: -5.0,
            initial_speed: 6.0,
            max_speed: 13.0,
            acceleration: 0.001,
            clear_frames: 180,
            min_gap: 120.0,
            gap_coefficient: 0.6,
            pterodactyl_min_speed: 8.5,
            seed: None,
        }
    }
}

impl RunnerConfig {
    /// Frames shorter than a millisecond are not supported by the ticker
    pub const MAX_FPS: u32 = 1000;

    /// Same configuration with a fixed obstacle seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Duration of one simulation frame in milliseconds
    pub fn frame_millis(&self) -> f64 {
        1000.0 / f64::from(self.fps.max(1))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 || self.fps > Self::MAX_FPS {
            return Err(format!(
                "fps must be in 1..={}, got {}",
                Self::MAX_FPS,
                self.fps
            ));
        }

        if self.world_width <= self.trex_x + self.trex_width {
            return Err(format!(
                "world_width ({}) must leave room in front of the trex",
                self.world_width
            ));
        }

        if self.gravity <= 0.0 {
            return Err(format!("gravity must be positive, got {}", self.gravity));
        }

        if self.initial_jump_velocity >= self.drop_velocity {
            return Err(format!(
                "initial_jump_velocity ({}) must be stronger than drop_velocity ({})",
                self.initial_jump_velocity, self.drop_velocity
            ));
        }

        if self.min_gap.is_nan() || self.min_gap < 0.0 {
            return Err(format!("min_gap must not be negative, got {}", self.min_gap));
        }

        if self.gap_coefficient.is_nan() || self.gap_coefficient < 0.0 {
            return Err(format!(
                "gap_coefficient must not be negative, got {}",
                self.gap_coefficient
            ));
        }

        if self.initial_speed <= 0.0 || self.initial_speed > self.max_speed {
            return Err(format!(
                "initial_speed must be in (0, max_speed], got {}",
                self.initial_speed
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.fps, 60);
        assert_eq!(config.trex_x, 24.0);
        assert_eq!(config.initial_speed, 6.0);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seeded_config() {
        let config = RunnerConfig::seeded(7);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_speed, RunnerConfig::default().max_speed);
    }

    #[test]
    fn test_frame_millis() {
        let config = RunnerConfig {
            fps: 50,
            ..Default::default()
        };
        assert_eq!(config.frame_millis(), 20.0);
    }

    #[test]
    fn test_validation_rejects_bad_speeds() {
        let mut config = RunnerConfig::default();
        config.initial_speed = 20.0;
        assert!(config.validate().is_err());

        config.initial_speed = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_weak_jump() {
        let config = RunnerConfig {
            initial_jump_velocity: -4.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_gaps() {
        let config = RunnerConfig {
            min_gap: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RunnerConfig {
            gap_coefficient: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RunnerConfig {
            min_gap: 0.0,
            gap_coefficient: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_fps_range() {
        let mut config = RunnerConfig::default();
        config.fps = 0;
        assert!(config.validate().is_err());

        config.fps = RunnerConfig::MAX_FPS + 1;
        assert!(config.validate().is_err());

        config.fps = RunnerConfig::MAX_FPS;
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_millis(), 1.0);
    }
}
