use super::{
    config::RunnerConfig,
    state::{Obstacle, ObstacleKind, RunnerState, Trex},
};
use crate::input::{InputHandler, KeyAction, RunStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of a single simulation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing moved (not started, or waiting after a crash)
    Idle,
    /// The run continues
    Running,
    /// The trex hit an obstacle this frame
    Crashed,
}

/// Headless runner game
pub struct RunnerEngine {
    config: RunnerConfig,
    state: RunnerState,
    input: InputHandler,
    rng: StdRng,
    /// Frames elapsed since the last crash
    frames_since_crash: u32,
}

impl RunnerEngine {
    /// Frames a crashed game ignores restart keys for
    pub const GAMEOVER_CLEAR_FRAMES: u32 = 45;

    pub fn new(config: RunnerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Self::fresh_state(&config);

        Self {
            config,
            state,
            input: InputHandler::new(),
            rng,
            frames_since_crash: 0,
        }
    }

    fn fresh_state(config: &RunnerConfig) -> RunnerState {
        let trex = Trex::new(
            config.trex_x,
            config.ground_y,
            config.trex_width,
            config.trex_height,
        );
        RunnerState::new(trex, config.initial_speed)
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Direct access for scripted scenarios
    pub fn state_mut(&mut self) -> &mut RunnerState {
        &mut self.state
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn status(&self) -> RunStatus {
        if self.state.crashed {
            RunStatus::Crashed
        } else if self.state.playing {
            RunStatus::Playing
        } else {
            RunStatus::Idle
        }
    }

    pub fn start(&mut self) {
        if !self.state.crashed {
            self.state.playing = true;
        }
    }

    /// Begin a fresh run after a crash
    pub fn restart(&mut self) {
        self.state = Self::fresh_state(&self.config);
        self.state.playing = true;
        self.frames_since_crash = 0;
    }

    pub fn on_key_down(&mut self, key_code: u32) {
        match self.input.handle_key_down(key_code, self.status()) {
            KeyAction::Start => self.start(),
            KeyAction::Jump => self
                .state
                .trex
                .start_jump(self.config.initial_jump_velocity),
            _ => {}
        }
    }

    pub fn on_key_up(&mut self, key_code: u32) {
        match self.input.handle_key_up(key_code, self.status()) {
            KeyAction::Restart if self.frames_since_crash >= Self::GAMEOVER_CLEAR_FRAMES => {
                self.restart();
            }
            KeyAction::EndJump => self.state.trex.end_jump(self.config.drop_velocity),
            _ => {}
        }
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.crashed {
            self.frames_since_crash = self.frames_since_crash.saturating_add(1);
            return TickOutcome::Idle;
        }
        if !self.state.playing {
            return TickOutcome::Idle;
        }

        self.state.frames += 1;
        self.state.trex.update(self.config.gravity);

        let speed = self.state.current_speed;
        for obstacle in &mut self.state.obstacles {
            obstacle.x -= speed + obstacle.kind.speed_offset();
        }
        self.state.obstacles.retain(|obstacle| obstacle.right() > 0.0);

        if self.state.frames > self.config.clear_frames && self.has_room_for_obstacle() {
            self.spawn_obstacle();
        }

        if self.check_collision() {
            self.state.crashed = true;
            self.state.playing = false;
            self.frames_since_crash = 0;
            return TickOutcome::Crashed;
        }

        self.state.distance_ran += speed;
        self.state.current_speed = (speed + self.config.acceleration).min(self.config.max_speed);

        TickOutcome::Running
    }

    fn check_collision(&self) -> bool {
        let trex = self.state.trex.bounds();
        self.state
            .obstacles
            .iter()
            .any(|obstacle| obstacle.bounds().intersects(&trex))
    }

    fn has_room_for_obstacle(&self) -> bool {
        match self.state.obstacles.last() {
            Some(last) => last.right() + last.gap < self.config.world_width,
            None => true,
        }
    }

    fn spawn_obstacle(&mut self) {
        let kind = if self.state.current_speed >= self.config.pterodactyl_min_speed {
            match self.rng.gen_range(0..3) {
                0 => ObstacleKind::CactusSmall,
                1 => ObstacleKind::CactusLarge,
                _ => ObstacleKind::Pterodactyl,
            }
        } else if self.rng.gen_bool(0.5) {
            ObstacleKind::CactusSmall
        } else {
            ObstacleKind::CactusLarge
        };

        let positions = kind.y_positions();
        let y = positions[self.rng.gen_range(0..positions.len())];

        let (width, _) = kind.size();
        let min_gap =
            (width * self.state.current_speed + self.config.min_gap * self.config.gap_coefficient)
                .round();
        let gap = self.rng.gen_range(min_gap..=min_gap * 1.5);

        self.state
            .obstacles
            .push(Obstacle::new(kind, self.config.world_width, y, gap));
    }
}
