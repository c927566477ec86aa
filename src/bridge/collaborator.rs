//! The game as seen from the bridge
//!
//! The bridge never reaches into a game directly. Everything it needs goes
//! through [`GameCollaborator`], which keeps the loop testable against a
//! scripted game and lets other games plug in.

use crate::game::{InputCode, ObstacleKind, RunnerHandle};

/// Obstacle fields the bridge reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleView {
    /// Horizontal position from the track origin
    pub x: f64,
    /// Vertical position (smaller is higher)
    pub y: f64,
    pub kind: ObstacleKind,
}

/// Raw game fields captured at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    /// Obstacles ordered from nearest to farthest
    pub obstacles: Vec<ObstacleView>,
    pub speed: f64,
}

/// Capabilities the bridge needs from a live game
///
/// Methods take `&self`; implementations use interior mutability since the
/// game keeps running underneath the bridge.
pub trait GameCollaborator {
    /// Current obstacle and speed fields, or `None` while the game instance
    /// does not exist yet
    fn query_state(&self) -> Option<GameSnapshot>;

    /// Whether the current run has crashed
    fn is_terminal(&self) -> bool;

    /// Whether a run is in progress
    fn is_running(&self) -> bool;

    /// Monotonic distance counter of the current run
    fn distance_traveled(&self) -> f64;

    fn press_input(&self, code: InputCode);

    fn release_input(&self, code: InputCode);

    /// Best-effort muting of noisy audio side effects
    fn silence_audio(&self) {}
}

impl GameCollaborator for RunnerHandle {
    fn query_state(&self) -> Option<GameSnapshot> {
        self.with_engine(|engine| {
            let state = engine.state();
            Some(GameSnapshot {
                obstacles: state
                    .obstacles
                    .iter()
                    .map(|obstacle| ObstacleView {
                        x: obstacle.x,
                        y: obstacle.y,
                        kind: obstacle.kind,
                    })
                    .collect(),
                speed: state.current_speed,
            })
        })
    }

    fn is_terminal(&self) -> bool {
        self.with_engine(|engine| engine.state().crashed)
    }

    fn is_running(&self) -> bool {
        self.with_engine(|engine| engine.state().playing)
    }

    fn distance_traveled(&self) -> f64 {
        self.with_engine(|engine| engine.state().distance_ran)
    }

    fn press_input(&self, code: InputCode) {
        self.with_engine(|engine| engine.on_key_down(code.key_code()));
    }

    fn release_input(&self, code: InputCode) {
        self.with_engine(|engine| engine.on_key_up(code.key_code()));
    }
}
