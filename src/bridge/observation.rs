//! Observation extraction

use super::collaborator::GameSnapshot;

/// Distance reported when the track ahead is clear
pub const NO_OBSTACLE_DISTANCE: f64 = 999.0;

/// Obstacle class as seen by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleType {
    Ground = 0,
    Aerial = 1,
}

impl ObstacleType {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Observation handed to the agent
///
/// Serialised on the wire as `[distance, height, type, speed]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawGameState {
    /// Horizontal distance from the agent to the next obstacle
    pub distance: f64,
    /// Vertical position of the next obstacle
    pub height: f64,
    pub obstacle_type: ObstacleType,
    pub speed: f64,
}

impl RawGameState {
    /// State for a clear track
    pub fn clear(speed: f64) -> Self {
        Self {
            distance: NO_OBSTACLE_DISTANCE,
            height: 0.0,
            obstacle_type: ObstacleType::Ground,
            speed,
        }
    }

    pub fn to_tuple(&self) -> (f64, f64, u8, f64) {
        (
            self.distance,
            self.height,
            self.obstacle_type.code(),
            self.speed,
        )
    }
}

/// Reduce a game snapshot to the observation tuple
///
/// `agent_x` is the fixed horizontal position of the player. The first
/// obstacle in the snapshot is used even if the player is already level with
/// it, so the distance can go negative.
pub fn extract(snapshot: &GameSnapshot, agent_x: f64) -> RawGameState {
    let Some(obstacle) = snapshot.obstacles.first() else {
        return RawGameState::clear(snapshot.speed);
    };

    let obstacle_type = if obstacle.kind.is_flying() {
        ObstacleType::Aerial
    } else {
        ObstacleType::Ground
    };

    RawGameState {
        distance: obstacle.x - agent_x,
        height: obstacle.y,
        obstacle_type,
        speed: snapshot.speed,
    }
}
