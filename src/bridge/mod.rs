//! Agent bridge
//!
//! Connects a running game to an external learning agent. Each inbound
//! action is carried out as timed key presses, and each answer carries the
//! reduced observation, a shaped reward and the termination flag.
//!
//! - [`observation`]: snapshot to 4-tuple reduction
//! - [`reward`]: deterministic reward shaping
//! - [`dispatcher`]: press/release/cooldown timing
//! - [`episode`]: the request/response loop and auto-restart
//! - [`channel`] and [`protocol`]: transport and wire format

pub mod channel;
pub mod collaborator;
pub mod config;
pub mod dispatcher;
pub mod episode;
pub mod observation;
pub mod protocol;
pub mod reward;

pub use channel::{AgentChannel, ChannelState, MemoryChannel, WsChannel, memory_pair};
pub use collaborator::{GameCollaborator, GameSnapshot, ObstacleView};
pub use config::{BridgeConfig, RewardConfig};
pub use dispatcher::{ActionDispatcher, JumpPhase};
pub use episode::{EpisodeContext, EpisodeLoop};
pub use observation::{NO_OBSTACLE_DISTANCE, ObstacleType, RawGameState, extract};
pub use protocol::{AgentCommand, EpisodeSignal, parse_action};
pub use reward::{RewardShaper, Shaped};
