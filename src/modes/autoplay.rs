//! Autoplay mode
//!
//! Plays the simulated game with a fixed rule-based agent on the other end
//! of an in-memory channel. Useful for watching the bridge work end to end
//! without an external agent.

use std::time::Duration;

use anyhow::Result;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::bridge::{
    AgentChannel, AgentCommand, BridgeConfig, EpisodeLoop, EpisodeSignal, memory_pair,
};
use crate::game::{Action, RunnerHandle};

/// Rule-based agent
///
/// Ignores flyers high enough to run under and jumps once the next obstacle
/// is within `reaction_frames` frames of reach.
#[derive(Debug, Clone)]
pub struct HeuristicAgent {
    pub agent_x: f64,
    pub reaction_frames: f64,
    pub aerial_height_threshold: f64,
}

impl HeuristicAgent {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            agent_x: config.agent_x,
            reaction_frames: 18.0,
            aerial_height_threshold: config.reward.aerial_height_threshold,
        }
    }

    pub fn decide(&self, signal: &EpisodeSignal) -> Action {
        if signal.is_aerial() && signal.height() < self.aerial_height_threshold {
            return Action::None;
        }

        let distance = signal.distance();
        if distance >= 0.0 && distance + self.agent_x < signal.speed() * self.reaction_frames {
            Action::Jump
        } else {
            Action::None
        }
    }
}

/// What the agent saw over an autoplay run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoplaySummary {
    pub episodes: usize,
    pub signals: usize,
    pub jumps: usize,
    /// Rewards summed over every signal
    pub total_reward: f64,
}

pub struct AutoplayMode {
    config: BridgeConfig,
    episodes: usize,
    agent: HeuristicAgent,
}

impl AutoplayMode {
    pub fn new(config: BridgeConfig, episodes: usize) -> Self {
        Self {
            agent: HeuristicAgent::new(&config),
            config,
            episodes,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let handle = RunnerHandle::new(self.config.runner.clone());
        let ticker = handle.spawn_ticker();

        let result = tokio::select! {
            result = self.play(&handle) => result.map(|summary| {
                info!(
                    episodes = summary.episodes,
                    signals = summary.signals,
                    jumps = summary.jumps,
                    total_reward = summary.total_reward,
                    "autoplay finished"
                );
            }),
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                Ok(())
            }
        };

        ticker.abort();
        result
    }

    /// Play until `episodes` runs have crashed, against an already ticking game
    pub async fn play(&self, handle: &RunnerHandle) -> Result<AutoplaySummary> {
        let (bridge_end, mut agent_end) = memory_pair();
        let mut episode = EpisodeLoop::new(handle.clone(), bridge_end, self.config.clone());
        let frame = Duration::from_secs_f64(self.config.runner.frame_millis() / 1000.0);

        let agent = async {
            let mut summary = AutoplaySummary::default();
            let mut pacing = interval(frame);
            pacing.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut was_done = false;

            while let Some(text) = agent_end.recv_text().await {
                let signal = EpisodeSignal::from_json(&text)?;
                summary.signals += 1;
                summary.total_reward += signal.reward;

                if signal.done && !was_done {
                    summary.episodes += 1;
                    info!(episode = summary.episodes, "agent saw a crash");
                }
                was_done = signal.done;
                if summary.episodes >= self.episodes {
                    break;
                }

                pacing.tick().await;
                let action = self.agent.decide(&signal);
                if action == Action::Jump {
                    summary.jumps += 1;
                }
                debug!(%action, distance = signal.distance(), "agent decision");
                agent_end.send_text(AgentCommand::new(action).to_json()?).await?;
            }

            // Dropping our end closes the session
            drop(agent_end);
            anyhow::Ok(summary)
        };

        let (session, summary) = tokio::join!(episode.run(), agent);
        session?;
        summary
    }
}
