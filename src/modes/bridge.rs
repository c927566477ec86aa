//! Bridge mode
//!
//! Runs the simulated game and serves a remote agent over WebSocket. With
//! `reconnect` set, a closed or refused connection is retried after the
//! reconnect delay; otherwise the first session ends the run.

use anyhow::Result;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::bridge::{BridgeConfig, EpisodeLoop, WsChannel};
use crate::game::RunnerHandle;

pub struct BridgeMode {
    config: BridgeConfig,
}

impl BridgeMode {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        let handle = RunnerHandle::new(self.config.runner.clone());
        let ticker = handle.spawn_ticker();

        let result = tokio::select! {
            result = self.serve(&handle) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                Ok(())
            }
        };

        ticker.abort();
        result
    }

    async fn serve(&self, handle: &RunnerHandle) -> Result<()> {
        loop {
            info!(url = %self.config.agent_url, "connecting to agent");
            match WsChannel::connect(&self.config.agent_url).await {
                Ok(channel) => {
                    let mut episode =
                        EpisodeLoop::new(handle.clone(), channel, self.config.clone());
                    episode.run().await?;
                }
                Err(err) if self.config.reconnect => {
                    warn!(error = %format!("{err:#}"), "agent unreachable");
                }
                Err(err) => return Err(err),
            }

            if !self.config.reconnect {
                return Ok(());
            }
            info!(
                delay_ms = self.config.reconnect_delay_ms,
                "waiting before reconnecting"
            );
            sleep(self.config.reconnect_delay()).await;
        }
    }
}
