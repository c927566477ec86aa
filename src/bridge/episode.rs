//! The observation/action loop
//!
//! One [`EpisodeLoop`] serves one agent channel. It sends a greeting signal
//! when it starts, then answers every inbound action with exactly one
//! signal. Crashed episodes are restarted behind the agent's back; the agent
//! only ever sees `done: true` on the crashed transitions.
//!
//! The loop is a flat `while let` over inbound messages. An accepted jump
//! holds the answer back until its press and cooldown have passed. While it
//! waits (for the agent, a jump, a restart delay or a readiness backoff) it
//! keeps firing the dispatcher's due key releases. Keys still held when the
//! channel closes are released before [`EpisodeLoop::run`] returns.

use std::future::pending;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace, warn};

use super::channel::{AgentChannel, ChannelState};
use super::collaborator::{GameCollaborator, GameSnapshot};
use super::config::BridgeConfig;
use super::dispatcher::ActionDispatcher;
use super::observation;
use super::protocol::{EpisodeSignal, parse_action};
use super::reward::RewardShaper;
use crate::game::Action;
use crate::metrics::{EpisodeStats, SessionMetrics};

/// Mutable state carried from one signal to the next
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeContext {
    /// Most recent agent action, consumed by the next reward
    pub last_action: Action,
    /// Distance counter at the previous reward
    pub last_score: f64,
    /// Summed rewards of the current episode
    pub episode_reward: f64,
    /// Signals sent in the current episode
    pub episode_steps: usize,
    /// The current episode's crash has been counted
    pub crash_reported: bool,
}

impl EpisodeContext {
    pub fn new() -> Self {
        Self {
            last_action: Action::None,
            last_score: 0.0,
            episode_reward: 0.0,
            episode_steps: 0,
            crash_reported: false,
        }
    }

    fn begin_episode(&mut self) {
        self.episode_reward = 0.0;
        self.episode_steps = 0;
        self.crash_reported = false;
    }
}

impl Default for EpisodeContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EpisodeLoop<G, C> {
    game: G,
    channel: C,
    config: BridgeConfig,
    shaper: RewardShaper,
    dispatcher: ActionDispatcher,
    context: EpisodeContext,
    metrics: SessionMetrics,
    stats: EpisodeStats,
}

impl<G, C> EpisodeLoop<G, C>
where
    G: GameCollaborator,
    C: AgentChannel,
{
    pub fn new(game: G, channel: C, config: BridgeConfig) -> Self {
        Self {
            shaper: RewardShaper::new(config.reward.clone()),
            dispatcher: ActionDispatcher::from_config(&config),
            game,
            channel,
            config,
            context: EpisodeContext::new(),
            metrics: SessionMetrics::new(),
            stats: EpisodeStats::default(),
        }
    }

    pub fn context(&self) -> &EpisodeContext {
        &self.context
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Serve the channel until it closes
    pub async fn run(&mut self) -> Result<()> {
        info!("agent channel open, starting session");
        self.open();

        if self.emit_signal(true).await? {
            while let Some(text) = self.next_inbound().await {
                let action = parse_action(&text);
                self.metrics.on_action_received();
                debug!(%action, "action received");

                // Recorded even if the dispatcher drops it
                self.context.last_action = action;
                if self.dispatcher.dispatch(&self.game, action, Instant::now()) {
                    // The answer describes the game after the jump has played out
                    let cycle = self.dispatcher.jump_cycle();
                    self.pause(cycle).await;
                }

                if !self.emit_signal(false).await? {
                    break;
                }
            }
        }

        self.dispatcher.release_all(&self.game);
        self.metrics.update();
        info!(
            session = %self.metrics.format_summary(),
            "agent channel closed, session finished"
        );
        if self.stats.total_episodes() > 0 {
            info!(stats = %self.stats.format_summary(), "episode statistics");
        }
        Ok(())
    }

    fn open(&mut self) {
        self.game.silence_audio();

        let present = self.game.query_state().is_some();
        if present && !self.game.is_running() && !self.game.is_terminal() {
            debug!("game idle, pressing start");
            self.dispatcher.press_start(&self.game, Instant::now());
        }
    }

    /// Build and send the next signal
    ///
    /// Returns `false` when the channel closed before a signal could be
    /// built, which ends the session.
    async fn emit_signal(&mut self, greeting: bool) -> Result<bool> {
        self.auto_restart().await;

        let Some(snapshot) = self.await_ready().await else {
            return Ok(false);
        };

        let crashed = self.game.is_terminal();
        let distance = self.game.distance_traveled();
        let state = observation::extract(&snapshot, self.config.agent_x);

        let reward = if greeting {
            if !crashed {
                self.context.last_score = distance;
            }
            0.0
        } else {
            let shaped = self.shaper.shape(
                self.context.last_score,
                distance,
                &state,
                crashed,
                self.context.last_action,
            );
            self.context.last_score = shaped.score;
            shaped.reward
        };

        self.record(reward, crashed, distance);

        let signal = EpisodeSignal::new(&state, reward, crashed);
        debug!(
            state = ?signal.state,
            reward,
            done = crashed,
            action = %self.context.last_action,
            "sending signal"
        );

        match self.channel.send_text(signal.to_json()?).await {
            Ok(()) => self.metrics.on_signal_sent(),
            Err(err) => warn!(%err, "failed to send signal"),
        }
        Ok(true)
    }

    fn record(&mut self, reward: f64, crashed: bool, distance: f64) {
        let ctx = &mut self.context;

        // Crash already counted, restart still pending
        if crashed && ctx.crash_reported {
            return;
        }
        if !crashed && ctx.crash_reported {
            ctx.begin_episode();
        }

        ctx.episode_reward += reward;
        ctx.episode_steps += 1;

        if crashed {
            ctx.crash_reported = true;
            self.stats
                .record_episode(ctx.episode_reward, ctx.episode_steps, distance);
            info!(
                episode = self.stats.total_episodes(),
                reward = ctx.episode_reward,
                steps = ctx.episode_steps,
                distance,
                "episode finished"
            );
        }
    }

    /// Press start if the game has crashed
    ///
    /// The crashed state is still what the next signal reports; the start
    /// key's release restarts the run shortly after.
    async fn auto_restart(&mut self) {
        if !self.restart_due() {
            return;
        }

        self.pause(self.config.restart_delay()).await;
        if !self.restart_due() {
            return;
        }

        debug!("game over, pressing start");
        self.dispatcher.press_start(&self.game, Instant::now());
        if self.config.reset_score_on_restart {
            self.context.last_score = 0.0;
        }
    }

    fn restart_due(&self) -> bool {
        self.game.is_terminal() && !self.dispatcher.start_pending()
    }

    /// Wait until both the game and the channel can take part
    ///
    /// `None` once the channel has closed.
    async fn await_ready(&mut self) -> Option<GameSnapshot> {
        loop {
            match self.channel.state() {
                ChannelState::Closed => return None,
                ChannelState::Open => {
                    if let Some(snapshot) = self.game.query_state() {
                        return Some(snapshot);
                    }
                }
                ChannelState::Connecting => {}
            }

            trace!("game or channel not ready, retrying");
            self.pause(self.config.ready_poll()).await;
        }
    }

    async fn next_inbound(&mut self) -> Option<String> {
        loop {
            let deadline = self.dispatcher.next_deadline();
            tokio::select! {
                inbound = self.channel.recv_text() => return inbound,
                _ = sleep_until_opt(deadline) => {
                    self.dispatcher.poll(&self.game, Instant::now());
                }
            }
        }
    }

    /// Sleep for `duration`, firing dispatcher deadlines on the way
    async fn pause(&mut self, duration: Duration) {
        let until = Instant::now() + duration;
        loop {
            self.dispatcher.poll(&self.game, Instant::now());
            if Instant::now() >= until {
                return;
            }

            let wake = match self.dispatcher.next_deadline() {
                Some(deadline) => deadline.min(until),
                None => until,
            };
            sleep_until(wake).await;
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}
