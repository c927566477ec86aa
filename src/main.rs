use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use dino_bridge::bridge::BridgeConfig;
use dino_bridge::modes::{AutoplayMode, BridgeMode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dino_bridge")]
#[command(version, about = "Bridge between a runner game and a reinforcement learning agent")]
struct Cli {
    /// Run mode
    #[arg(long, value_enum, default_value = "bridge")]
    mode: Mode,

    /// WebSocket URL of the agent
    #[arg(long)]
    agent_url: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for obstacle generation
    #[arg(long)]
    seed: Option<u64>,

    /// Episodes to play in autoplay mode
    #[arg(long, default_value = "5")]
    episodes: usize,

    /// Reconnect when the agent goes away
    #[arg(long)]
    reconnect: bool,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Serve a remote agent over WebSocket
    Bridge,
    /// Play with the built-in rule-based agent
    Autoplay,
}

fn load_config(cli: &Cli) -> Result<BridgeConfig> {
    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    if let Some(url) = &cli.agent_url {
        config.agent_url = url.clone();
    }
    if let Some(seed) = cli.seed {
        config.runner.seed = Some(seed);
    }
    if cli.reconnect {
        config.reconnect = true;
    }

    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.mode {
        Mode::Bridge => BridgeMode::new(config).run().await?,
        Mode::Autoplay => AutoplayMode::new(config, cli.episodes).run().await?,
    }

    Ok(())
}
