use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use duel_bot::bot::{BotConfig, DuelBot};
use duel_bot::fixture::FieldFixture;
use duel_bot::net::Connection;
use duel_bot::protocol::ProtocolError;
use duel_bot::scanner::{scan, AngleRange};
use duel_bot::solver::{solve_player_spread, DEFAULT_BUDGET};
use duel_bot::strategy::{create_strategy, describe_strategies, DEFAULT_STRATEGY};
use duel_core::sim::SimulationConfig;

#[derive(Parser, Debug)]
#[command(name = "duel-bot")]
#[command(about = "Aiming bot for the gravity artillery duel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to a game server and play
    Play {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3490)]
        port: u16,
        /// Name announced to the server
        #[arg(long, default_value = "gravbot")]
        name: String,
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,
        /// Independent solver seeds per shot
        #[arg(long, default_value_t = 4)]
        seeds: usize,
        /// Objective evaluations per seed
        #[arg(long, default_value_t = DEFAULT_BUDGET)]
        budget: usize,
        /// Receive poll timeout in milliseconds
        #[arg(long, default_value_t = 200)]
        recv_timeout_ms: u64,
        /// Delay before reconnecting after a dropped connection
        #[arg(long, default_value_t = 5)]
        retry_secs: u64,
    },
    /// Solve one shot offline against a field fixture
    Solve {
        #[arg(long)]
        field: PathBuf,
        /// Target player id; defaults to the launcher's first opponent
        #[arg(long)]
        target: Option<u32>,
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,
        #[arg(long, default_value_t = 4)]
        seeds: usize,
        #[arg(long, default_value_t = DEFAULT_BUDGET)]
        budget: usize,
    },
    /// Sweep angles at fixed energy against a field fixture
    Scan {
        #[arg(long)]
        field: PathBuf,
        #[arg(long, default_value_t = 10.0)]
        energy: f64,
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        #[arg(long, default_value_t = 360.0)]
        stop: f64,
        #[arg(long, default_value_t = 1.0)]
        step: f64,
    },
    /// List available aiming strategies
    ListStrategies,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play {
            host,
            port,
            name,
            strategy,
            seeds,
            budget,
            recv_timeout_ms,
            retry_secs,
        } => play(
            &host,
            port,
            BotConfig {
                name,
                strategy,
                seeds,
                budget,
            },
            Duration::from_millis(recv_timeout_ms),
            Duration::from_secs(retry_secs),
        ),
        Commands::Solve {
            field,
            target,
            strategy,
            seeds,
            budget,
        } => solve_offline(&field, target, &strategy, seeds, budget),
        Commands::Scan {
            field,
            energy,
            start,
            stop,
            step,
        } => scan_offline(&field, energy, start, stop, step),
        Commands::ListStrategies => {
            for (id, description) in describe_strategies() {
                println!("{id:<14} {description}");
            }
            Ok(())
        }
    }
}

fn play(
    host: &str,
    port: u16,
    config: BotConfig,
    recv_timeout: Duration,
    retry: Duration,
) -> Result<()> {
    let mut bot = DuelBot::new(config)?;
    loop {
        match Connection::open(host, port, recv_timeout) {
            Ok(mut conn) => {
                if let Err(err) = bot.run(&mut conn) {
                    // A version mismatch will not fix itself; do not retry.
                    if matches!(
                        err.downcast_ref::<ProtocolError>(),
                        Some(ProtocolError::Deprecated { .. })
                    ) {
                        return Err(err);
                    }
                    error!(%err, "connection lost");
                }
            }
            Err(err) => warn!(%err, "connect failed"),
        }
        info!(secs = retry.as_secs(), "retrying");
        thread::sleep(retry);
    }
}

fn solve_offline(
    path: &PathBuf,
    target: Option<u32>,
    strategy_id: &str,
    seeds: usize,
    budget: usize,
) -> Result<()> {
    let fixture = FieldFixture::load(path)?;
    let field = fixture.to_field();
    let strategy = create_strategy(strategy_id)
        .ok_or_else(|| anyhow!("unknown aiming strategy '{strategy_id}'"))?;
    let target = target
        .or_else(|| field.opponents(fixture.launcher).next().map(|p| p.id))
        .ok_or_else(|| anyhow!("fixture has no opponent to target"))?;

    let config = SimulationConfig::default();
    let solution = solve_player_spread(
        &config,
        &field,
        fixture.launcher,
        target,
        strategy.as_ref(),
        budget,
        seeds,
    )
    .context("solve rejected")?;
    println!("{}", serde_json::to_string_pretty(&solution)?);
    Ok(())
}

fn scan_offline(path: &PathBuf, energy: f64, start: f64, stop: f64, step: f64) -> Result<()> {
    let fixture = FieldFixture::load(path)?;
    let field = fixture.to_field();
    let launcher = field
        .player(fixture.launcher)
        .ok_or_else(|| anyhow!("launcher {} is not in the fixture", fixture.launcher))?;
    let origin = launcher.position;

    let config = SimulationConfig::default();
    match scan(
        &config,
        &field,
        fixture.launcher,
        origin,
        AngleRange { start, stop, step },
        energy,
    ) {
        Some(angle) => println!("angle {angle:.3} at energy {energy} hits an opponent"),
        None => println!("no hitting angle in [{start}, {stop}) at energy {energy}"),
    }
    Ok(())
}
