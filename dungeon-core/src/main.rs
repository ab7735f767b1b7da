use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use delver_core::engine::autoplay::choose_intent;
use delver_core::logging::{init_tracing, LogLevel, TracingConfig};
use delver_core::{GameConfig, GameEngine, TurnError};

/// Headless autoplay run of the dungeon core
#[derive(Debug, Parser)]
#[command(name = "delver", version, about)]
struct Cli {
    /// Game config file (.ron or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of turns to play
    #[arg(short, long, default_value_t = 1000)]
    turns: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<LogLevel>,

    /// Print the final level as ASCII
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let logging = match cli.log_level {
        Some(level) => TracingConfig::with_level(level),
        None => config.logging.clone(),
    };
    init_tracing(&logging);

    let mut engine = GameEngine::new(config).context("building the first level")?;
    let mut kills = 0;

    while engine.turn() < cli.turns {
        let intent = choose_intent(&engine);
        match engine.resolve_turn(intent) {
            Ok(report) => {
                kills += report.kills();
                if report.player_died() {
                    break;
                }
            }
            Err(TurnError::PlayerDead) => break,
            Err(err) => {
                // the bot picked something illegal; burn the turn instead
                warn!(?intent, %err, "intent rejected");
                engine.resolve_turn(delver_core::Intent::Wait)?;
            }
        }
    }

    let player = engine.player();
    let progress = engine.progress();
    info!(
        turns = engine.turn(),
        depth = engine.depth(),
        deepest = progress.deepest,
        level = player.level,
        gold = player.gold,
        carried_value = player.inventory.total_value(),
        kills,
        alive = !engine.is_over(),
        "run finished"
    );
    println!(
        "turns {} | depth {} (deepest {}) | level {} | gold {} (+{} carried) | kills {} | {}",
        engine.turn(),
        engine.depth(),
        progress.deepest,
        player.level,
        player.gold,
        player.inventory.total_value(),
        kills,
        if engine.is_over() { "dead" } else { "alive" }
    );
    if cli.map {
        print!("{}", engine.dungeon().to_ascii());
    }
    Ok(())
}
