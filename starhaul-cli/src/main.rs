mod config;
mod ollama;
mod repl;
mod server;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::info;
use starhaul_game::{CommandReport, EngineConfig, GameEngine, LogKind};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;

use config::FallbackConfig;
use ollama::GenerativeFallback;
use storage::FileStorage;

type HostEngine = GameEngine<FileStorage, GenerativeFallback>;

#[derive(Debug, Parser)]
#[command(name = "starhaul", version)]
#[command(about = "Starhaul space-trading game host: file saves, HTTP commands, and terminal play")]
struct Args {
    /// Directory holding the save file (game_state.json)
    #[arg(long, default_value = ".", global = true)]
    data_dir: PathBuf,

    /// Seed for reproducible world generation and rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Chance in [0, 1] that travel is interdicted
    #[arg(long, global = true)]
    interdiction_chance: Option<f64>,

    /// Ignore the generative fallback settings in the environment
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Serve POST /command and GET /state
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Apply one command and print the resulting state as JSON
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Print the current state as JSON
    State,
    /// Interactive terminal session (the default)
    Play,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut engine = boot(&args)?;
    info!("{}", engine.load_report());

    match args.mode.unwrap_or(Mode::Play) {
        Mode::Serve { addr } => tokio::runtime::Runtime::new()
            .context("starting async runtime")?
            .block_on(server::serve(engine, addr)),
        Mode::Exec { command } => {
            let report = engine.handle_command(&command.join(" "));
            print_report(&report)?;
            print_state(&engine)
        }
        Mode::State => print_state(&engine),
        Mode::Play => {
            let stdin = io::stdin();
            repl::run(&mut engine, stdin.lock(), &mut io::stdout()).context("terminal session")
        }
    }
}

fn boot(args: &Args) -> Result<HostEngine> {
    let config = EngineConfig {
        seed: args.seed,
        interdiction_chance: args
            .interdiction_chance
            .unwrap_or_else(EngineConfig::default_interdiction_chance),
        ..EngineConfig::default()
    };
    let fallback = if args.offline {
        GenerativeFallback::default()
    } else {
        GenerativeFallback::new(FallbackConfig::from_env())
    };
    GameEngine::boot(FileStorage::new(&args.data_dir), fallback, config)
        .context("invalid engine configuration")
}

fn print_report(report: &CommandReport) -> Result<()> {
    let mut err = io::stderr();
    for entry in &report.entries {
        let line = match entry.kind {
            LogKind::Error => entry.text.red(),
            LogKind::Player => entry.text.green(),
            LogKind::System => entry.text.cyan(),
        };
        writeln!(err, "{line}")?;
    }
    Ok(())
}

fn print_state(engine: &HostEngine) -> Result<()> {
    let json = serde_json::to_string_pretty(engine.state()).context("serializing state")?;
    writeln!(io::stdout(), "{json}")?;
    Ok(())
}
