mod config;
mod palette;
mod presenter;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use twenty48_core::{Session, game_loop};

use config::Config;
use palette::Palette;
use presenter::TermPresenter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play 2048 in the terminal, one command per line")]
struct Cli {
    /// TOML file with optional [game] and [palette] sections
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Board side length (overrides the config file)
    #[arg(long, value_name = "N")]
    size: Option<usize>,

    /// Tiles dealt on a fresh board (overrides the config file)
    #[arg(long, value_name = "N")]
    initial_tiles: Option<usize>,

    /// Seed for reproducible tile spawns (random if omitted)
    #[arg(long, value_name = "U64")]
    seed: Option<u64>,

    /// Disable colours
    #[arg(long)]
    plain: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut cfg = match &cli.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if let Some(n) = cli.size {
        cfg.game.board_size = n;
    }
    if let Some(n) = cli.initial_tiles {
        cfg.game.initial_tiles = n;
    }
    let palette = if cli.plain {
        None
    } else {
        Some(Palette::from_config(&cfg.palette)?)
    };

    let mut session = match cli.seed {
        Some(seed) => Session::seeded(cfg.game, seed)?,
        None => Session::from_entropy(cfg.game)?,
    };
    info!(
        "board {n}x{n}, seed {:?}",
        cli.seed,
        n = session.config().board_size
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut presenter = TermPresenter::new(stdin.lock(), stdout.lock(), palette);
    presenter.print_help()?;
    let summary = game_loop::run(&mut session, &mut presenter)?;
    drop(presenter);

    info!(
        "Finished: {} moves, highest tile {}",
        summary.moves, summary.highest_tile
    );
    println!(
        "Final score: {}, high score: {}",
        summary.score, summary.high_score
    );
    Ok(())
}
