use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skakie_engine::SearchConfig;
use skakie_engine::config::{DEFAULT_DEPTH, DEFAULT_QSEARCH_PLY};
use skakie_play::Session;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against the skakie engine", long_about = None)]
struct Args {
    /// Maximum iterative-deepening depth
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Maximum quiescence plies below the horizon
    #[arg(short, long, default_value_t = DEFAULT_QSEARCH_PLY)]
    qdepth: usize,

    /// Search moves in generation order
    #[arg(long)]
    no_sort: bool,

    /// Search quiescence captures in generation order
    #[arg(long)]
    no_qsort: bool,

    /// Disable the quiescence table
    #[arg(long)]
    no_qtt: bool,

    /// Per-move time budget in seconds, 0 for none
    #[arg(short, long, default_value_t = 0.0)]
    time: f64,

    /// Let the engine answer every move you enter
    #[arg(short, long)]
    auto: bool,
}

impl Args {
    fn search_config(&self) -> Result<SearchConfig> {
        let budget = Duration::try_from_secs_f64(self.time)
            .with_context(|| format!("invalid time budget: {}", self.time))?;
        Ok(SearchConfig {
            sort_moves: !self.no_sort,
            sort_qsearch_moves: !self.no_qsort,
            use_quiescence_table: !self.no_qtt,
            ..SearchConfig::default()
                .with_depth(self.depth)
                .with_qsearch_ply(self.qdepth)
                .with_time_budget(budget)
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout belongs to the game, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = args.search_config()?;
    info!(?config, auto = args.auto, "skakie starting");

    let mut session = Session::new(config, io::stdout().lock())
        .context("invalid search settings")?
        .with_auto_reply(args.auto);
    session.run(io::stdin().lock())?;
    Ok(())
}
