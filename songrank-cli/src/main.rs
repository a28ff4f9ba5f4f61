//! SongRank CLI: number generation and the songs API server.
//!
//! Commands:
//! - `generate`: print the weighted descending sequence for a range
//! - `serve`: run the HTTP API against Supabase or an in-memory table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use songrank_api::AppConfig;
use songrank_core::format::{format_value, histogram, print_sequence};
use songrank_core::generator::generate_numbers;
use songrank_store::{MemoryStore, SongStore, SupabaseStore};
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

#[derive(Parser)]
#[command(name = "songrank", about = "SongRank CLI: score generation and songs API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a weighted descending sequence over an integer range.
    Generate {
        /// Upper bound, emitted exactly once.
        #[arg(long, default_value_t = 99, allow_negative_numbers = true)]
        max_num: i64,

        /// Lower bound.
        #[arg(long, default_value_t = 90, allow_negative_numbers = true)]
        min_num: i64,

        /// Number of values to produce.
        #[arg(long, default_value_t = 100)]
        total_count: usize,

        /// Also print how many values fall on each integer.
        #[arg(long, default_value_t = false)]
        counts: bool,
    },
    /// Serve the songs HTTP API.
    Serve {
        /// Path to a TOML config file with [server] and [store] tables.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Listen address, overriding the config file.
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Serve an in-memory table instead of Supabase.
        #[arg(long, default_value_t = false)]
        memory: bool,

        /// JSON array of rows to seed the in-memory table with.
        #[arg(long, requires = "memory")]
        seed: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Generate {
            max_num,
            min_num,
            total_count,
            counts,
        } => run_generate(max_num, min_num, total_count, counts),
        Commands::Serve {
            config,
            bind,
            memory,
            seed,
        } => run_serve(config.as_deref(), bind, memory, seed.as_deref()),
    }
}

/// Logs go to stderr so generated values stay clean on stdout.
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("SONGRANK_LOG")
            .unwrap_or_else(|_| EnvFilter::new("songrank=info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    });
}

fn run_generate(max_num: i64, min_num: i64, total_count: usize, counts: bool) -> Result<()> {
    let values = generate_numbers(max_num, min_num, total_count)?;
    tracing::debug!(max_num, min_num, total_count, "sequence generated");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "Total numbers generated: {}", values.len())?;
    print_sequence(&values, &mut out)?;

    if counts {
        writeln!(out)?;
        for (integer, count) in histogram(&values) {
            writeln!(out, "{}: {count}", format_value(integer as f64))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_serve(
    config_path: Option<&Path>,
    bind: Option<SocketAddr>,
    memory: bool,
    seed: Option<&Path>,
) -> Result<()> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    // The blocking HTTP client must be built and dropped outside the runtime.
    let store: Arc<dyn SongStore> = if memory {
        Arc::new(memory_store(seed)?)
    } else {
        Arc::new(SupabaseStore::new(&config.store)?)
    };
    tracing::info!(store = store.name(), bind = %config.server.bind, "starting songs API");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(songrank_api::serve(&config.server, Arc::clone(&store)))?;
    drop(runtime);
    drop(store);

    tracing::info!("songs API stopped");
    Ok(())
}

fn memory_store(seed: Option<&Path>) -> Result<MemoryStore> {
    let Some(path) = seed else {
        return Ok(MemoryStore::new());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed rows from {}", path.display()))?;
    let store = MemoryStore::from_json(&json)?;
    tracing::info!(rows = store.len(), path = %path.display(), "seeded memory store");
    Ok(store)
}
