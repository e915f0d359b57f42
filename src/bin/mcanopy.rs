//! CLI entry point for the `mcanopy` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use movie_canopy::cli::commands;
use movie_canopy::{load_config, CanopyResult, ClusterConfig};

#[derive(Parser)]
#[command(
    name = "mcanopy",
    about = "Canopy + medoid clustering of movies from user ratings"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// TOML file with clustering options
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options overriding the config file.
#[derive(Args, Default)]
struct ClusterArgs {
    /// Loose canopy threshold
    #[arg(long)]
    t1: Option<f64>,
    /// Tight canopy threshold (must be >= t1)
    #[arg(long)]
    t2: Option<f64>,
    /// Refinement rounds
    #[arg(long = "iter")]
    iterations: Option<usize>,
    /// Size of the movie-id universe
    #[arg(long)]
    movie_count: Option<u32>,
    /// Worker threads (0 = one per CPU)
    #[arg(long)]
    workers: Option<usize>,
}

impl ClusterArgs {
    fn apply(&self, mut config: ClusterConfig) -> ClusterConfig {
        if let Some(t1) = self.t1 {
            config.t1 = t1;
        }
        if let Some(t2) = self.t2 {
            config.t2 = t2;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(movie_count) = self.movie_count {
            config.movie_count = movie_count;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score co-rated movie pairs and write the similarity store
    Similarity {
        /// Ratings file (movieId,userId,rating,date); "-" for stdin
        ratings: PathBuf,
        /// Where to write the similarity store
        store: PathBuf,
        #[command(flatten)]
        options: ClusterArgs,
    },
    /// Cluster movies from an existing similarity store
    Cluster {
        /// Path to the similarity store
        store: PathBuf,
        #[command(flatten)]
        options: ClusterArgs,
    },
    /// Run the whole pipeline from ratings to clusters
    Run {
        /// Ratings file (movieId,userId,rating,date); "-" for stdin
        ratings: PathBuf,
        /// Keep the similarity store at this path
        #[arg(long)]
        store: Option<PathBuf>,
        #[command(flatten)]
        options: ClusterArgs,
    },
    /// Show statistics about a similarity store
    Stats {
        /// Path to the similarity store
        store: PathBuf,
    },
}

fn resolve_config(path: Option<&PathBuf>, options: &ClusterArgs) -> CanopyResult<ClusterConfig> {
    let base = match path {
        Some(path) => load_config(path)?,
        None => ClusterConfig::default(),
    };
    let config = options.apply(base);
    config.validate()?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        Commands::Similarity {
            ratings,
            store,
            options,
        } => resolve_config(cli.config.as_ref(), options)
            .and_then(|config| commands::cmd_similarity(ratings, store, config, json)),
        Commands::Cluster { store, options } => resolve_config(cli.config.as_ref(), options)
            .and_then(|config| commands::cmd_cluster(store, config, json)),
        Commands::Run {
            ratings,
            store,
            options,
        } => resolve_config(cli.config.as_ref(), options)
            .and_then(|config| commands::cmd_run(ratings, store.as_deref(), config, json)),
        Commands::Stats { store } => commands::cmd_stats(store, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
