//! Repressor pair sweep: simulate, save, reload, and plot threshold errors.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gram::figure::{render_heatmaps, HeatmapStyle};
use gram::persistence::{self, DEFAULT_RESULTS_FILE};
use gram::{threshold_error_matrices, Condition, Mechanism, PairSweep, SweepConfig};

#[derive(Parser)]
#[command(name = "repressor-pairs")]
#[command(about = "Threshold error of repressor pairs under metabolic conditions")]
#[command(long_about = None)]
struct Cli {
    /// JSON sweep configuration; omitted fields take their defaults
    #[arg(short, long, global = true, env = "GRAM_CONFIG")]
    config: Option<PathBuf>,

    /// Results file
    #[arg(short, long, global = true, default_value = DEFAULT_RESULTS_FILE)]
    output: PathBuf,

    /// Figure file (.png or .svg)
    #[arg(short, long, global = true, default_value = "threshold_error.png")]
    figure: PathBuf,

    /// Trajectories per ensemble (overrides the config file)
    #[arg(short = 'n', long, global = true)]
    trajectories: Option<usize>,

    /// RNG seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Mechanism of the permanent repressor (overrides the config file)
    #[arg(long, global = true)]
    permanent: Option<Mechanism>,

    /// Mechanism of the removed repressor (overrides the config file)
    #[arg(long, global = true)]
    removed: Option<Mechanism>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sweep and save results
    Simulate,

    /// Load saved results and render heatmaps
    Plot {
        /// Figure title
        #[arg(long)]
        title: Option<String>,
    },

    /// Simulate, save, reload, and plot
    Run {
        /// Figure title
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Simulate => simulate(&cli),
        Commands::Plot { title } => plot(&cli, title.clone()),
        Commands::Run { title } => {
            simulate(&cli)?;
            plot(&cli, title.clone())
        }
    }
}

fn load_config(cli: &Cli) -> Result<SweepConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => SweepConfig::default(),
    };
    if let Some(n) = cli.trajectories {
        config.n_trajectories = n;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(m) = cli.permanent {
        config.permanent = m;
    }
    if let Some(m) = cli.removed {
        config.removed = m;
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<SweepConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn simulate(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    info!(
        strengths = ?config.strengths,
        permanent = config.permanent.as_str(),
        removed = config.removed.as_str(),
        n_trajectories = config.n_trajectories,
        "starting repressor pair sweep"
    );

    let sweep = PairSweep::new(config).context("invalid sweep configuration")?;
    let results = sweep.run().context("sweep failed")?;
    persistence::save(&results, &cli.output)
        .with_context(|| format!("saving results to {}", cli.output.display()))?;
    Ok(())
}

fn plot(cli: &Cli, title: Option<String>) -> Result<()> {
    let results = persistence::load(&cli.output)
        .with_context(|| format!("loading results from {}", cli.output.display()))?;
    let matrices = threshold_error_matrices(&results.comparisons, results.size())?;

    for condition in Condition::ALL {
        let grid = &matrices[&condition];
        for (i, row) in grid.outer_iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.3}", v)).collect();
            info!(
                condition = condition.as_str(),
                permanent = results.strengths[i],
                "threshold error [{}]",
                cells.join(", ")
            );
        }
    }

    let style = HeatmapStyle {
        title,
        ..Default::default()
    };
    render_heatmaps(&matrices, &results.strengths, &cli.figure, &style)
        .with_context(|| format!("rendering {}", cli.figure.display()))?;
    Ok(())
}
