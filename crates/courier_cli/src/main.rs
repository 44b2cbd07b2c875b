use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use jiff::Timestamp;
use rand::{rngs::SmallRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use courier_optimizer::{
    parsers::{li_lim::LiLimParser, parser::DatasetParser},
    solver::{
        params::Params,
        solution::{summary::SolutionSummary, working_solution::Solution},
        two_stage::{minimize_fleet, two_stage_search},
    },
};

/// Solve a Li & Lim PDPTW benchmark instance.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// The benchmark file to solve
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Seed for the search rng; identical seeds reproduce identical runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Override the refinement iteration budget
    #[arg(long)]
    iterations: Option<usize>,

    /// Stop after the fleet-minimization stage
    #[arg(long)]
    skip_refinement: bool,

    /// Load parameters from a JSON file instead of the defaults
    #[arg(long)]
    params: Option<PathBuf>,

    /// Write the solution summary as JSON
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let started_at = Timestamp::now();

    let mut params = match &cli.params {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open parameter file {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("cannot parse parameter file {}", path.display()))?
        }
        None => Params::default(),
    };
    if let Some(iterations) = cli.iterations {
        params.iteration_num = iterations;
    }
    params.validate().context("invalid parameters")?;

    let mut instance = LiLimParser
        .parse(&cli.input)
        .with_context(|| format!("cannot read instance {}", cli.input.display()))?;
    instance.set_params(params);

    info!(
        requests = instance.requests().len(),
        vehicles = instance.vehicles().len(),
        "instance loaded"
    );

    let initial = Solution::new(&instance);
    let mut rng = SmallRng::seed_from_u64(cli.seed);

    let result = if cli.skip_refinement {
        minimize_fleet(instance, initial, &mut rng)?
    } else {
        two_stage_search(instance, initial, &mut rng)?
    };

    let summary = SolutionSummary::of(&result.solution, &result.instance);
    print!("{summary}");
    info!(elapsed = %Timestamp::now().duration_since(started_at), "done");

    if let Some(out) = &cli.out {
        let file = File::create(out)
            .with_context(|| format!("cannot create output file {}", out.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .with_context(|| format!("cannot write output file {}", out.display()))?;
        info!(path = %out.display(), "summary written");
    }

    Ok(())
}
