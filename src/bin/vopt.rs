//! CLI collaborator: `vopt <point_file> [<tour_file>]`.
//!
//! Reads points and an optional initial tour, runs the optimizer, and
//! prints the resulting cycle and length. File I/O and CLI parsing live
//! here, outside the core, per the crate's scope.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use vopt::{fileio, OptimizerConfig, PerturbationPolicy, Points};

#[derive(Parser, Debug)]
#[command(name = "vopt", about = "Quadtree-accelerated V-move local search for the planar TSP")]
struct Args {
    /// Path to the point file (one `x,y` pair per line).
    point_file: PathBuf,

    /// Optional initial tour file; defaults to the identity permutation.
    tour_file: Option<PathBuf>,

    /// Maximum quadtree depth.
    #[arg(long, default_value_t = OptimizerConfig::default().max_tree_depth)]
    max_tree_depth: u8,

    /// Verify the cycle invariant after every accepted move.
    #[arg(long)]
    verify: bool,

    /// Log every hill-climb iteration at info level.
    #[arg(long)]
    print_iterations: bool,

    /// Run the perturbation stage after reaching a local optimum.
    #[arg(long)]
    perturb: bool,

    /// Perturbation policy, when `--perturb` is set.
    #[arg(long, value_enum, default_value_t = PerturbationPolicyArg::Lax)]
    perturbation_policy: PerturbationPolicyArg,

    /// Write the resulting tour to this file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum PerturbationPolicyArg {
    Strict,
    Lax,
}

impl From<PerturbationPolicyArg> for PerturbationPolicy {
    fn from(value: PerturbationPolicyArg) -> Self {
        match value {
            PerturbationPolicyArg::Strict => PerturbationPolicy::Strict,
            PerturbationPolicyArg::Lax => PerturbationPolicy::Lax,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        // Preserves the original's exit-0-on-bad-input behavior: print a
        // diagnostic and exit successfully rather than with an error code.
        eprintln!("vopt: {err:#}");
        std::process::exit(0);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let (x, y) = fileio::read_points(&args.point_file)
        .with_context(|| format!("reading point file {}", args.point_file.display()))?;
    let n = x.len();

    let initial_cycle = match &args.tour_file {
        Some(path) => fileio::read_tour(path).with_context(|| format!("reading tour file {}", path.display()))?,
        None => fileio::identity_order(n),
    };

    let config = OptimizerConfig {
        max_tree_depth: args.max_tree_depth,
        verify: args.verify,
        print_iterations: args.print_iterations,
    };
    let points = Points { x, y };

    let solution = if args.perturb {
        vopt::optimize_with_perturbation(&points, &initial_cycle, args.perturbation_policy.into(), config)
    } else {
        vopt::optimize(&points, &initial_cycle, config)
    }
    .map_err(|e| anyhow::anyhow!(e))
    .context("optimizing tour")?;

    println!("length: {}", solution.length);
    println!("iterations: {}", solution.iterations);

    if let Some(output) = &args.output {
        fileio::write_tour(output, &solution.ordered_points)
            .with_context(|| format!("writing tour file {}", output.display()))?;
    }

    Ok(())
}
