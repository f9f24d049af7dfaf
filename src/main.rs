//! bfem - conductor network checks
//!
//! Verifies that an exported conductor network is a single series path and
//! estimates its air-only effective capacitance.
//!
//! # Usage
//!
//! ```bash
//! bfem topology network.json --tol-mm 1e-3
//! bfem capacitance network.json --search-mm 3.0 --min-index-sep 50 --parallel-cos 0.95 --k 0.35
//! bfem check network.json --json
//! ```
//!
//! Exit status is 0 on success, 1 when the topology check fails, and 2 on
//! any error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bfem_core::{
    capacitance::{self, EstimatorConfig},
    error::Result,
    network,
    topology::{self, EdgeMode, TopologyConfig},
};

/// Conductor network connectivity and capacitance checks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify that the network forms a single series path
    Topology {
        /// Exported network file (.json)
        #[arg(value_name = "NETWORK_FILE")]
        file: PathBuf,

        #[command(flatten)]
        topology: TopologyArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate the air-only effective capacitance of the first path
    Capacitance {
        /// Exported network file (.json)
        #[arg(value_name = "NETWORK_FILE")]
        file: PathBuf,

        #[command(flatten)]
        estimator: EstimatorArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run both checks
    Check {
        /// Exported network file (.json)
        #[arg(value_name = "NETWORK_FILE")]
        file: PathBuf,

        #[command(flatten)]
        topology: TopologyArgs,

        #[command(flatten)]
        estimator: EstimatorArgs,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct TopologyArgs {
    /// Endpoint match tolerance in mm
    #[arg(long, default_value_t = 1e-3)]
    tol_mm: f64,

    /// How paths become graph edges
    #[arg(long, value_enum, default_value_t = EdgeMode::Segments)]
    edges: EdgeMode,
}

#[derive(clap::Args, Debug)]
struct EstimatorArgs {
    /// Neighbor search radius in mm
    #[arg(long, default_value_t = 3.0)]
    search_mm: f64,

    /// Ignore pairs closer than this many segments along the path
    #[arg(long, default_value_t = capacitance::DEFAULT_MIN_INDEX_SEP)]
    min_index_sep: usize,

    /// Minimum |cos(theta)| for segments to count as parallel
    #[arg(long, default_value_t = capacitance::DEFAULT_PARALLEL_COS)]
    parallel_cos: f64,

    /// Fudge factor multiplying eps0*A/gap
    #[arg(long, default_value_t = capacitance::DEFAULT_K_FACTOR)]
    k: f64,
}

impl From<&TopologyArgs> for TopologyConfig {
    fn from(args: &TopologyArgs) -> Self {
        TopologyConfig::new()
            .with_tolerance_mm(args.tol_mm)
            .with_edge_mode(args.edges)
    }
}

impl From<&EstimatorArgs> for EstimatorConfig {
    fn from(args: &EstimatorArgs) -> Self {
        EstimatorConfig::new()
            .with_search_radius_mm(args.search_mm)
            .with_min_index_sep(args.min_index_sep)
            .with_parallel_cos(args.parallel_cos)
            .with_k_factor(args.k)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Topology {
            file,
            topology: topo_args,
            json,
        } => {
            let net = network::load_file(&file)?;
            let report = topology::verify_network(&net, &TopologyConfig::from(&topo_args))?;
            if json {
                print_json(&serde_json::to_value(&report)?)?;
            } else {
                println!("{}", report);
            }
            Ok(topology_status(report.is_single_series_path()))
        }

        Command::Capacitance {
            file,
            estimator: est_args,
            json,
        } => {
            let net = network::load_file(&file)?;
            let report = capacitance::estimate_network(&net, &EstimatorConfig::from(&est_args))?;
            if json {
                print_json(&serde_json::to_value(&report)?)?;
            } else {
                println!("{}", report);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Check {
            file,
            topology: topo_args,
            estimator: est_args,
            json,
        } => {
            let net = network::load_file(&file)?;
            let topo = topology::verify_network(&net, &TopologyConfig::from(&topo_args))?;
            let cap = capacitance::estimate_network(&net, &EstimatorConfig::from(&est_args))?;
            if json {
                print_json(&serde_json::json!({
                    "topology": topo,
                    "capacitance": cap,
                }))?;
            } else {
                println!("{}\n\n{}", topo, cap);
            }
            Ok(topology_status(topo.is_single_series_path()))
        }
    }
}

fn topology_status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
