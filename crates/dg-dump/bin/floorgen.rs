//! Floor generator dump tool
//!
//! Generates one floor and prints it as ASCII, optionally followed by the
//! generation report or the whole grid as JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dg_core::dungeon::{FloorBuilder, FloorParams, Structure};
use dg_core::GameRng;

/// Generate a dungeon floor and print it
#[derive(Parser, Debug)]
#[command(name = "floorgen")]
#[command(author, version, about = "Dump procedurally generated floors", long_about = None)]
struct Args {
    /// RNG seed (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Structure (standard, small, medium, line, ring, cross, beetle, crossroads)
    #[arg(short = 't', long = "structure")]
    structure: Option<Structure>,

    /// JSON file with floor parameters; missing fields keep their defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of consecutive floors to generate from the same stream
    #[arg(short = 'n', long = "count", default_value_t = 1)]
    count: u32,

    /// Print the generation report after each floor
    #[arg(short = 'r', long = "report")]
    report: bool,

    /// Print the grid as JSON instead of ASCII
    #[arg(long = "json")]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "dg_core=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_params(args: &Args) -> Result<FloorParams> {
    let mut params = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<FloorParams>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => FloorParams::default(),
    };
    if let Some(structure) = args.structure {
        params.structure = structure;
    }
    Ok(params)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let params = load_params(&args)?;
    let rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    let seed = rng.seed();
    info!(seed, structure = %params.structure, count = args.count, "generating floors");
    let mut builder = FloorBuilder::new(params, rng);

    for index in 0..args.count {
        let floor = builder
            .build_floor()
            .with_context(|| format!("floor {index} from seed {seed}"))?;

        if args.json {
            println!("{}", serde_json::to_string(&floor.grid)?);
        } else {
            println!("seed {seed} floor {index} ({})", builder.params().structure);
            print!("{}", floor.grid.render_ascii());
        }
        if args.report {
            println!("{:#?}", floor.report);
        }
    }
    Ok(())
}
