//! MeshFlux Inspect CLI
//!
//! Prints the MeshFlux client's stored settings, selected profile, provider
//! files and recent tunnel log lines. Read-only.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use meshflux_inspect::config::{
    default_base_dir, ContainerLayout, LogFilterConfig, DEFAULT_TAIL_LINES,
};
use meshflux_inspect::{report, InspectConfig, InspectError};

/// MeshFlux Inspect - dump the VPN client's on-disk state
#[derive(Parser, Debug)]
#[command(name = "meshflux-inspect")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Shared container directory (default: ~/Library/Group Containers/group.com.meshnetprotocol.OpenMesh)
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Log keyword to match; repeat to give several (replaces the built-in set)
    #[arg(short, long = "keyword", value_name = "TEXT")]
    keywords: Vec<String>,

    /// Matching log lines to keep per file
    #[arg(short, long, default_value_t = DEFAULT_TAIL_LINES)]
    tail: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: Args) -> Result<(), InspectError> {
    let base = match args.base {
        Some(base) => base,
        None => default_base_dir()?,
    };
    tracing::debug!("Inspecting container {:?}", base);

    let log_filter = LogFilterConfig::new(args.keywords, args.tail)?;
    let config = InspectConfig::new(ContainerLayout::new(base), log_filter);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::run(&config, &mut out)
}
