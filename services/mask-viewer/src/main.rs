//! Mask viewer
//!
//! Applies toggle and mask-selection commands to a configured map scene and
//! writes each published overlay as a PNG.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mask_viewer::{build_dispatcher, run_lines, SessionSummary};
use overlay::MaskConfig;

#[derive(Parser, Debug)]
#[command(name = "mask-viewer")]
#[command(about = "Toggle geographic masks over a map layer and export the overlays")]
struct Args {
    /// YAML configuration file (defaults to the built-in reference scene)
    #[arg(short, long, env = "MASK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory overlays are written to
    #[arg(short, long, env = "MASK_OUTPUT_DIR", default_value = "overlays")]
    output_dir: PathBuf,

    /// Mask kind to start with, overriding the configuration
    #[arg(short, long)]
    kind: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Commands to run (keys like `m`, `1`..`4`, or `toggle-mask`,
    /// `select-mask-kind <kind>`). Read from stdin when none are given.
    commands: Vec<String>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if args.json {
        fmt().with_env_filter(filter).with_target(true).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    let config = match &args.config {
        Some(path) => MaskConfig::load(path)?,
        None => {
            info!("No configuration given, using reference scene");
            MaskConfig::default()
        }
    };

    let mut dispatcher = build_dispatcher(config, &args.output_dir, args.kind.as_deref())?;

    if args.commands.is_empty() {
        let stdin = io::stdin();
        run_lines(&mut dispatcher, stdin.lock())?;
    } else {
        for command in &args.commands {
            dispatcher.dispatch_line(command);
        }
    }

    SessionSummary::of(&dispatcher).log();
    Ok(())
}
