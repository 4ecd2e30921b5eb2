//! Light Curve Pipeline - Main Entry Point

use clap::Parser;
use pipeline_cli::{init_logging, run, Cli};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    info!("=== Light Curve Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    run(cli)
}
