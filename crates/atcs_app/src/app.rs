use std::io;

use anyhow::Context;
use atcs_engine::{AssetReport, PersistOutcome, StatementPipeline};
use atcs_logging::atcs_info;

use crate::cli::Args;

/// Runs one fetch to completion on a fresh runtime.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let pipeline = StatementPipeline::new(args.pipeline_config())?;
    let target = args.target();
    atcs_info!("Fetching {} into {:?}", args.url, target);

    let mut stdout = io::stdout();
    let outcome = runtime.block_on(pipeline.run(&args.url, &target, &mut stdout))?;
    report(&outcome);
    Ok(())
}

fn report(outcome: &PersistOutcome) {
    if let PersistOutcome::Directory {
        assets: Some(result),
        ..
    } = outcome
    {
        match result {
            Ok(assets) => warn_skipped(assets),
            Err(err) => eprintln!("warning: failed to download images: {err}"),
        }
    }
    if let Some(path) = outcome.written_path() {
        println!("Saved problem data to {}", path.display());
    }
}

fn warn_skipped(assets: &AssetReport) {
    let skipped = assets.skipped_count();
    if skipped > 0 {
        eprintln!(
            "warning: {skipped} of {} images could not be saved (run with -v for details)",
            assets.outcomes.len()
        );
    }
}
