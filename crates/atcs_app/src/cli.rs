//! Command line surface.

use std::path::PathBuf;
use std::time::Duration;

use atcs_core::OutputTarget;
use atcs_engine::{AssetOptions, ExtractorConfig, FetchSettings, PipelineConfig};
use atcs_logging::LogSettings;
use clap::{ArgAction, Parser};

const EXAMPLES: &str = "\
Examples:
  # Print the record as JSON
  atcs https://atcoder.jp/contests/abc123/tasks/abc123_a

  # Save into a directory (images are downloaded too)
  atcs https://atcoder.jp/contests/abc123/tasks/abc123_a problem_data

  # Save to a single file (no images)
  atcs https://atcoder.jp/contests/abc123/tasks/abc123_a output.json";

/// Fetch an AtCoder problem statement and save it locally.
///
/// The record holds the problem text, constraints, input format and the
/// image references found on the page.
#[derive(Parser, Debug)]
#[command(name = "atcs", version, about, after_help = EXAMPLES)]
pub struct Args {
    /// Problem page URL
    pub url: String,

    /// Output path: with an extension it is written as one JSON file, without
    /// one it is created as a directory holding problem.json and the images
    pub output: Option<PathBuf>,

    /// Statement language variant to read (the page's `lang-<LANG>` block)
    #[arg(long, default_value = "ja", value_name = "LANG")]
    pub lang: String,

    /// Give up on any request after this many seconds (default: wait forever)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Skip images embedded as data: URIs
    #[arg(long)]
    pub no_inline_images: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn target(&self) -> OutputTarget {
        match &self.output {
            None => OutputTarget::Stdout,
            Some(path) => OutputTarget::from_path(path.clone()),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            fetch: FetchSettings {
                request_timeout: self.timeout.map(Duration::from_secs),
                ..FetchSettings::default()
            },
            extractor: ExtractorConfig::for_language(&self.lang),
            assets: AssetOptions {
                decode_inline: !self.no_inline_images,
            },
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings::from_verbosity(self.verbose, self.log_file.clone())
    }
}
