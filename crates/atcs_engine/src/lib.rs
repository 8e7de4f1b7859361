//! atcs engine: fetch, parse, extract and persist a problem statement.
mod assets;
mod decode;
mod extract;
mod fetch;
mod persist;
mod pipeline;
mod types;

pub use assets::{AssetError, AssetOptions, AssetOutcome, AssetReport, AssetResolver, AssetStatus, SkipReason};
pub use decode::{decode_page, parse_page};
pub use extract::{ExtractError, Extractor, ExtractorConfig, StatementExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, PersistOutcome, Persister};
pub use pipeline::{PipelineConfig, PipelineError, StatementPipeline};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
