use std::io::Write;
use std::sync::Arc;

use atcs_core::{OutputTarget, StatementRecord};
use atcs_logging::atcs_info;

use crate::assets::{AssetOptions, AssetResolver};
use crate::decode::parse_page;
use crate::extract::{ExtractError, Extractor, ExtractorConfig, StatementExtractor};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::persist::{PersistError, PersistOutcome, Persister};
use crate::FetchError;

/// Everything configurable about one run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub fetch: FetchSettings,
    pub extractor: ExtractorConfig,
    pub assets: AssetOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to set up http client: {0}")]
    Client(FetchError),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Fetch -> parse -> extract -> persist, one step after the other.
pub struct StatementPipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Box<dyn Extractor>,
    persister: Persister,
}

impl StatementPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone()).map_err(PipelineError::Client)?;
        Self::with_fetcher(Arc::new(fetcher), config)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn Fetcher>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let extractor = StatementExtractor::new(config.extractor)?;
        let persister = Persister::new(AssetResolver::new(fetcher.clone(), config.assets));
        Ok(Self {
            fetcher,
            extractor: Box::new(extractor),
            persister,
        })
    }

    pub async fn fetch_record(&self, url: &str) -> Result<StatementRecord, PipelineError> {
        let output = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| PipelineError::Fetch {
                url: url.to_string(),
                source,
            })?;
        let document = parse_page(&output.bytes, output.metadata.content_type.as_deref());
        let record = self.extractor.extract(&document)?;
        atcs_info!(
            "extracted statement from {} ({} images)",
            output.metadata.final_url,
            record.images().len()
        );
        Ok(record)
    }

    /// Full run. Relative image references resolve against `url` as given.
    pub async fn run(
        &self,
        url: &str,
        target: &OutputTarget,
        stdout: &mut (dyn Write + Send),
    ) -> Result<PersistOutcome, PipelineError> {
        let record = self.fetch_record(url).await?;
        Ok(self.persister.persist(&record, target, url, stdout).await?)
    }
}
