use std::path::{Path, PathBuf};
use std::sync::Arc;

use atcs_core::{
    inline_image_filename, remote_image_filename, ImageReference, InlineImage, ReferenceError,
};
use atcs_logging::{atcs_debug, atcs_info, atcs_warn};
use base64::Engine;
use url::Url;

use crate::fetch::Fetcher;
use crate::persist::AtomicFileWriter;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOptions {
    /// Decode `data:image/...` references into files. When off they are skipped.
    pub decode_inline: bool,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            decode_inline: true,
        }
    }
}

/// The only failure that stops a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("invalid base url '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },
}

/// Why a single image was not saved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("{0}")]
    Malformed(#[from] ReferenceError),
    #[error("inline images are disabled")]
    InlineDisabled,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
    #[error("cannot resolve url: {0}")]
    InvalidUrl(String),
    #[error("fetch failed: {0}")]
    Fetch(FetchError),
    #[error("write failed: {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Saved(PathBuf),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetOutcome {
    /// 1-based position in the reference list.
    pub index: usize,
    pub reference: String,
    pub status: AssetStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReport {
    pub outcomes: Vec<AssetOutcome>,
}

impl AssetReport {
    pub fn saved_count(&self) -> usize {
        self.saved_paths().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.saved_count()
    }

    pub fn saved_paths(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            AssetStatus::Saved(path) => Some(path.as_path()),
            AssetStatus::Skipped(_) => None,
        })
    }
}

/// Turns image references into files, one at a time, in list order.
pub struct AssetResolver {
    fetcher: Arc<dyn Fetcher>,
    options: AssetOptions,
}

impl AssetResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, options: AssetOptions) -> Self {
        Self { fetcher, options }
    }

    /// Saves every reference it can into `output_dir`.
    ///
    /// Per-item failures are logged and recorded in the report; only an
    /// unparsable `base_url` fails the call.
    pub async fn resolve(
        &self,
        base_url: &str,
        references: &[String],
        output_dir: &Path,
    ) -> Result<AssetReport, AssetError> {
        let base = Url::parse(base_url).map_err(|err| AssetError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        let writer = AtomicFileWriter::new(output_dir.to_path_buf());

        let mut report = AssetReport::default();
        for (position, reference) in references.iter().enumerate() {
            let index = position + 1;
            let status = match self.resolve_one(&base, reference, index, &writer).await {
                Ok(path) => {
                    atcs_debug!("image {} saved to {}", index, path.display());
                    AssetStatus::Saved(path)
                }
                Err(reason) => {
                    atcs_warn!("skipping image {} ({}): {}", index, abbreviate(reference), reason);
                    AssetStatus::Skipped(reason)
                }
            };
            report.outcomes.push(AssetOutcome {
                index,
                reference: reference.clone(),
                status,
            });
        }

        atcs_info!(
            "images: {} saved, {} skipped",
            report.saved_count(),
            report.skipped_count()
        );
        Ok(report)
    }

    async fn resolve_one(
        &self,
        base: &Url,
        reference: &str,
        index: usize,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, SkipReason> {
        match ImageReference::parse(reference)? {
            ImageReference::Inline(image) => self.save_inline(image, index, writer),
            ImageReference::Remote(raw) => self.save_remote(base, raw, index, writer).await,
        }
    }

    fn save_inline(
        &self,
        image: InlineImage<'_>,
        index: usize,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, SkipReason> {
        if !self.options.decode_inline {
            return Err(SkipReason::InlineDisabled);
        }
        // Data URIs are sometimes line-wrapped.
        let payload: String = image
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|err| SkipReason::InvalidBase64(err.to_string()))?;
        let filename = inline_image_filename(index, image.extension());
        writer
            .write_bytes(filename, &bytes)
            .map_err(|err| SkipReason::Write(err.to_string()))
    }

    async fn save_remote(
        &self,
        base: &Url,
        raw: &str,
        index: usize,
        writer: &AtomicFileWriter,
    ) -> Result<PathBuf, SkipReason> {
        let url = base
            .join(raw)
            .map_err(|err| SkipReason::InvalidUrl(err.to_string()))?;
        let filename = remote_image_filename(&url, index);

        let mut tmp = writer
            .begin()
            .map_err(|err| SkipReason::Write(err.to_string()))?;
        self.fetcher
            .download(&url, tmp.as_file_mut())
            .await
            .map_err(|err| match err.kind {
                FailureKind::Io => SkipReason::Write(err.message),
                _ => SkipReason::Fetch(err),
            })?;
        writer
            .commit(tmp, filename)
            .map_err(|err| SkipReason::Write(err.to_string()))
    }
}

// Inline payloads can be megabytes long; keep log lines readable.
fn abbreviate(reference: &str) -> String {
    const MAX_CHARS: usize = 80;
    if reference.chars().count() <= MAX_CHARS {
        return reference.to_string();
    }
    let head: String = reference.chars().take(MAX_CHARS).collect();
    format!("{head}...")
}
