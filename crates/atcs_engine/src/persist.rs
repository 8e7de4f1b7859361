use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use atcs_core::{OutputTarget, StatementRecord, RECORD_FILENAME};
use atcs_logging::{atcs_info, atcs_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::assets::{AssetError, AssetReport, AssetResolver};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ensure output directory exists; create it and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes files into one directory through a temp file and a rename, so a
/// failed write never leaves a truncated target behind.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: impl AsRef<Path>, content: &str) -> Result<PathBuf, PersistError> {
        self.write_bytes(filename, content.as_bytes())
    }

    pub fn write_bytes(
        &self,
        filename: impl AsRef<Path>,
        content: &[u8],
    ) -> Result<PathBuf, PersistError> {
        let mut tmp = self.begin()?;
        tmp.write_all(content)?;
        self.commit(tmp, filename)
    }

    /// Temp file in the target directory, to be filled and handed to [`Self::commit`].
    pub fn begin(&self) -> Result<NamedTempFile, PersistError> {
        ensure_output_dir(&self.dir)?;
        Ok(NamedTempFile::new_in(&self.dir)?)
    }

    pub fn commit(
        &self,
        mut tmp: NamedTempFile,
        filename: impl AsRef<Path>,
    ) -> Result<PathBuf, PersistError> {
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        let target = self.dir.join(filename);
        // Rename over any existing file.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

#[derive(Debug)]
pub enum PersistOutcome {
    Printed,
    File {
        path: PathBuf,
    },
    Directory {
        dir: PathBuf,
        record_path: PathBuf,
        /// `None` when the record has no images. An error here is a warning:
        /// the record file has already been written.
        assets: Option<Result<AssetReport, AssetError>>,
    },
}

impl PersistOutcome {
    /// Path the record was written to, if it went to disk.
    pub fn written_path(&self) -> Option<&Path> {
        match self {
            PersistOutcome::Printed => None,
            PersistOutcome::File { path } => Some(path),
            PersistOutcome::Directory { dir, .. } => Some(dir),
        }
    }
}

/// Writes a record to its [`OutputTarget`]; directory targets also receive the images.
pub struct Persister {
    resolver: AssetResolver,
}

impl Persister {
    pub fn new(resolver: AssetResolver) -> Self {
        Self { resolver }
    }

    pub async fn persist(
        &self,
        record: &StatementRecord,
        target: &OutputTarget,
        base_url: &str,
        stdout: &mut (dyn Write + Send),
    ) -> Result<PersistOutcome, PersistError> {
        let json = record.to_json()?;

        match target {
            OutputTarget::Stdout => {
                writeln!(stdout, "{json}")?;
                stdout.flush()?;
                Ok(PersistOutcome::Printed)
            }
            OutputTarget::File(path) => {
                let name = path.file_name().ok_or_else(|| {
                    PersistError::OutputDir(format!("{} has no file name", path.display()))
                })?;
                let dir = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                AtomicFileWriter::new(dir).write(name, &json)?;
                atcs_info!("wrote record to {}", path.display());
                Ok(PersistOutcome::File { path: path.clone() })
            }
            OutputTarget::Directory(dir) => {
                ensure_output_dir(dir)?;
                let record_path = AtomicFileWriter::new(dir.clone()).write(RECORD_FILENAME, &json)?;
                atcs_info!("wrote record to {}", record_path.display());

                let assets = if record.images().is_empty() {
                    None
                } else {
                    let result = self.resolver.resolve(base_url, record.images(), dir).await;
                    if let Err(err) = &result {
                        atcs_warn!("image download aborted: {}", err);
                    }
                    Some(result)
                };

                Ok(PersistOutcome::Directory {
                    dir: dir.clone(),
                    record_path,
                    assets,
                })
            }
        }
    }
}
