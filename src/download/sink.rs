//! Local save targets for downloaded thumbnails

use crate::error::ThumbError;
use crate::utils::generate_unique_filename;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::PersistError;
use tracing::{debug, info, warn};

// Names tried before giving up when other saves keep claiming them first
const MAX_NAME_ATTEMPTS: usize = 16;

/// Receives the assembled bytes of a download
#[async_trait]
pub trait SaveSink: Send + Sync {
    /// Save `data` under `file_name`, returning where it went
    async fn save(&self, file_name: &str, data: Bytes) -> Result<PathBuf, ThumbError>;
}

/// Writes files into a directory without overwriting existing ones
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Save into `dir`, creating it on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl SaveSink for DirectorySink {
    async fn save(&self, file_name: &str, data: Bytes) -> Result<PathBuf, ThumbError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let dir = self.dir.clone();
        let file_name = file_name.to_string();
        tokio::task::spawn_blocking(move || save_into(&dir, &file_name, &data))
            .await
            .map_err(|e| ThumbError::Generic(format!("save task failed: {}", e)))?
    }
}

/// Write `data` to a private temp file in `dir`, then move it to the first
/// free variant of `file_name`.
///
/// The move never replaces an existing file. When another save claims the
/// chosen name first, the next ` (n)` variant is tried. The temp file is
/// deleted on every error path when it is dropped.
fn save_into(dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf, ThumbError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".cyberthum-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    for _ in 0..MAX_NAME_ATTEMPTS {
        let final_name = generate_unique_filename(dir, file_name)?;
        let output_path = dir.join(&final_name);

        match tmp.persist_noclobber(&output_path) {
            Ok(_) => {
                info!("Saved {} bytes to {}", data.len(), output_path.display());
                return Ok(output_path);
            }
            Err(PersistError { error, file }) if error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} was claimed by another save, trying the next name", final_name);
                tmp = file;
            }
            Err(PersistError { error, file }) => {
                warn!("Saving {} failed: {}, cleaning up temp file", final_name, error);
                drop(file);
                return Err(error.into());
            }
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {}", file_name),
    )
    .into())
}

/// Keeps saved files in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<(String, Bytes)>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(file_name, bytes)` pair saved so far
    pub fn saved(&self) -> Vec<(String, Bytes)> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SaveSink for MemorySink {
    async fn save(&self, file_name: &str, data: Bytes) -> Result<PathBuf, ThumbError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| ThumbError::Generic("memory sink poisoned".to_string()))?;
        saved.push((file_name.to_string(), data));
        Ok(PathBuf::from(file_name))
    }
}
