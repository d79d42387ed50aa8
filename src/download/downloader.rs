//! Progressive thumbnail downloader

use crate::core::progress::{
    Progress, PROGRESS_ASSEMBLED, PROGRESS_CONNECTED, PROGRESS_DONE, PROGRESS_PREPARING,
};
use crate::download::sink::SaveSink;
use crate::error::ThumbError;
use crate::platform::client::ThumbnailClient;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

// Declared lengths are only trusted this far when reserving memory
const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

/// Downloader configuration
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Read the body chunk by chunk and report progress per chunk
    pub streaming: bool,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self { streaming: true }
    }
}

/// Fetches a thumbnail into memory and hands it to a [`SaveSink`]
#[derive(Clone)]
pub struct ThumbnailDownloader {
    client: ThumbnailClient,
    sink: Arc<dyn SaveSink>,
    config: DownloaderConfig,
}

impl ThumbnailDownloader {
    /// Create a downloader with a custom save target
    pub fn with_sink(client: ThumbnailClient, sink: Arc<dyn SaveSink>) -> Self {
        Self {
            client,
            sink,
            config: DownloaderConfig::default(),
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: DownloaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable streamed reads
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.config.streaming = streaming;
        self
    }

    /// Download `url` and save it as `file_name`.
    ///
    /// Reports 10 before the request, 30 once the response is accepted,
    /// 30..=90 while streaming with a known length, 95 once assembled and
    /// 100 after the save. Any failure reports [`Progress::FAILED`] and
    /// returns the error.
    pub async fn download_with_progress<F>(
        &self,
        url: &str,
        file_name: &str,
        on_progress: F,
    ) -> Result<PathBuf, ThumbError>
    where
        F: Fn(Progress) + Send + Sync,
    {
        let mut progress = Progress::new(0);

        match self.run(url, file_name, &mut progress, &on_progress).await {
            Ok(path) => Ok(path),
            Err(e) => {
                warn!("Download of {} failed: {}", url, e);
                progress.fail();
                on_progress(progress);
                Err(e)
            }
        }
    }

    async fn run<F>(
        &self,
        url: &str,
        file_name: &str,
        progress: &mut Progress,
        on_progress: &F,
    ) -> Result<PathBuf, ThumbError>
    where
        F: Fn(Progress) + Send + Sync,
    {
        info!("Starting download from URL: {}", url);
        progress.set_stage(PROGRESS_PREPARING);
        on_progress(progress.clone());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ThumbError::Status(status.as_u16()));
        }

        progress.total_size = response.content_length().unwrap_or(0);
        progress.set_stage(PROGRESS_CONNECTED);
        on_progress(progress.clone());

        let data = if self.config.streaming {
            read_streamed(response, progress, on_progress).await?
        } else {
            let data = response.bytes().await?;
            progress.update(data.len() as u64);
            data
        };

        progress.set_stage(PROGRESS_ASSEMBLED);
        on_progress(progress.clone());

        let path = self.sink.save(file_name, data).await?;

        progress.set_stage(PROGRESS_DONE);
        on_progress(progress.clone());
        info!("Download completed: {} bytes", progress.downloaded_size);
        Ok(path)
    }
}

async fn read_streamed<F>(
    response: reqwest::Response,
    progress: &mut Progress,
    on_progress: &F,
) -> Result<Bytes, ThumbError>
where
    F: Fn(Progress) + Send + Sync,
{
    let mut buffer = BytesMut::with_capacity(progress.total_size.min(MAX_PREALLOC) as usize);
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        buffer.extend_from_slice(&chunk);
        progress.update(buffer.len() as u64);

        debug!("Downloaded {} bytes, total: {}", chunk.len(), buffer.len());

        if progress.total_size > 0 {
            on_progress(progress.clone());
        }
    }

    Ok(buffer.freeze())
}
