//! Main downloader implementation

use crate::core::progress::Progress;
use crate::core::thumbnail::{Availability, ThumbnailSet, ThumbnailTier, THUMBNAIL_HOST};
use crate::download::{DirectorySink, DownloaderConfig, SaveSink, ThumbnailDownloader};
use crate::error::ThumbError;
use crate::platform::client::{HttpClientConfig, ThumbnailClient};
use crate::platform::probe::probe_all;
use crate::utils::{parse_video_id, thumbnail_filename};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Main downloader configuration
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Directory downloads are saved into
    pub output_path: PathBuf,
    /// Base URL of the thumbnail host
    pub thumbnail_host: String,
    /// HTTP settings
    pub http: HttpClientConfig,
    /// Progressive download settings
    pub download: DownloaderConfig,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("."),
            thumbnail_host: THUMBNAIL_HOST.to_string(),
            http: HttpClientConfig::default(),
            download: DownloaderConfig::default(),
        }
    }
}

/// Resolves URLs, verifies tiers and downloads thumbnails
pub struct Downloader {
    options: DownloadOptions,
    sink: Option<Arc<dyn SaveSink>>,
}

impl Downloader {
    /// Create a new downloader with default options
    pub fn new() -> Self {
        Self {
            options: DownloadOptions::default(),
            sink: None,
        }
    }

    /// Set output directory
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.output_path = path.into();
        self
    }

    /// Set HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.http.timeout = Some(timeout);
        self
    }

    /// Override User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.http.user_agent = Some(user_agent.into());
        self
    }

    /// Route requests through a proxy
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.options.http.proxy_url = Some(proxy_url.into());
        self
    }

    /// Use another thumbnail host base URL
    pub fn with_thumbnail_host(mut self, host: impl Into<String>) -> Self {
        self.options.thumbnail_host = host.into();
        self
    }

    /// Enable or disable streamed body reads
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.options.download.streaming = streaming;
        self
    }

    /// Save into a custom target instead of the output directory
    pub fn with_sink(mut self, sink: Arc<dyn SaveSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Current options
    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Extract the video ID from `input` and derive its thumbnail URLs
    pub fn resolve(&self, input: &str) -> Result<ThumbnailSet, ThumbError> {
        let video_id = parse_video_id(input)?;
        info!("Resolved video ID: {}", video_id);
        Ok(ThumbnailSet::with_host(&self.options.thumbnail_host, &video_id))
    }

    /// Probe every tier of `set`
    pub async fn verify(&self, set: &ThumbnailSet) -> Result<Availability, ThumbError> {
        let client = self.client()?;
        Ok(probe_all(&client, set).await)
    }

    /// Download one tier of `set`, reporting progress
    pub async fn download<F>(
        &self,
        set: &ThumbnailSet,
        tier: ThumbnailTier,
        on_progress: F,
    ) -> Result<PathBuf, ThumbError>
    where
        F: Fn(Progress) + Send + Sync,
    {
        let file_name = thumbnail_filename(set.video_id(), tier);
        self.thumbnail_downloader()?
            .download_with_progress(set.url(tier), &file_name, on_progress)
            .await
    }

    /// Build a configured HTTP client
    pub fn client(&self) -> Result<ThumbnailClient, ThumbError> {
        ThumbnailClient::with_config(self.options.http.clone())
    }

    /// Build the progressive downloader used by [`Downloader::download`]
    pub fn thumbnail_downloader(&self) -> Result<ThumbnailDownloader, ThumbError> {
        let sink = self
            .sink
            .clone()
            .unwrap_or_else(|| Arc::new(DirectorySink::new(&self.options.output_path)));

        Ok(ThumbnailDownloader::with_sink(self.client()?, sink)
            .with_config(self.options.download.clone()))
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MemorySink;
    use crate::platform::probe::tests::png_bytes;

    #[test]
    fn test_downloader_creation() {
        let downloader = Downloader::new();
        assert_eq!(downloader.options().output_path, PathBuf::from("."));
        assert_eq!(downloader.options().thumbnail_host, THUMBNAIL_HOST);
        assert!(downloader.options().http.timeout.is_none());
        assert!(downloader.options().download.streaming);
    }

    #[test]
    fn test_downloader_builder() {
        let downloader = Downloader::new()
            .with_output_path("/tmp/thumbs")
            .with_timeout(Duration::from_secs(10))
            .with_user_agent("agent")
            .with_proxy("http://127.0.0.1:3128")
            .with_thumbnail_host("http://localhost:8080")
            .with_streaming(false);

        let options = downloader.options();
        assert_eq!(options.output_path, PathBuf::from("/tmp/thumbs"));
        assert_eq!(options.http.timeout, Some(Duration::from_secs(10)));
        assert_eq!(options.http.user_agent.as_deref(), Some("agent"));
        assert_eq!(options.http.proxy_url.as_deref(), Some("http://127.0.0.1:3128"));
        assert_eq!(options.thumbnail_host, "http://localhost:8080");
        assert!(!options.download.streaming);
    }

    #[test]
    fn test_resolve() {
        let downloader = Downloader::new();

        let set = downloader
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(set, ThumbnailSet::new("dQw4w9WgXcQ"));

        assert!(matches!(downloader.resolve(""), Err(ThumbError::EmptyInput)));
        assert!(matches!(
            downloader.resolve("https://example.com"),
            Err(ThumbError::UnrecognizedUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_and_download() {
        let mut server = mockito::Server::new_async().await;
        let id = "dQw4w9WgXcQ";
        let hq = png_bytes(480, 360);
        for (stem, status) in [("maxresdefault", 404), ("mqdefault", 404), ("sddefault", 404)] {
            server
                .mock("GET", format!("/vi/{id}/{stem}.jpg").as_str())
                .with_status(status)
                .create_async()
                .await;
        }
        server
            .mock("GET", format!("/vi/{id}/hqdefault.jpg").as_str())
            .with_status(200)
            .with_body(&hq)
            .expect_at_least(2)
            .create_async()
            .await;

        let sink = Arc::new(MemorySink::new());
        let downloader = Downloader::new()
            .with_thumbnail_host(server.url())
            .with_sink(sink.clone());

        let set = downloader.resolve(&format!("https://youtu.be/{id}")).unwrap();
        let availability = downloader.verify(&set).await.unwrap();
        assert_eq!(availability.available_tiers(), vec![ThumbnailTier::High]);

        let tier = availability.default_tier();
        let path = downloader.download(&set, tier, |_| {}).await.unwrap();

        assert_eq!(path, PathBuf::from("cyberthum-dQw4w9WgXcQ-hq.jpg"));
        assert_eq!(sink.saved()[0].1.as_ref(), hq.as_slice());
    }
}
