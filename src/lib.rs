//! # cyberthum - YouTube thumbnail grabber
//!
//! Resolves a YouTube link to its video ID, derives the four thumbnail
//! URLs the image host serves for it and downloads the chosen one.
//!
//! ## Features
//!
//! - Video ID extraction from watch, short, embed, `/v/` and `/u/` links
//! - Availability probing by image width
//! - Progressive downloads with progress reporting
//! - A bounded queue of recent downloads
//!
//! ## Example
//!
//! ```rust,no_run
//! use cyberthum::Downloader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = Downloader::new().with_output_path("./thumbs");
//!
//!     let set = downloader.resolve("https://youtu.be/dQw4w9WgXcQ")?;
//!     let availability = downloader.verify(&set).await?;
//!     let path = downloader
//!         .download(&set, availability.default_tier(), |_| {})
//!         .await?;
//!     println!("Saved: {}", path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod download;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use core::{
    update, AppState, Availability, Command, DownloadOptions, DownloadQueue, Downloader, Message,
    Progress, ThumbnailSet, ThumbnailTier,
};
pub use error::ThumbError;

/// Result type alias for cyberthum operations
pub type Result<T> = std::result::Result<T, ThumbError>;
