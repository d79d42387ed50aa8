//! Availability probing for thumbnail URLs
//!
//! The image host does not answer missing resolutions with an HTTP error.
//! It serves a small generic placeholder instead, so a probe has to decode
//! the image header and look at its width.

use crate::core::thumbnail::{Availability, ThumbnailSet, ThumbnailTier};
use crate::error::ThumbError;
use crate::platform::client::ThumbnailClient;
use futures::future::join_all;
use image::ImageReader;
use std::io::Cursor;
use tracing::{debug, info};

/// Placeholder images are served at this width; real thumbnails are wider.
/// Tied to the current host's placeholder dimensions.
pub const MIN_THUMBNAIL_WIDTH: u32 = 120;

/// Check whether `url` resolves to a real thumbnail.
///
/// Every failure (transport, status, undecodable body) yields `false`.
pub async fn probe(client: &ThumbnailClient, url: &str) -> bool {
    match image_width(client, url).await {
        Ok(width) => {
            debug!("Probed {}: width {}", url, width);
            width > MIN_THUMBNAIL_WIDTH
        }
        Err(e) => {
            debug!("Probe failed for {}: {}", url, e);
            false
        }
    }
}

/// Probe all four tiers concurrently and join the results
pub async fn probe_all(client: &ThumbnailClient, set: &ThumbnailSet) -> Availability {
    let checks = set.iter().map(|(_, url)| probe(client, url));
    let results = join_all(checks).await;

    let mut availability = Availability::default();
    for (tier, available) in ThumbnailTier::ALL.into_iter().zip(results) {
        availability.set(tier, available);
    }

    info!(
        "Verified thumbnails for {}: {:?}",
        set.video_id(),
        availability.available_tiers()
    );
    availability
}

async fn image_width(client: &ThumbnailClient, url: &str) -> Result<u32, ThumbError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ThumbError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    decode_width(&bytes)
}

/// Read the pixel width from an encoded image header
pub fn decode_width(bytes: &[u8]) -> Result<u32, ThumbError> {
    let (width, _height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(width)
}
