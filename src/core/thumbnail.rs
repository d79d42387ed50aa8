//! Thumbnail tiers, URL sets and availability

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Public host serving video thumbnails
pub const THUMBNAIL_HOST: &str = "https://img.youtube.com";

/// One of the four fixed image resolutions the host serves per video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThumbnailTier {
    #[serde(rename = "maxRes")]
    MaxRes,
    #[serde(rename = "hq")]
    High,
    #[serde(rename = "mq")]
    Medium,
    #[serde(rename = "sd")]
    Standard,
}

impl ThumbnailTier {
    /// All tiers, highest resolution first
    pub const ALL: [ThumbnailTier; 4] = [
        ThumbnailTier::MaxRes,
        ThumbnailTier::High,
        ThumbnailTier::Medium,
        ThumbnailTier::Standard,
    ];

    /// Short key used in file names and JSON output
    pub fn key(&self) -> &'static str {
        match self {
            ThumbnailTier::MaxRes => "maxRes",
            ThumbnailTier::High => "hq",
            ThumbnailTier::Medium => "mq",
            ThumbnailTier::Standard => "sd",
        }
    }

    /// Image file stem on the thumbnail host
    pub fn file_stem(&self) -> &'static str {
        match self {
            ThumbnailTier::MaxRes => "maxresdefault",
            ThumbnailTier::High => "hqdefault",
            ThumbnailTier::Medium => "mqdefault",
            ThumbnailTier::Standard => "sddefault",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            ThumbnailTier::MaxRes => "Max Res (HD)",
            ThumbnailTier::High => "High Quality",
            ThumbnailTier::Medium => "Medium Quality",
            ThumbnailTier::Standard => "Standard Definition",
        }
    }

    /// Nominal pixel dimensions
    pub fn dimensions(&self) -> &'static str {
        match self {
            ThumbnailTier::MaxRes => "1280 × 720",
            ThumbnailTier::High => "480 × 360",
            ThumbnailTier::Medium => "320 × 180",
            ThumbnailTier::Standard => "120 × 90",
        }
    }

    /// Typical file size
    pub fn approx_size(&self) -> &'static str {
        match self {
            ThumbnailTier::MaxRes => "~250KB",
            ThumbnailTier::High => "~80KB",
            ThumbnailTier::Medium => "~45KB",
            ThumbnailTier::Standard => "~15KB",
        }
    }

    fn index(&self) -> usize {
        match self {
            ThumbnailTier::MaxRes => 0,
            ThumbnailTier::High => 1,
            ThumbnailTier::Medium => 2,
            ThumbnailTier::Standard => 3,
        }
    }
}

impl fmt::Display for ThumbnailTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ThumbnailTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maxres" | "max" | "maxresdefault" => Ok(ThumbnailTier::MaxRes),
            "hq" | "high" | "hqdefault" => Ok(ThumbnailTier::High),
            "mq" | "medium" | "mqdefault" => Ok(ThumbnailTier::Medium),
            "sd" | "standard" | "sddefault" => Ok(ThumbnailTier::Standard),
            other => Err(format!(
                "unknown thumbnail tier '{}' (expected maxRes, hq, mq or sd)",
                other
            )),
        }
    }
}

/// Candidate image URLs for every tier of one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    #[serde(rename = "videoId")]
    video_id: String,
    #[serde(rename = "maxRes")]
    max_res: String,
    hq: String,
    mq: String,
    sd: String,
}

impl ThumbnailSet {
    /// Derive the URL set against the public thumbnail host
    pub fn new(video_id: &str) -> Self {
        Self::with_host(THUMBNAIL_HOST, video_id)
    }

    /// Derive the URL set against another host base
    pub fn with_host(host: &str, video_id: &str) -> Self {
        let host = host.trim_end_matches('/');
        let url = |tier: ThumbnailTier| format!("{}/vi/{}/{}.jpg", host, video_id, tier.file_stem());

        Self {
            video_id: video_id.to_string(),
            max_res: url(ThumbnailTier::MaxRes),
            hq: url(ThumbnailTier::High),
            mq: url(ThumbnailTier::Medium),
            sd: url(ThumbnailTier::Standard),
        }
    }

    /// Video identifier the set was derived from
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// URL for a tier
    pub fn url(&self, tier: ThumbnailTier) -> &str {
        match tier {
            ThumbnailTier::MaxRes => &self.max_res,
            ThumbnailTier::High => &self.hq,
            ThumbnailTier::Medium => &self.mq,
            ThumbnailTier::Standard => &self.sd,
        }
    }

    /// Iterate tiers and URLs, highest resolution first
    pub fn iter(&self) -> impl Iterator<Item = (ThumbnailTier, &str)> + '_ {
        ThumbnailTier::ALL.into_iter().map(move |tier| (tier, self.url(tier)))
    }
}

/// Result of probing every tier of a [`ThumbnailSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Availability {
    available: [bool; 4],
}

impl Availability {
    /// Every tier marked available
    pub fn all() -> Self {
        Self { available: [true; 4] }
    }

    /// Build from per-tier results, in [`ThumbnailTier::ALL`] order
    pub fn from_results(results: [bool; 4]) -> Self {
        Self { available: results }
    }

    /// Mark a tier
    pub fn set(&mut self, tier: ThumbnailTier, available: bool) {
        self.available[tier.index()] = available;
    }

    /// Check if a tier resolved to a real image
    pub fn is_available(&self, tier: ThumbnailTier) -> bool {
        self.available[tier.index()]
    }

    /// Tiers that resolved, highest resolution first
    pub fn available_tiers(&self) -> Vec<ThumbnailTier> {
        ThumbnailTier::ALL
            .into_iter()
            .filter(|tier| self.is_available(*tier))
            .collect()
    }

    /// Tier selected by default: max resolution, or high quality when the
    /// max resolution image is missing
    pub fn default_tier(&self) -> ThumbnailTier {
        if self.is_available(ThumbnailTier::MaxRes) {
            ThumbnailTier::MaxRes
        } else {
            ThumbnailTier::High
        }
    }
}

impl Serialize for Availability {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(ThumbnailTier::ALL.len()))?;
        for tier in ThumbnailTier::ALL {
            map.serialize_entry(tier.key(), &self.is_available(tier))?;
        }
        map.end()
    }
}
