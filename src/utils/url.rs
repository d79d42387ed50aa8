//! URL utilities for extracting video IDs from pasted YouTube links

use crate::error::ThumbError;
use regex::Regex;
use std::sync::LazyLock;

/// Length of every YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

// Greedy leading `.*` makes the last marker in the text win, so
// `watch?v=` beats an earlier `/v/`-looking fragment.
static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*((youtu.be/)|(v/)|(/u/[0-9A-Za-z_]/)|(embed/)|(watch\?))\??v?=?([^#&?]*).*")
        .expect("video id pattern is valid")
});

/// Extract video ID from the short-link, `/v/`, `/u/<n>/`, `/embed/`
/// and `watch?v=` URL shapes.
///
/// Returns `None` for blank input or when the captured segment is not
/// exactly 11 characters long.
pub fn extract_video_id(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }

    let captures = VIDEO_ID_PATTERN.captures(input)?;
    let id = captures.get(7)?.as_str();

    if id.chars().count() == VIDEO_ID_LEN {
        Some(id.to_string())
    } else {
        None
    }
}

/// Extract video ID, classifying failures for display
pub fn parse_video_id(input: &str) -> Result<String, ThumbError> {
    if input.trim().is_empty() {
        return Err(ThumbError::EmptyInput);
    }

    extract_video_id(input).ok_or_else(|| ThumbError::UnrecognizedUrl(input.trim().to_string()))
}
