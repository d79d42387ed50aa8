//! Safe filename generation utilities

use crate::core::thumbnail::ThumbnailTier;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Prefix of every saved thumbnail
pub const FILENAME_PREFIX: &str = "cyberthum";

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("filename pattern is valid")
});

/// Build the saved file name for a thumbnail: `cyberthum-<videoId>-<tier>.jpg`
pub fn thumbnail_filename(video_id: &str, tier: ThumbnailTier) -> String {
    to_safe_filename(
        &format!("{}-{}-{}", FILENAME_PREFIX, video_id, tier.key()),
        "jpg",
    )
}

/// Convert a name to a safe filename by replacing invalid characters
pub fn to_safe_filename(name: &str, extension: &str) -> String {
    let mut safe_name = INVALID_CHARS.replace_all(name, "_").to_string();

    // Remove leading/trailing dots and spaces
    safe_name = safe_name
        .trim_matches(|c: char| c == '.' || c == ' ')
        .to_string();

    // Limit length (Windows has 255 char limit, be conservative)
    if safe_name.len() > 200 {
        let mut cut = 200;
        while !safe_name.is_char_boundary(cut) {
            cut -= 1;
        }
        safe_name.truncate(cut);
        safe_name = safe_name.trim_end().to_string();
    }

    if safe_name.is_empty() {
        safe_name = FILENAME_PREFIX.to_string();
    }

    if extension.is_empty() {
        return safe_name;
    }

    let ext = extension.trim_start_matches('.');
    format!("{}.{}", safe_name, ext)
}

/// Generate a unique filename by appending ` (n)` if the file already exists
pub fn generate_unique_filename(base_path: &Path, filename: &str) -> std::io::Result<String> {
    let mut counter = 1;
    let mut final_filename = filename.to_string();

    while base_path.join(&final_filename).exists() {
        let path = Path::new(filename);
        let stem = path.file_stem().unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        final_filename = format!("{} ({}){}", stem.to_string_lossy(), counter, extension);
        counter += 1;

        // Prevent infinite loop
        if counter > 10000 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "Too many files with similar names",
            ));
        }
    }

    Ok(final_filename)
}
