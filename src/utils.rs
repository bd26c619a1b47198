//! Utility functions for URL normalization, filename derivation, and
//! file system operations.
//!
//! This module provides helpers used throughout the pipeline:
//! - Absolutizing relative article links and image URLs
//! - Deriving safe image filenames from article titles
//! - String truncation for logging
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Characters allowed in a derived filename; everything else, spaces
/// included, becomes `_`.
static FILENAME_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\-.]").unwrap());

/// Absolutize a URL against a site's base origin.
///
/// Anything already starting with an HTTP scheme is returned unchanged, so
/// the function is idempotent. Everything else is treated as site-relative
/// and joined against `base_origin`.
///
/// # Examples
///
/// ```ignore
/// let base = Url::parse("https://example.com/").unwrap();
/// assert_eq!(normalize_url(&base, "/news/1"), "https://example.com/news/1");
/// assert_eq!(normalize_url(&base, "https://cdn.example.com/a.png"),
///            "https://cdn.example.com/a.png");
/// ```
pub fn normalize_url(base_origin: &Url, candidate: &str) -> String {
    if candidate.starts_with("http") {
        return candidate.to_string();
    }
    match base_origin.join(candidate) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => candidate.to_string(),
    }
}

/// Derive a filesystem-safe filename stem from an article title.
///
/// Replaces every character outside `[word chars, hyphen, period]` with an
/// underscore, then truncates to `cap` characters when a cap is given.
/// Sanitizing an already-sanitized string is a no-op.
pub fn sanitize_filename(title: &str, cap: Option<usize>) -> String {
    let cleaned = FILENAME_UNSAFE.replace_all(title, "_");
    match cap {
        Some(max) => cleaned.chars().take(max).collect(),
        None => cleaned.into_owned(),
    }
}

/// Infer the image file extension (including the dot) from an image URL.
///
/// The extension is taken from the last path segment, lowercased. URLs with
/// no extension yield `default`. When `allowed` is set, extensions outside
/// the list also yield `default` — even when the downloaded bytes turn out
/// to be some other format, which is intentional profile behavior.
pub fn image_extension(
    image_url: &str,
    allowed: Option<&[&str]>,
    default: &str,
) -> String {
    let path = match Url::parse(image_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => image_url.to_string(),
    };
    let ext = path
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()));

    match ext {
        Some(ext) => match allowed {
            Some(list) if !list.contains(&ext.as_str()) => default.to_string(),
            _ => ext,
        },
        None => default.to_string(),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the nearest character boundary at or below `max`
/// bytes, with a byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then performs a write test by creating
/// and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_normalize_url_root_relative() {
        assert_eq!(
            normalize_url(&base(), "/news/1"),
            "https://example.com/news/1"
        );
    }

    #[test]
    fn test_normalize_url_absolute_is_untouched() {
        let absolute = "https://cdn.example.com/img/a.png";
        assert_eq!(normalize_url(&base(), absolute), absolute);
    }

    #[test]
    fn test_normalize_url_is_idempotent() {
        let once = normalize_url(&base(), "/img/a.png");
        let twice = normalize_url(&base(), &once);
        assert_eq!(once, twice);
        assert_eq!(once, "https://example.com/img/a.png");
    }

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("Alpha Breach!", None), "Alpha_Breach_");
        assert_eq!(
            sanitize_filename("C++ vs. Rust: a 2025 survey", None),
            "C___vs._Rust__a_2025_survey"
        );
    }

    #[test]
    fn test_sanitize_filename_keeps_safe_alphabet() {
        let out = sanitize_filename("a-b_c.d e/f\\g\"h", None);
        assert!(
            out.chars()
                .all(|c| c.is_alphanumeric() || "_-.".contains(c))
        );
        assert_eq!(out, "a-b_c.d_e_f_g_h");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        let once = sanitize_filename("Weird <<>> title?!", Some(100));
        assert_eq!(sanitize_filename(&once, Some(100)), once);
    }

    #[test]
    fn test_sanitize_filename_truncates_to_cap() {
        let long = "x".repeat(250);
        assert_eq!(sanitize_filename(&long, Some(100)).chars().count(), 100);
        assert_eq!(sanitize_filename(&long, None).chars().count(), 250);
    }

    #[test]
    fn test_sanitize_filename_nonempty_for_nonempty_input() {
        assert_eq!(sanitize_filename("???", Some(100)), "___");
    }

    #[test]
    fn test_image_extension_from_url_path() {
        assert_eq!(
            image_extension("https://example.com/img/a.png", None, ".jpg"),
            ".png"
        );
        assert_eq!(
            image_extension("https://example.com/img/photo.JPEG?w=640", None, ".jpg"),
            ".jpeg"
        );
    }

    #[test]
    fn test_image_extension_defaults_when_missing() {
        assert_eq!(
            image_extension("https://example.com/img/raw", None, ".jpg"),
            ".jpg"
        );
    }

    #[test]
    fn test_image_extension_allow_list() {
        let allowed: &[&str] = &[".jpg", ".jpeg"];
        assert_eq!(
            image_extension("https://example.com/a.png", Some(allowed), ".jpg"),
            ".jpg"
        );
        assert_eq!(
            image_extension("https://example.com/a.jpeg", Some(allowed), ".jpg"),
            ".jpeg"
        );
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "é".repeat(60); // 2 bytes per char
        let result = truncate_for_log(&s, 5);
        assert!(result.starts_with("éé"));
        assert!(result.contains("bytes)"));
    }
}
