//! Declarative per-site scraping profiles.
//!
//! Each supported site is described by a [`SiteProfile`]: where its homepage
//! lives, which element contains the article list, how each record field is
//! selected, how images are handled, and what the output CSV looks like.
//! One generic pipeline (fetch → extract → persist) consumes these profiles,
//! so adding a site means adding a profile, not another pipeline.
//!
//! # Supported Sites
//!
//! | Profile | Module | CSV schema | Images |
//! |---------|--------|------------|--------|
//! | `hackernews` | [`thehackernews`] | `title,link,date,tags,summary,image_path` | inline only, extension allow-list |
//! | `bair` | [`bair`] | `Title,Link,Authors,Date,Summary` | none |
//! | `bair-images` | [`bair`] | `…,Image` | inline → `og:image` → `twitter:image` |

use crate::models::Field;
use std::time::Duration;

pub mod bair;
pub mod thehackernews;

/// What to read from an element matched by a [`FieldRule`].
#[derive(Debug, Clone, Copy)]
pub enum Capture {
    /// The element's concatenated text content.
    Text,
    /// The value of the named attribute.
    Attr(&'static str),
}

/// Which matches to keep when a selector hits more than one element.
#[derive(Debug, Clone, Copy)]
pub enum Pick {
    First,
    /// The last match, but only when the selector hit more than one
    /// element; a lone match falls through to the placeholder. Used where
    /// a trailing element is meaningful only alongside earlier siblings,
    /// like a date span following author spans.
    LastOfMany,
    /// Every non-empty match, comma-joined.
    All,
}

/// How one record field is located inside an article node.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// CSS selector evaluated relative to the article node.
    pub selector: &'static str,
    pub capture: Capture,
    pub pick: Pick,
    /// Consulted only when the primary selector yields nothing.
    pub fallback_selector: Option<&'static str>,
    /// Substituted when neither selector yields a value.
    pub placeholder: &'static str,
}

impl FieldRule {
    /// Text capture of the first match, with a placeholder.
    pub fn text(selector: &'static str, placeholder: &'static str) -> Self {
        Self {
            selector,
            capture: Capture::Text,
            pick: Pick::First,
            fallback_selector: None,
            placeholder,
        }
    }

    /// Attribute capture of the first match, with a placeholder.
    pub fn attr(
        selector: &'static str,
        attr: &'static str,
        placeholder: &'static str,
    ) -> Self {
        Self {
            selector,
            capture: Capture::Attr(attr),
            pick: Pick::First,
            fallback_selector: None,
            placeholder,
        }
    }

    pub fn pick(mut self, pick: Pick) -> Self {
        self.pick = pick;
        self
    }

    pub fn or_else(mut self, selector: &'static str) -> Self {
        self.fallback_selector = Some(selector);
        self
    }
}

/// Image handling for one site.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    /// Inline `<img>` rule, evaluated inside the article node.
    pub rule: FieldRule,
    /// Fall back to page-level `og:image` / `twitter:image` meta tags when
    /// no inline image exists.
    pub meta_fallback: bool,
    /// Subdirectory under the images output directory.
    pub dir: &'static str,
    /// Per-image download timeout.
    pub timeout: Duration,
    /// Require the response `Content-Type` to start with `image`.
    pub check_content_type: bool,
    /// When set, extensions outside this list are replaced by
    /// [`default_extension`](Self::default_extension).
    pub allowed_extensions: Option<&'static [&'static str]>,
    /// Used when the image URL carries no extension (or a disallowed one).
    pub default_extension: &'static str,
    /// Maximum length of the sanitized filename stem, in characters.
    pub filename_cap: Option<usize>,
}

/// One CSV column: its header text and the record field it prints.
#[derive(Debug, Clone, Copy)]
pub struct CsvColumn {
    pub header: &'static str,
    pub field: Field,
}

/// Everything the pipeline needs to know about one site.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Human-readable source name, used in logs.
    pub name: &'static str,
    /// Shorthand names accepted by the `--site` CLI flag.
    pub cli_names: &'static [&'static str],
    /// The homepage to scrape.
    pub homepage: &'static str,
    /// Origin used to absolutize relative links and image URLs.
    pub base_origin: &'static str,
    /// Optional User-Agent header for the homepage fetch.
    pub user_agent: Option<&'static str>,
    /// Homepage fetch timeout.
    pub timeout: Duration,
    /// Selector for the element enclosing the article list. Missing
    /// container means a soft stop: zero records, no output.
    pub container_selector: &'static str,
    /// Selector for the repeating article nodes inside the container.
    pub article_selector: &'static str,
    pub title: FieldRule,
    pub link: FieldRule,
    pub date: FieldRule,
    pub tags_or_authors: FieldRule,
    pub summary: FieldRule,
    /// `None` disables image collection entirely.
    pub image: Option<ImagePolicy>,
    /// Skip article nodes whose link rule matches nothing instead of
    /// emitting a placeholder record.
    pub require_link: bool,
    /// Output CSV filename, placed under `{output_dir}/csv/`.
    pub csv_filename: &'static str,
    /// Column layout of the output CSV, in order.
    pub columns: &'static [CsvColumn],
}

/// All built-in profiles, in the order they run under `--site` defaults.
pub fn all_profiles() -> Vec<SiteProfile> {
    vec![
        thehackernews::profile(),
        bair::profile(),
        bair::profile_with_images(),
    ]
}

/// Look up a profile by one of its CLI shorthand names.
pub fn by_cli_name(name: &str) -> Option<SiteProfile> {
    all_profiles()
        .into_iter()
        .find(|p| p.cli_names.contains(&name))
}

/// The shorthand names of every built-in profile, for error messages.
pub fn known_cli_names() -> Vec<&'static str> {
    all_profiles()
        .iter()
        .flat_map(|p| p.cli_names.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_cli_name_finds_each_profile() {
        assert_eq!(by_cli_name("hackernews").unwrap().name, "The Hacker News");
        assert_eq!(by_cli_name("bair").unwrap().name, "BAIR Blog");
        assert_eq!(
            by_cli_name("bair-images").unwrap().name,
            "BAIR Blog (with images)"
        );
    }

    #[test]
    fn test_by_cli_name_unknown_is_none() {
        assert!(by_cli_name("slashdot").is_none());
    }

    #[test]
    fn test_known_cli_names_cover_all_profiles() {
        let names = known_cli_names();
        assert!(names.contains(&"hackernews"));
        assert!(names.contains(&"bair"));
        assert!(names.contains(&"bair-images"));
    }

    #[test]
    fn test_profile_urls_all_parse() {
        for profile in all_profiles() {
            assert!(
                url::Url::parse(profile.base_origin).is_ok(),
                "bad base origin for {}",
                profile.name
            );
            assert!(
                url::Url::parse(profile.homepage).is_ok(),
                "bad homepage for {}",
                profile.name
            );
        }
    }

    #[test]
    fn test_profiles_have_distinct_csv_filenames() {
        let profiles = all_profiles();
        for (i, a) in profiles.iter().enumerate() {
            for b in &profiles[i + 1..] {
                assert_ne!(a.csv_filename, b.csv_filename);
            }
        }
    }
}
