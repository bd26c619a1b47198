//! Generic field extraction driven by site profiles.
//!
//! The extractor walks the article container named by a [`SiteProfile`],
//! applies each [`FieldRule`] inside every article node, and produces one
//! [`ArticleRecord`] per node in document order. Field lookups are
//! independently optional: a rule that matches nothing yields its
//! placeholder, never a dropped record.
//!
//! # Image resolution
//!
//! When a profile carries an [`ImagePolicy`](crate::sites::ImagePolicy),
//! the image URL for a record is
//! resolved through a short-circuiting fallback chain:
//!
//! 1. the inline `<img>` matched inside the article node,
//! 2. otherwise the page-level `og:image` meta tag,
//! 3. otherwise the page-level `twitter:image` meta tag,
//! 4. otherwise no image.
//!
//! The meta tags sit in `<head>`, ahead of every article in document order,
//! so they are resolved once per page and shared by all records that need
//! the fallback. `data:` URLs are never kept. Nothing validates that a
//! resolved URL is reachable; that surfaces at download time.

use crate::models::ArticleRecord;
use crate::sites::{Capture, FieldRule, Pick, SiteProfile};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::utils::normalize_url;

/// Extract all article records from a parsed homepage.
///
/// Returns `None` when the profile's container selector matches nothing,
/// which the caller treats as a soft stop (zero records, logged diagnostic,
/// no output file). Otherwise returns one record per article node, in
/// document order. Article nodes are the container's direct children
/// matching the profile's article selector; nodes nested deeper (widgets,
/// ad wrappers) are not articles.
#[instrument(level = "info", skip_all, fields(site = %profile.name))]
pub fn extract_records(
    document: &Html,
    profile: &SiteProfile,
    base_origin: &Url,
) -> Option<Vec<ArticleRecord>> {
    let container_selector = Selector::parse(profile.container_selector).unwrap();
    let article_selector = Selector::parse(profile.article_selector).unwrap();

    let container = document.select(&container_selector).next()?;

    let page_image = profile
        .image
        .as_ref()
        .filter(|policy| policy.meta_fallback)
        .and_then(|_| page_level_image(document));

    let mut records = Vec::new();
    for node in container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| article_selector.matches(el))
    {
        let link = apply_rule(node, &profile.link);
        if profile.require_link && link.is_none() {
            debug!("Skipping article node without a link");
            continue;
        }

        let mut record = ArticleRecord::empty();
        record.title = field_value(node, &profile.title);
        record.link = link
            .map(|href| normalize_url(base_origin, &href))
            .unwrap_or_else(|| profile.link.placeholder.to_string());
        record.date = field_value(node, &profile.date);
        record.tags_or_authors = field_value(node, &profile.tags_or_authors);
        record.summary = field_value(node, &profile.summary);

        if let Some(policy) = &profile.image {
            let resolved = apply_rule(node, &policy.rule)
                .or_else(|| page_image.clone())
                .filter(|url| !url.starts_with("data:"));
            if let Some(url) = resolved {
                record.image_url = normalize_url(base_origin, &url);
            }
        }

        records.push(record);
    }

    debug!(count = records.len(), "Extracted article records");
    Some(records)
}

/// Apply a rule and fall back to the profile's placeholder.
fn field_value(node: ElementRef, rule: &FieldRule) -> String {
    apply_rule(node, rule).unwrap_or_else(|| rule.placeholder.to_string())
}

/// Apply a [`FieldRule`] inside an article node.
///
/// Tries the primary selector first, then the fallback selector if the
/// primary produced nothing. Returns `None` when neither yields a
/// non-empty value.
fn apply_rule(node: ElementRef, rule: &FieldRule) -> Option<String> {
    select_value(node, rule.selector, rule.capture, rule.pick).or_else(|| {
        rule.fallback_selector
            .and_then(|selector| select_value(node, selector, rule.capture, rule.pick))
    })
}

fn select_value(
    node: ElementRef,
    selector: &str,
    capture: Capture,
    pick: Pick,
) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    let mut values = node
        .select(&selector)
        .filter_map(|el| capture_value(el, capture))
        .filter(|v| !v.is_empty());

    match pick {
        Pick::First => values.next(),
        Pick::LastOfMany => {
            let all: Vec<String> = values.collect();
            if all.len() > 1 { all.into_iter().last() } else { None }
        }
        Pick::All => {
            let all: Vec<String> = values.collect();
            if all.is_empty() { None } else { Some(all.join(", ")) }
        }
    }
}

fn capture_value(element: ElementRef, capture: Capture) -> Option<String> {
    match capture {
        Capture::Text => {
            let text = element
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if text.is_empty() { None } else { Some(text) }
        }
        Capture::Attr(name) => element.value().attr(name).map(str::to_string),
    }
}

/// First page-level image URL, `og:image` before `twitter:image`.
fn page_level_image(document: &Html) -> Option<String> {
    let og = Selector::parse(r#"meta[property="og:image"]"#).unwrap();
    let twitter = Selector::parse(r#"meta[name="twitter:image"]"#).unwrap();

    document
        .select(&og)
        .filter_map(|meta| meta.value().attr("content"))
        .next()
        .or_else(|| {
            document
                .select(&twitter)
                .filter_map(|meta| meta.value().attr("content"))
                .next()
        })
        .map(str::to_string)
}
