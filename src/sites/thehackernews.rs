//! Site profile for [The Hacker News](https://thehackernews.com/).
//!
//! The homepage lists stories inside `div.blog-posts.clear`; each story is a
//! `div` or `section` carrying the `body-post clear` classes. Stories without
//! an `a.story-link` anchor (ad slots, widgets) are skipped outright.
//!
//! Thumbnails are always present inline as `img.home-img-src`, so no
//! meta-tag fallback is configured. Downloaded filenames keep the URL's
//! extension only when it is a known image extension; anything else becomes
//! `.jpg` regardless of the actual bytes, matching the site's CDN which
//! serves mostly JPEG behind extensionless URLs.

use super::{CsvColumn, FieldRule, ImagePolicy, SiteProfile};
use crate::models::Field;
use std::time::Duration;

/// Image extensions kept as-is when deriving a download filename.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

const COLUMNS: &[CsvColumn] = &[
    CsvColumn { header: "title", field: Field::Title },
    CsvColumn { header: "link", field: Field::Link },
    CsvColumn { header: "date", field: Field::Date },
    CsvColumn { header: "tags", field: Field::TagsOrAuthors },
    CsvColumn { header: "summary", field: Field::Summary },
    CsvColumn { header: "image_path", field: Field::ImagePath },
];

pub fn profile() -> SiteProfile {
    SiteProfile {
        name: "The Hacker News",
        cli_names: &["hackernews", "thn"],
        homepage: "https://thehackernews.com/",
        base_origin: "https://thehackernews.com/",
        user_agent: None,
        timeout: Duration::from_secs(15),
        container_selector: "div.blog-posts.clear",
        article_selector: "div.body-post.clear, section.body-post.clear",
        title: FieldRule::text("h2.home-title", ""),
        link: FieldRule::attr("a.story-link", "href", ""),
        date: FieldRule::text("span.h-datetime", ""),
        tags_or_authors: FieldRule::text("span.h-tags", ""),
        summary: FieldRule::text("div.home-desc", ""),
        image: Some(ImagePolicy {
            rule: FieldRule::attr("img.home-img-src", "src", ""),
            meta_fallback: false,
            dir: "cs_images",
            timeout: Duration::from_secs(15),
            check_content_type: true,
            allowed_extensions: Some(IMAGE_EXTENSIONS),
            default_extension: ".jpg",
            filename_cap: Some(100),
        }),
        require_link: true,
        csv_filename: "thehackernews_articles.csv",
        columns: COLUMNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_schema() {
        let profile = profile();
        let headers: Vec<&str> = profile.columns.iter().map(|c| c.header).collect();
        assert_eq!(
            headers,
            vec!["title", "link", "date", "tags", "summary", "image_path"]
        );
        assert!(profile.require_link);
    }

    #[test]
    fn test_image_policy_enforces_allow_list_and_cap() {
        let policy = profile().image.unwrap();
        assert_eq!(policy.allowed_extensions, Some(IMAGE_EXTENSIONS));
        assert_eq!(policy.default_extension, ".jpg");
        assert_eq!(policy.filename_cap, Some(100));
        assert!(policy.check_content_type);
        assert!(!policy.meta_fallback);
    }
}
