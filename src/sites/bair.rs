//! Site profiles for the [BAIR blog](https://bair.berkeley.edu/blog/).
//!
//! Posts live under `div.measure div.home div.posts`, one `div.post` per
//! entry. The title anchor inside `h1.post-title` carries both the headline
//! and the permalink. Author names are anchors inside `h5 span.post-meta`
//! spans; older posts render authors as bare span text, hence the fallback
//! selector. The last `span.post-meta` is the publication date, but only
//! when a post renders more than one span — a lone span is just the author
//! line.
//!
//! Two profiles share these rules: the plain one writes a five-column CSV
//! with no images, and [`profile_with_images`] adds an `Image` column fed by
//! the inline figure image or, failing that, the page's `og:image` /
//! `twitter:image` meta tags.

use super::{CsvColumn, FieldRule, ImagePolicy, Pick, SiteProfile};
use crate::models::Field;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

const COLUMNS: &[CsvColumn] = &[
    CsvColumn { header: "Title", field: Field::Title },
    CsvColumn { header: "Link", field: Field::Link },
    CsvColumn { header: "Authors", field: Field::TagsOrAuthors },
    CsvColumn { header: "Date", field: Field::Date },
    CsvColumn { header: "Summary", field: Field::Summary },
];

const COLUMNS_WITH_IMAGE: &[CsvColumn] = &[
    CsvColumn { header: "Title", field: Field::Title },
    CsvColumn { header: "Link", field: Field::Link },
    CsvColumn { header: "Authors", field: Field::TagsOrAuthors },
    CsvColumn { header: "Date", field: Field::Date },
    CsvColumn { header: "Summary", field: Field::Summary },
    CsvColumn { header: "Image", field: Field::ImagePath },
];

fn base() -> SiteProfile {
    SiteProfile {
        name: "BAIR Blog",
        cli_names: &["bair"],
        homepage: "http://bair.berkeley.edu/blog/",
        base_origin: "http://bair.berkeley.edu/",
        user_agent: Some(USER_AGENT),
        timeout: Duration::from_secs(15),
        container_selector: "div.measure div.home div.posts",
        article_selector: "div.post",
        title: FieldRule::text("h1.post-title a", "No title"),
        link: FieldRule::attr("h1.post-title a", "href", "No link"),
        date: FieldRule::text("h5 span.post-meta", "No date").pick(Pick::LastOfMany),
        tags_or_authors: FieldRule::text("h5 span.post-meta a", "No authors")
            .pick(Pick::All)
            .or_else("h5 span.post-meta"),
        summary: FieldRule::text("p.post-summary", "No summary"),
        image: None,
        require_link: false,
        csv_filename: "bair_blog_articles.csv",
        columns: COLUMNS,
    }
}

pub fn profile() -> SiteProfile {
    base()
}

pub fn profile_with_images() -> SiteProfile {
    let mut profile = base();
    profile.name = "BAIR Blog (with images)";
    profile.cli_names = &["bair-images"];
    profile.csv_filename = "bair_blog_articles_with_images.csv";
    profile.columns = COLUMNS_WITH_IMAGE;
    profile.image = Some(ImagePolicy {
        rule: FieldRule::attr("img", "src", ""),
        meta_fallback: true,
        dir: "bair_images",
        timeout: Duration::from_secs(10),
        check_content_type: false,
        allowed_extensions: None,
        default_extension: ".jpg",
        filename_cap: None,
    });
    profile
}
