//! Data model for scraped articles.
//!
//! A single run of the pipeline produces a flat list of [`ArticleRecord`]s,
//! one per article container found on a site's homepage. Records are built
//! once by the extractor, consumed once by the persister, and never keyed,
//! deduplicated, or carried across runs.

/// One article entry scraped from a homepage.
///
/// Every field is a plain string in whatever shape the site publishes it.
/// A field that could not be located holds the site profile's placeholder
/// (empty string or e.g. `"No title"`) rather than failing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The article headline.
    pub title: String,
    /// Absolute permalink to the article.
    pub link: String,
    /// Publication date, in the site's native free-form format.
    pub date: String,
    /// Tags or author names, comma-joined when multi-valued.
    pub tags_or_authors: String,
    /// The article teaser/summary paragraph.
    pub summary: String,
    /// Resolved absolute URL of the representative image, empty when the
    /// site publishes none or the profile does not collect images.
    pub image_url: String,
    /// Local path of the downloaded image, empty until the persister
    /// downloads it successfully.
    pub image_path: String,
}

impl ArticleRecord {
    /// An all-placeholder record, filled in field by field by the extractor.
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            link: String::new(),
            date: String::new(),
            tags_or_authors: String::new(),
            summary: String::new(),
            image_url: String::new(),
            image_path: String::new(),
        }
    }

    /// Read access by [`Field`], used when laying out CSV rows.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Link => &self.link,
            Field::Date => &self.date,
            Field::TagsOrAuthors => &self.tags_or_authors,
            Field::Summary => &self.summary,
            Field::ImagePath => &self.image_path,
        }
    }
}

/// Identifies one [`ArticleRecord`] field for CSV column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Link,
    Date,
    TagsOrAuthors,
    Summary,
    ImagePath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_has_no_content() {
        let record = ArticleRecord::empty();
        assert!(record.title.is_empty());
        assert!(record.link.is_empty());
        assert!(record.image_path.is_empty());
    }

    #[test]
    fn test_field_access_matches_struct_fields() {
        let mut record = ArticleRecord::empty();
        record.title = "Alpha".to_string();
        record.link = "https://example.com/a".to_string();
        record.image_path = "assets/images/a.jpg".to_string();

        assert_eq!(record.field(Field::Title), "Alpha");
        assert_eq!(record.field(Field::Link), "https://example.com/a");
        assert_eq!(record.field(Field::Date), "");
        assert_eq!(record.field(Field::ImagePath), "assets/images/a.jpg");
    }
}
