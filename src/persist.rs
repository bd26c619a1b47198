//! Image downloads and CSV output.
//!
//! The persister runs after extraction: it downloads each record's resolved
//! image sequentially (when the profile collects images), then writes the
//! whole record sequence to the site's CSV file in extraction order. The
//! CSV is always overwritten; nothing merges with a prior run's output.
//!
//! A failed image download or write degrades that one record's `image_path`
//! to empty and is logged at `warn` — it never aborts the batch. Errors
//! while writing the CSV itself propagate.

use crate::fetch::fetch_image;
use crate::models::ArticleRecord;
use crate::sites::{ImagePolicy, SiteProfile};
use crate::utils::{image_extension, sanitize_filename};
use reqwest::Client;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Download images for `records` and write them all to `csv_path`.
///
/// Returns the number of rows written. Image failures are per-record and
/// non-fatal; CSV write failures are hard errors.
#[instrument(level = "info", skip_all, fields(site = %profile.name, csv_path = %csv_path.display()))]
pub async fn persist_records(
    client: &Client,
    records: &mut [ArticleRecord],
    profile: &SiteProfile,
    csv_path: &Path,
    image_dir: &Path,
) -> Result<usize, Box<dyn Error>> {
    if let Some(policy) = &profile.image {
        for record in records.iter_mut() {
            if record.image_url.is_empty() {
                continue;
            }
            match download_image(client, policy, record, image_dir).await {
                Ok(path) => {
                    debug!(path = %path, title = %record.title, "Saved image");
                    record.image_path = path;
                }
                Err(e) => {
                    warn!(url = %record.image_url, error = %e, "Image not downloaded");
                    record.image_path = String::new();
                }
            }
        }
    }

    write_csv(records, profile, csv_path)?;
    info!(count = records.len(), "Wrote CSV rows");
    Ok(records.len())
}

/// Download one record's image into `image_dir`.
///
/// The filename is the sanitized article title plus an extension inferred
/// from the image URL under the profile's allow-list rules. Responses with
/// a non-image `Content-Type` are rejected when the policy asks for the
/// check.
async fn download_image(
    client: &Client,
    policy: &ImagePolicy,
    record: &ArticleRecord,
    image_dir: &Path,
) -> Result<String, Box<dyn Error>> {
    let (bytes, content_type) = fetch_image(client, &record.image_url, policy.timeout).await?;

    if policy.check_content_type {
        let is_image = content_type
            .as_deref()
            .map(|ct| ct.starts_with("image"))
            .unwrap_or(false);
        if !is_image {
            return Err(format!(
                "not an image: {} (content type {:?})",
                record.image_url, content_type
            )
            .into());
        }
    }

    let filename = image_filename(&record.title, &record.image_url, policy);
    let path = image_dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    Ok(path.to_string_lossy().into_owned())
}

/// Derive the on-disk filename for a record's image.
fn image_filename(title: &str, image_url: &str, policy: &ImagePolicy) -> String {
    let stem = sanitize_filename(title, policy.filename_cap);
    let ext = image_extension(image_url, policy.allowed_extensions, policy.default_extension);
    format!("{stem}{ext}")
}

/// Write the record sequence as CSV with the profile's column layout.
fn write_csv(
    records: &[ArticleRecord],
    profile: &SiteProfile,
    csv_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(csv_path)?;
    writer.write_record(profile.columns.iter().map(|c| c.header))?;
    for record in records {
        writer.write_record(profile.columns.iter().map(|c| record.field(c.field)))?;
    }
    writer.flush()?;
    Ok(())
}
