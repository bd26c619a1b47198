//! # Frontpage Scraper
//!
//! Scrapes news and blog homepages into CSV files, one row per article,
//! with an optional thumbnail image downloaded per article.
//!
//! ## Usage
//!
//! ```sh
//! frontpage_scraper                      # all built-in sites
//! frontpage_scraper --site hackernews    # one site
//! ```
//!
//! ## Architecture
//!
//! One generic pipeline runs once per selected [`sites::SiteProfile`],
//! strictly sequentially:
//!
//! 1. **Fetch**: one GET against the site's homepage (non-200 is fatal for
//!    that site)
//! 2. **Extract**: locate the article container, apply the profile's field
//!    rules, resolve image URLs through the inline → `og:image` →
//!    `twitter:image` fallback chain
//! 3. **Persist**: download images one at a time, then overwrite the site's
//!    CSV file
//!
//! A site that fails leaves no partial CSV behind and does not stop the
//! remaining sites; the process exits 0 either way, with diagnostics in
//! the log.

use clap::Parser;
use scraper::Html;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod extract;
mod fetch;
mod models;
mod persist;
mod sites;
mod utils;

use cli::Cli;
use extract::extract_records;
use fetch::fetch_homepage;
use persist::persist_records;
use sites::SiteProfile;
use utils::{ensure_writable_dir, truncate_for_log};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("frontpage_scraper starting up");

    let args = Cli::parse();
    debug!(?args.site, ?args.output_dir, "Parsed CLI arguments");

    // Resolve requested profiles up front so a typo fails before any fetch.
    let profiles: Vec<SiteProfile> = if args.site.is_empty() {
        sites::all_profiles()
    } else {
        let mut selected = Vec::new();
        for name in &args.site {
            match sites::by_cli_name(name) {
                Some(profile) => selected.push(profile),
                None => {
                    return Err(format!(
                        "unknown site {:?}; known sites: {}",
                        name,
                        sites::known_cli_names().join(", ")
                    )
                    .into());
                }
            }
        }
        selected
    };

    let csv_dir = PathBuf::from(&args.output_dir).join("csv");
    ensure_writable_dir(&csv_dir.to_string_lossy()).await?;

    let client = reqwest::Client::new();
    let mut total_rows = 0usize;

    for profile in &profiles {
        match run_site(&client, profile, &args.output_dir).await {
            Ok(count) => total_rows += count,
            Err(e) => error!(site = %profile.name, error = %e, "Site run failed"),
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        sites = profiles.len(),
        rows = total_rows,
        ?elapsed,
        "Execution complete"
    );

    Ok(())
}

/// Run the fetch → extract → persist pipeline for one site.
///
/// Returns the number of CSV rows written. A missing article container or
/// an empty article list is a soft stop: zero rows, a logged diagnostic,
/// and no output file touched.
#[instrument(level = "info", skip_all, fields(site = %profile.name))]
async fn run_site(
    client: &reqwest::Client,
    profile: &SiteProfile,
    output_dir: &str,
) -> Result<usize, Box<dyn Error>> {
    info!(homepage = %profile.homepage, "Scraping homepage");

    // A bad base origin is a profile bug; fail the site with the real cause.
    let base_origin = url::Url::parse(profile.base_origin)
        .map_err(|e| format!("invalid base origin {}: {}", profile.base_origin, e))?;

    let body = fetch_homepage(client, profile).await?;

    // Html is not Send; it must be dropped before the first await below.
    let records = {
        let document = Html::parse_document(&body);
        extract_records(&document, profile, &base_origin)
    };

    let mut records = match records {
        Some(records) => records,
        None => {
            info!(selector = %profile.container_selector, "Article container not found");
            debug!(snippet = %truncate_for_log(&body, 2000), "Homepage HTML snippet");
            return Ok(0);
        }
    };

    if records.is_empty() {
        info!("No articles found");
        return Ok(0);
    }
    info!(count = records.len(), "Found articles");

    let image_dir = match &profile.image {
        Some(policy) => {
            let dir = PathBuf::from(output_dir).join("images").join(policy.dir);
            ensure_writable_dir(&dir.to_string_lossy()).await?;
            dir
        }
        None => PathBuf::new(),
    };

    let csv_path = PathBuf::from(output_dir)
        .join("csv")
        .join(profile.csv_filename);
    let count = persist_records(client, &mut records, profile, &csv_path, &image_dir).await?;

    info!(
        count,
        csv_path = %csv_path.display(),
        "Scraped articles and saved CSV"
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serve exactly one canned HTTP response on an ephemeral local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}/")
    }

    fn temp_output_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "frontpage_scraper_{name}_{}",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_non_200_homepage_leaves_csv_untouched() {
        let mut profile = sites::thehackernews::profile();
        let url = serve_once("HTTP/1.1 404 Not Found", "").await;
        profile.homepage = Box::leak(url.into_boxed_str());

        let output_dir = temp_output_dir("non_200");
        let csv_dir = output_dir.join("csv");
        std::fs::create_dir_all(&csv_dir).unwrap();
        let csv_path = csv_dir.join(profile.csv_filename);
        std::fs::write(&csv_path, "title,link\nprior,run\n").unwrap();

        let client = reqwest::Client::new();
        let result = run_site(&client, &profile, &output_dir.to_string_lossy()).await;

        assert!(result.is_err());
        assert_eq!(
            std::fs::read_to_string(&csv_path).unwrap(),
            "title,link\nprior,run\n"
        );
        let _ = std::fs::remove_dir_all(&output_dir);
    }

    #[tokio::test]
    async fn test_missing_container_writes_no_csv() {
        let mut profile = sites::thehackernews::profile();
        let url = serve_once(
            "HTTP/1.1 200 OK",
            "<html><body><p>down for maintenance</p></body></html>",
        )
        .await;
        profile.homepage = Box::leak(url.into_boxed_str());

        let output_dir = temp_output_dir("no_container");
        std::fs::create_dir_all(output_dir.join("csv")).unwrap();

        let client = reqwest::Client::new();
        let count = run_site(&client, &profile, &output_dir.to_string_lossy())
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(!output_dir.join("csv").join(profile.csv_filename).exists());
        let _ = std::fs::remove_dir_all(&output_dir);
    }
}

