//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the frontpage scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape every built-in site into ./assets
/// frontpage_scraper
///
/// # Scrape one site into a custom directory
/// frontpage_scraper --site hackernews --output-dir /tmp/news
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Site profile(s) to scrape; repeatable. Defaults to all built-in sites.
    #[arg(short, long)]
    pub site: Vec<String>,

    /// Base directory for CSV files and downloaded images
    #[arg(short, long, env = "SCRAPER_OUTPUT_DIR", default_value = "assets")]
    pub output_dir: String,
}
