//! HTTP fetching for homepages and images.
//!
//! One shared [`reqwest::Client`] serves the whole run; timeouts are applied
//! per request from the site profile. A non-200 homepage response is fatal
//! for that site's run, while a failed image fetch only degrades the one
//! record it belongs to — both distinctions are made by the callers, this
//! module just reports the failure.

use crate::sites::SiteProfile;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetch a site's homepage and return the response body.
///
/// # Errors
///
/// Fails on any transport error, on timeout, and on any status other
/// than 200.
#[instrument(level = "info", skip_all, fields(url = %profile.homepage))]
pub async fn fetch_homepage(
    client: &Client,
    profile: &SiteProfile,
) -> Result<String, Box<dyn Error>> {
    let mut request = client.get(profile.homepage).timeout(profile.timeout);
    if let Some(ua) = profile.user_agent {
        request = request.header(USER_AGENT, ua);
    }

    let response = request.send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(format!("failed to fetch {}: {}", profile.homepage, status).into());
    }

    let body = response.text().await?;
    debug!(bytes = body.len(), "Fetched homepage");
    Ok(body)
}

/// Fetch a single image and return its bytes plus declared content type.
///
/// # Errors
///
/// Fails on transport errors, timeout, and non-200 status. The caller
/// decides whether the content type disqualifies the download.
#[instrument(level = "debug", skip_all, fields(url = %url))]
pub async fn fetch_image(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<(Vec<u8>, Option<String>), Box<dyn Error>> {
    let response = client.get(url).timeout(timeout).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(format!("failed to fetch image {}: {}", url, status).into());
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), content_type = ?content_type, "Fetched image");
    Ok((bytes, content_type))
}
