//! HTTP fetching
//!
//! One shared client with browser-like default headers is built per run.
//! Fetch results are reported as an outcome enum rather than an error so
//! the session can decide which ones count as errors and which as skips.

use crate::Result;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, DNT, REFERER,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client used for the whole run
pub fn build_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    Ok(client)
}

/// What happened when fetching one page
#[derive(Debug)]
pub enum FetchOutcome {
    /// 200 response with an HTML body
    Html { body: String },
    /// Non-200 response
    HttpStatus { status: u16 },
    /// 200 response whose content type is not HTML
    NotHtml { content_type: String },
    /// Transport-level failure (timeout, connection, body read)
    Network { error: String },
}

/// Fetches one page, sending the site base URL as the referer
pub async fn fetch_page(client: &Client, url: &str, referer: &str) -> FetchOutcome {
    debug!(url, "fetching");

    let response = match client.get(url).header(REFERER, referer).send().await {
        Ok(response) => response,
        Err(error) => {
            return FetchOutcome::Network {
                error: error.to_string(),
            }
        }
    };

    let status = response.status();
    if status.as_u16() != 200 {
        return FetchOutcome::HttpStatus {
            status: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.to_lowercase().contains("text/html") {
        return FetchOutcome::NotHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Html { body },
        Err(error) => FetchOutcome::Network {
            error: error.to_string(),
        },
    }
}
