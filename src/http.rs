//! HTTP plumbing shared by the locator and the fetcher.

use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Creates an HTTP client with the configured timeout settings.
///
/// Without `request_timeout_secs` requests wait as long as the server does.
pub fn create_client(config: &Config) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build().map_err(|source| Error::Request {
        url: config.page_url.clone(),
        source,
    })
}

/// Sends a GET and rejects anything but a 2xx answer.
///
/// The body is left unread so callers can either buffer or stream it.
pub async fn get_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    let response = client.get(url).send().await.map_err(|source| {
        if source.is_timeout() {
            tracing::debug!("request to {url} timed out");
        }
        Error::Request { url: url.to_string(), source }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status { url: url.to_string(), status });
    }

    Ok(response)
}
