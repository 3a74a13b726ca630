use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("weather-proxy/", env!("CARGO_PKG_VERSION"));

/// Shared client for upstream calls. The timeout applies to each request as a whole.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Send `request`, require a 2xx status and parse the body as JSON.
/// `what` names the upstream call in error messages.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
    let res = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {what}"))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{what} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }
}
