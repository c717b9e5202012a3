//! HTTP retrieval of the upstream payloads.
//!
//! Requests go through the [`HttpClient`] trait so callers can swap the
//! transport; [`BasicClient`] is the plain `reqwest` implementation.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{PipelineError, Result};
use tracing::debug;

/// Issues a GET for `url` and returns the response body.
///
/// # Errors
///
/// Returns [`PipelineError::Network`] if the URL is invalid, the request
/// fails, or the server answers with a non-success status.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| PipelineError::network(url, e))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| PipelineError::network(url, e))?;

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| PipelineError::network(url, e))?;
    debug!(url, bytes = bytes.len(), "Response body received");

    Ok(bytes.to_vec())
}
