//! HTTP helpers for planner requests.

use crate::error::PlannerError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Longest error body kept from a non-2xx reply, in characters.
pub(super) const MAX_ERROR_BODY_CHARS: usize = 1024;

/// Build an HTTP client with timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, PlannerError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// POST a JSON body and decode a JSON reply.
pub(super) async fn post_json<B, T>(
    http: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<T, PlannerError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = http.post(url).json(body).send().await?;
    decode(response).await
}

/// GET and decode a JSON reply.
pub(super) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
) -> Result<T, PlannerError> {
    let response = http.get(url).send().await?;
    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PlannerError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PlannerError::Status {
            code: status.as_u16(),
            body: body_snippet(&body),
        });
    }

    // Read text first so schema mismatches report as invalid replies rather
    // than transport errors.
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| PlannerError::InvalidResponse(err.to_string()))
}

/// Clip an error body to [`MAX_ERROR_BODY_CHARS`] on a char boundary.
fn body_snippet(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
