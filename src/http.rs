//! HTTP utilities for remote entity sources

use std::time::Duration;

use reqwest::{Client, Response};

/// Create a reqwest client with connection pooling and the configured timeout
pub fn create_client(timeout_secs: u64) -> anyhow::Result<Client> {
    let client = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(30)))
        .build()?;
    Ok(client)
}

/// Check HTTP response status and return detailed error if not successful
///
/// This helper extracts error details from the response body for better debugging.
pub async fn check_response(response: Response, service_name: &str) -> anyhow::Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    anyhow::bail!("{} error {}: {}", service_name, status, error_detail(body))
}

/// Pull a message out of the common REST error body shapes
fn error_detail(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => json
            .get("error")
            .and_then(|e| e.get("message").and_then(|m| m.as_str()).or_else(|| e.as_str()))
            .or_else(|| json.get("message").and_then(|m| m.as_str()))
            .or_else(|| json.get("detail").and_then(|d| d.as_str()))
            .map(|s| s.to_string())
            .unwrap_or(body),
        Err(_) => body,
    }
}
