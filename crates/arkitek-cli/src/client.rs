use serde_json::Value;

/// Joins the server base URL with an API path.
pub fn api_url(server_url: &str, path: &str) -> String {
    format!("{}/api{}", server_url.trim_end_matches('/'), path)
}

/// Extracts the message from a JSON error envelope, falling back to the raw body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Returns the body of a successful response, or fails with the server's error message.
pub async fn success_body(resp: reqwest::Response, action: &str) -> anyhow::Result<String> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        anyhow::bail!("✗ Failed to {action}: {} ({status})", error_message(&text));
    }
    Ok(text)
}
