use serde_json::Value;
use tracing::debug;

use crate::api::{SearchRequest, SearchResponse};
use crate::core::error::ChatError;
use crate::utils::url::construct_api_url;

const GENERIC_SERVER_ERROR: &str = "The server could not process the request";

/// Check the service before sending a search. Anything but `200 OK` counts
/// as unavailable.
pub async fn check_health(
    client: &reqwest::Client,
    base_url: &str,
    health_path: &str,
) -> Result<(), ChatError> {
    let url = construct_api_url(base_url, health_path);
    debug!(%url, "health check");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ChatError::Connectivity(format!("{url}: {e}")))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(ChatError::Connectivity(format!(
            "health check at {url} returned {status}"
        )));
    }
    Ok(())
}

pub async fn search(
    client: &reqwest::Client,
    base_url: &str,
    search_path: &str,
    request: &SearchRequest,
) -> Result<SearchResponse, ChatError> {
    let url = construct_api_url(base_url, search_path);
    debug!(
        %url,
        query_len = request.query_text.len(),
        image_len = request.image_base64.len(),
        "search request"
    );

    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(|e| ChatError::Connectivity(format!("{url}: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ChatError::Server(format!("failed to read response: {e}")))?;

    let parsed = serde_json::from_str::<Value>(&body).ok();

    if !status.is_success() {
        let summary = parsed.as_ref().and_then(extract_error_summary);
        return Err(ChatError::Server(summary.unwrap_or_else(|| {
            format!("{GENERIC_SERVER_ERROR} (status {status})")
        })));
    }

    let value = parsed.ok_or_else(|| {
        ChatError::Server(format!("{GENERIC_SERVER_ERROR}: response was not JSON"))
    })?;

    if has_error_field(&value) {
        return Err(ChatError::Server(
            extract_error_summary(&value).unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
        ));
    }

    serde_json::from_value::<SearchResponse>(value)
        .map_err(|e| ChatError::Server(format!("unexpected response shape: {e}")))
}

fn has_error_field(value: &Value) -> bool {
    match value.get("error") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Pull a human-readable message out of an error payload such as
/// `{"error": "Internal server error", "message": "..."}`.
fn extract_error_summary(value: &Value) -> Option<String> {
    let error = value.get("error").and_then(|v| match v {
        Value::String(s) => Some(s.to_string()),
        Value::Object(map) => map
            .get("message")
            .and_then(|message| message.as_str().map(str::to_owned)),
        _ => None,
    });
    let message = value
        .get("message")
        .and_then(|v| v.as_str().map(str::to_owned));

    let summary = match (error, message) {
        (Some(error), Some(message)) if error != message => format!("{error}: {message}"),
        (Some(error), _) => error,
        (None, Some(message)) => message,
        (None, None) => return None,
    };

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_summary_combines_error_and_message() {
        let value = json!({"error": "Internal server error", "message": "neo4j   down"});
        assert_eq!(
            extract_error_summary(&value).as_deref(),
            Some("Internal server error: neo4j down")
        );
    }

    #[test]
    fn error_summary_reads_nested_message() {
        let value = json!({"error": {"message": "bad image"}});
        assert_eq!(extract_error_summary(&value).as_deref(), Some("bad image"));
    }

    #[test]
    fn error_summary_is_none_without_fields() {
        assert_eq!(extract_error_summary(&json!({"status": "failed"})), None);
    }

    #[test]
    fn null_or_blank_error_field_is_not_a_failure() {
        assert!(!has_error_field(&json!({"text": "ok", "error": null})));
        assert!(!has_error_field(&json!({"text": "ok", "error": ""})));
        assert!(has_error_field(&json!({"error": "missing query_text"})));
    }
}
