//! External validation service client
//!
//! Speaks the nu validator JSON protocol: POST the markup, read back
//! `messages` and keep the entries typed `error`. One retry on transport
//! failure, then the caller decides between erroring and static fallback.

use std::time::Duration;

use reqwest::blocking::Client;
use tagforge_dom::ForgeError;

/// Public nu validator instance.
pub const DEFAULT_SERVICE_URL: &str = "https://validator.w3.org/nu/";

const SERVICE_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one validation service endpoint.
#[derive(Debug, Clone)]
pub struct ServiceChecker {
    base_url: String,
}

impl ServiceChecker {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_SERVICE_URL)
    }

    /// Point the checker at a different endpoint, e.g. a local validator.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    /// Submit `markup` and return the reported error messages. An empty
    /// vector means the service found no errors.
    pub fn check(&self, markup: &str) -> Result<Vec<String>, ForgeError> {
        let client = Client::builder()
            .timeout(SERVICE_TIMEOUT)
            .build()
            .map_err(|e| service_error(format!("Failed to construct HTTP client: {e}")))?;
        let url = format!("{}?out=json", self.base_url);
        let mut last_err = None;
        for attempt in 0..2 {
            if attempt > 0 {
                tracing::debug!("Retrying validation service request");
            }
            let response = match client
                .post(&url)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(markup.to_string())
                .send()
            {
                Ok(response) => response,
                Err(e) => {
                    last_err = Some(service_error(format!("Validation service unreachable: {e}")));
                    continue;
                }
            };
            if !response.status().is_success() {
                return Err(service_error(format!(
                    "Validation service request failed with status {}.",
                    response.status()
                )));
            }
            let value: serde_json::Value = response.json().map_err(|e| {
                service_error(format!("Validation service returned an unreadable response: {e}"))
            })?;
            return Ok(error_messages(&value));
        }
        Err(last_err
            .unwrap_or_else(|| service_error("Validation service unreachable.".to_string())))
    }
}

impl Default for ServiceChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn service_error(message: String) -> ForgeError {
    ForgeError::missing_dependency(
        message,
        "1. Check network connectivity to the validation service.\n\
         2. Switch to 'static' or 'fragment' validation mode.\n\
         3. Enable auto_heal to fall back to static validation.\n\
         See https://validator.w3.org/docs/api.html for more info.",
    )
}

/// Extract `messages[].message` for entries with `type == "error"`.
fn error_messages(value: &serde_json::Value) -> Vec<String> {
    value
        .get("messages")
        .and_then(serde_json::Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter(|m| m.get("type").and_then(serde_json::Value::as_str) == Some("error"))
                .filter_map(|m| m.get("message").and_then(serde_json::Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_filters_by_type() {
        let value = serde_json::json!({
            "messages": [
                {"type": "info", "message": "ignore me"},
                {"type": "error", "message": "bad attribute"},
                {"type": "error", "message": "stray tag"},
            ]
        });
        assert_eq!(error_messages(&value), vec!["bad attribute", "stray tag"]);
    }

    #[test]
    fn test_error_messages_tolerates_missing_fields() {
        assert!(error_messages(&serde_json::json!({})).is_empty());
        let value = serde_json::json!({"messages": [{"type": "error"}]});
        assert!(error_messages(&value).is_empty());
    }

    #[test]
    fn test_unreachable_service_reports_with_prescription() {
        let checker = ServiceChecker::with_base_url("http://127.0.0.1:9/nu/");
        let err = checker.check("<p>x</p>").unwrap_err();
        assert!(err.message().contains("unreachable"));
        assert!(err.prescription().contains("static"));
    }
}
