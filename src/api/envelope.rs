// Response envelope module
// Uniform { success, data | error, count?, message? } body for every API reply

use hyper::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;

/// JSON wrapper returned by every endpoint.
///
/// Exactly one of `data` and `error` is set; `count` only accompanies
/// collections and always equals their length.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Single-record success
    pub const fn record(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            count: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    /// Collection success; count is taken from the items
    pub fn collection(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            data: Some(items),
            error: None,
            message: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            count: None,
            message: None,
        }
    }
}

/// Serialized envelope bound to its status code
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn new<T: Serialize>(status: StatusCode, envelope: &Envelope<T>) -> Result<Self, ApiError> {
        serde_json::to_value(envelope)
            .map(|body| Self { status, body })
            .map_err(|e| ApiError::Internal(format!("Failed to serialize envelope: {e}")))
    }

    pub fn from_error(err: &ApiError) -> Self {
        Self::new(err.status(), &Envelope::failure(err)).unwrap_or_else(|_| Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: serde_json::json!({ "success": false, "error": "Internal server error" }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_count_matches_len() {
        let env = Envelope::collection(vec![1, 2, 3]);
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 3);
        assert_eq!(value["data"].as_array().map(Vec::len), Some(3));
        assert!(value.get("error").is_none());
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_empty_collection_keeps_count() {
        let value = serde_json::to_value(Envelope::<Vec<u8>>::collection(vec![])).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["data"], serde_json::json!([]));
    }

    #[test]
    fn test_record_has_no_count() {
        let value = serde_json::to_value(Envelope::record("x").with_message("done")).unwrap();
        assert_eq!(value["data"], "x");
        assert_eq!(value["message"], "done");
        assert!(value.get("count").is_none());
    }

    #[test]
    fn test_failure_reply() {
        let reply = Reply::from_error(&ApiError::not_found("City", 7));
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["success"], false);
        assert_eq!(reply.body["error"], "City with id 7 not found");
        assert!(reply.body.get("data").is_none());
    }
}
