use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for API responses that adds the success envelope.
///
/// The wire contract flattens the payload into the envelope:
/// `{success:true, ...payload}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }
}

fn envelope(data_value: Value) -> Value {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));

    match data_value {
        Value::Object(map) => {
            for (k, v) in map {
                body.insert(k, v);
            }
        }
        Value::Null => {}
        other => {
            body.insert("data".to_string(), other);
        }
    }

    Value::Object(body)
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        (status, Json(envelope(data_value))).into_response()
    }
}

/// Result type produced by handlers
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_payload_is_flattened_into_envelope() {
        let body = envelope(json!({"post": {"title": "Keys"}}));
        assert_eq!(body["success"], true);
        assert_eq!(body["post"]["title"], "Keys");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn null_payload_yields_bare_success() {
        let body = envelope(Value::Null);
        assert_eq!(body, json!({"success": true}));
    }
}
