//! Response classification.
//!
//! CEX.IO signals logical failures with a top-level `error` key, often with a
//! 200 status, so the body is inspected even for successful responses.

use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::error::{ApiResponseError, CexError, NetworkError};

/// Message used when a successful response does not contain valid JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON response";

/// Turn an HTTP status and body into a decoded payload or a typed error.
pub fn classify(status: StatusCode, body: &str) -> Result<Value, CexError> {
    if status.is_client_error() || status.is_server_error() {
        return Err(ApiResponseError::from_body(status.as_u16(), body).into());
    }

    let json: Value = serde_json::from_str(body).map_err(|_| {
        CexError::Api(ApiResponseError::new(status.as_u16(), INVALID_JSON_MESSAGE, None))
    })?;

    if json.get("error").is_some() {
        return Err(ApiResponseError::from_body(status.as_u16(), body).into());
    }

    Ok(json)
}

/// Read the body of `response` and classify it.
pub(crate) async fn classify_response(
    command: &str,
    response: Response,
) -> Result<Value, CexError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| NetworkError::from_reqwest(command, e))?;

    match classify(status, &body) {
        Ok(json) => {
            tracing::debug!(command, %status, "received response");
            Ok(json)
        }
        Err(error) => {
            tracing::warn!(command, %status, %error, "API returned an error");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponseBody;
    use serde_json::json;

    fn api_error(result: Result<Value, CexError>) -> ApiResponseError {
        match result {
            Err(CexError::Api(err)) => err,
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_key_wins_over_status() {
        let err = api_error(classify(StatusCode::OK, r#"{"error": "no active orders"}"#));
        assert_eq!(err.status_code, 200);
        assert_eq!(err.message, "no active orders");
        assert_eq!(
            err.body,
            Some(ResponseBody::Json(json!({"error": "no active orders"})))
        );
    }

    #[test]
    fn test_invalid_json_on_success() {
        let err = api_error(classify(StatusCode::OK, "OK"));
        assert_eq!(err.status_code, 200);
        assert_eq!(err.message, INVALID_JSON_MESSAGE);
        assert!(err.body.is_none());
    }

    #[test]
    fn test_client_error_with_json() {
        let err = api_error(classify(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Invalid Symbols Pair"}"#,
        ));
        assert_eq!(err.status_code, 400);
        assert_eq!(err.message, "Invalid Symbols Pair");
    }

    #[test]
    fn test_server_error_with_text() {
        let err = api_error(classify(StatusCode::NOT_IMPLEMENTED, "nope"));
        assert_eq!(err.status_code, 501);
        assert_eq!(err.message, "nope");
        assert_eq!(err.body, Some(ResponseBody::Text("nope".into())));
    }

    #[test]
    fn test_success_is_returned_verbatim() {
        let value = classify(StatusCode::OK, r#"{"last":"42000.5"}"#).unwrap();
        assert_eq!(value, json!({"last": "42000.5"}));
    }

    #[test]
    fn test_numbers_are_not_coerced() {
        let value = classify(StatusCode::OK, r#"{"price":0.10000000000000000001}"#).unwrap();
        assert_eq!(value["price"].to_string(), "0.10000000000000000001");
    }

    #[test]
    fn test_array_payload() {
        let value = classify(StatusCode::OK, r#"[{"id":"1"}]"#).unwrap();
        assert_eq!(value[0]["id"], "1");
    }
}
