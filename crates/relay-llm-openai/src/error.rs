//! Classification of raw OpenAI failures into the runtime error taxonomy.

use relay_llm::{ErrorKind, RuntimeError, TransportFailure};
use serde_json::Value;

use crate::PROVIDER;

const KEY_INVALID_CODE: &str = "invalid_api_key";
const REGION_BLOCKED_CODE: &str = "unsupported_country_region_territory";

/// Classify a transport-layer failure.
pub fn classify_failure(failure: &TransportFailure) -> RuntimeError {
    match failure {
        TransportFailure::Status { code, body } => classify_status(*code, body),
        TransportFailure::Connect(message) | TransportFailure::Decode(message) => {
            RuntimeError::transport(PROVIDER, message.clone())
        }
    }
}

/// Classify a non-success HTTP response. The API reports
/// `{"error": {message, type, code}}` bodies.
fn classify_status(code: u16, body: &str) -> RuntimeError {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(error) = value.get("error")
    {
        let error_code = error.get("code").and_then(Value::as_str);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if error_code == Some(KEY_INVALID_CODE) || code == 401 {
            return RuntimeError::message(ErrorKind::InvalidCredential, PROVIDER, message);
        }
        if error_code == Some(REGION_BLOCKED_CODE) {
            return RuntimeError::message(ErrorKind::UnsupportedRegion, PROVIDER, message);
        }
        return RuntimeError::payload(ErrorKind::ProviderBusinessError, PROVIDER, error.clone());
    }

    if code == 401 {
        return RuntimeError::message(
            ErrorKind::InvalidCredential,
            PROVIDER,
            format!("{code} {body}"),
        );
    }
    RuntimeError::message(
        ErrorKind::ProviderBusinessError,
        PROVIDER,
        format!("{code} {body}"),
    )
}
