//! Classification of raw Google failures into the runtime error taxonomy.
//!
//! Every branch preserves enough of the original payload for the caller to
//! render a diagnostic, and classification itself never fails — anything
//! inspection chokes on falls through to the generic business-error case.

use relay_llm::{ErrorKind, RuntimeError, TransportFailure};
use serde_json::Value;

use crate::PROVIDER;

const LOCATION_REFUSAL: &str = "location is not supported";
const KEY_INVALID_REASON: &str = "API_KEY_INVALID";

/// Classify a transport-layer failure.
pub fn classify_failure(failure: &TransportFailure) -> RuntimeError {
    match failure {
        TransportFailure::Status { code, body } => classify_status(*code, body),
        TransportFailure::Connect(message) | TransportFailure::Decode(message) => {
            RuntimeError::transport(PROVIDER, message.clone())
        }
    }
}

/// Classify an error message in the shape the Google SDK throws: prose with
/// an optional trailing JSON array of `google.rpc.ErrorInfo` entries.
pub fn classify_message(message: &str) -> RuntimeError {
    if message.contains(LOCATION_REFUSAL) {
        return RuntimeError::message(ErrorKind::UnsupportedRegion, PROVIDER, message);
    }

    let Some(start) = message.rfind('[') else {
        return business(message);
    };
    let Ok(payload) = serde_json::from_str::<Value>(&message[start..]) else {
        return business(message);
    };

    let reason = payload
        .get(0)
        .and_then(|entry| entry.get("reason"))
        .and_then(Value::as_str);

    if reason == Some(KEY_INVALID_REASON) {
        return RuntimeError::message(ErrorKind::InvalidCredential, PROVIDER, message);
    }
    RuntimeError::payload(ErrorKind::ProviderBusinessError, PROVIDER, payload)
}

/// Classify a non-success HTTP response.
///
/// The Generative Language API reports `{"error": {message, status, details}}`
/// bodies; anything else is preserved as a `"{status} {body}"` rendering.
fn classify_status(code: u16, body: &str) -> RuntimeError {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(error) = value.get("error")
    {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();

        if message.contains(LOCATION_REFUSAL) {
            return RuntimeError::message(ErrorKind::UnsupportedRegion, PROVIDER, message);
        }

        let details = error.get("details").and_then(Value::as_array);
        let key_invalid = details.is_some_and(|details| {
            details
                .iter()
                .any(|d| d.get("reason").and_then(Value::as_str) == Some(KEY_INVALID_REASON))
        });
        if key_invalid {
            return RuntimeError::message(ErrorKind::InvalidCredential, PROVIDER, message);
        }

        return RuntimeError::payload(ErrorKind::ProviderBusinessError, PROVIDER, error.clone());
    }

    business(&format!("{code} {body}"))
}

fn business(message: &str) -> RuntimeError {
    RuntimeError::message(ErrorKind::ProviderBusinessError, PROVIDER, message)
}
