use serde::{Deserialize, Serialize};

/// The closed set of failure kinds surfaced to callers.
///
/// Extend by vendor class, never by call site: every provider funnels its
/// raw failures into one of these before they cross the adapter boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing or rejected API key. Fatal for the adapter instance until it
    /// is reconstructed with valid credentials.
    #[error("InvalidCredential")]
    InvalidCredential,

    /// The vendor refuses service for the requester's location.
    #[error("UnsupportedRegion")]
    UnsupportedRegion,

    /// Malformed request detected before network dispatch (e.g. a non-inline
    /// image reference). Reported to the caller for correction, never retried.
    #[error("CallerInputError")]
    CallerInputError,

    /// The vendor accepted the request shape but refused or failed it.
    #[error("ProviderBusinessError")]
    ProviderBusinessError,

    /// Network- or decode-level failure the vendor never answered.
    #[error("TransportError")]
    TransportError,
}

/// Diagnostic payload attached to a [`RuntimeError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message { message: String },
    /// A vendor-reported structured payload, preserved verbatim.
    Payload(serde_json::Value),
}

/// The one error type that ever leaves an adapter. Immutable once built.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{provider} {kind}: {}", detail_text(.detail))]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub provider: String,
    pub detail: ErrorDetail,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, provider: impl Into<String>, detail: ErrorDetail) -> Self {
        RuntimeError {
            kind,
            provider: provider.into(),
            detail,
        }
    }

    /// A failure with a plain message payload.
    pub fn message(
        kind: ErrorKind,
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RuntimeError::new(
            kind,
            provider,
            ErrorDetail::Message {
                message: message.into(),
            },
        )
    }

    /// A failure carrying a vendor payload verbatim.
    pub fn payload(
        kind: ErrorKind,
        provider: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        RuntimeError::new(kind, provider, ErrorDetail::Payload(payload))
    }

    /// Constructor-time missing-credential failure.
    pub fn invalid_credential(provider: impl Into<String>) -> Self {
        RuntimeError::message(ErrorKind::InvalidCredential, provider, "missing API key")
    }

    pub fn caller_input(provider: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::message(ErrorKind::CallerInputError, provider, message)
    }

    pub fn transport(provider: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::message(ErrorKind::TransportError, provider, message)
    }
}

fn detail_text(detail: &ErrorDetail) -> String {
    match detail {
        ErrorDetail::Message { message } => message.clone(),
        ErrorDetail::Payload(payload) => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_kind_and_provider() {
        let err = RuntimeError::invalid_credential("google");
        assert_eq!(err.to_string(), "google InvalidCredential: missing API key");
    }

    #[test]
    fn payload_detail_survives_serialization() {
        let err = RuntimeError::payload(
            ErrorKind::ProviderBusinessError,
            "google",
            json!([{ "reason": "QUOTA_EXCEEDED" }]),
        );
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "ProviderBusinessError");
        assert_eq!(value["detail"][0]["reason"], "QUOTA_EXCEEDED");
    }
}
