use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};

/// Canonical reason phrase for the status codes the envelope auto-fills.
/// Codes outside this table get no `message` field.
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    let text = match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        509 => "Network Timeout",
        _ => return None,
    };
    Some(text)
}

/// Uniform JSON payload paired with the HTTP status code it is written
/// under. Built fresh per outcome; the caller hands it to the transport.
#[derive(Debug, Clone)]
pub struct Envelope {
    code: StatusCode,
    body: Map<String, Value>,
}

impl Envelope {
    /// Empty payload with the given status code.
    pub fn new(code: StatusCode) -> Self {
        Self {
            code,
            body: Map::new(),
        }
    }

    /// Payload pre-seeded with the canonical reason phrase under
    /// `message`, when the code has one.
    pub fn with_reason(code: StatusCode) -> Self {
        let mut envelope = Self::new(code);
        if let Some(text) = reason_phrase(code.as_u16()) {
            envelope
                .body
                .insert("message".to_string(), Value::String(text.to_string()));
        }
        envelope
    }

    /// Error payload with the default 401 status.
    pub fn error(text: impl Into<String>) -> Self {
        Self::error_with_status(text, StatusCode::UNAUTHORIZED)
    }

    /// `{ message: <reason phrase, if known>, error: <text> }`.
    pub fn error_with_status(text: impl Into<String>, code: StatusCode) -> Self {
        Self::with_reason(code).add("error", Value::String(text.into()))
    }

    /// Success payload with the default 200 status.
    pub fn success(data: Map<String, Value>) -> Self {
        Self::success_with_status(data, StatusCode::OK)
    }

    /// `{ message: <reason phrase, if known>, ...data }`.
    pub fn success_with_status(data: Map<String, Value>, code: StatusCode) -> Self {
        let mut envelope = Self::with_reason(code);
        for (key, value) in data {
            envelope.body.insert(key, value);
        }
        envelope
    }

    /// Add a field, replacing any previous value under the same key.
    pub fn add(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    /// Overwrite the `message` field.
    pub fn message(self, text: impl Into<String>) -> Self {
        self.add("message", Value::String(text.into()))
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_parts(self) -> (StatusCode, Map<String, Value>) {
        (self.code, self.body)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.code, Json(Value::Object(self.body))).into_response()
    }
}
