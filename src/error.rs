use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::envelope::Envelope;

pub type AuthResult<T> = Result<T, AuthError>;

/// Terminal gate outcomes. Each maps to exactly one status/message pair on
/// the wire; the `Display` text stays internal to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no bearer credential in the authorization header")]
    MissingCredential,
    #[error("token expired")]
    ExpiredToken,
    /// Covers malformed tokens, bad signatures, algorithm mismatches and
    /// verifier misconfiguration; the client sees one undifferentiated
    /// rejection.
    #[error("token rejected by the verifier")]
    InvalidToken,
    #[error("token carries neither sub nor id")]
    MissingIdentityClaim,
    #[error("status claim absent or outside the known set")]
    InvalidStatusClaim,
    #[error("account is banned")]
    Banned,
    #[error("identity context missing from the request")]
    MissingAuthorizationContext,
    #[error("role not in the allowed set")]
    InsufficientPermissions,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Banned | Self::InsufficientPermissions => StatusCode::FORBIDDEN,
            Self::MissingCredential
            | Self::ExpiredToken
            | Self::InvalidToken
            | Self::MissingIdentityClaim
            | Self::InvalidStatusClaim
            | Self::MissingAuthorizationContext => StatusCode::UNAUTHORIZED,
        }
    }

    /// Stable client-facing error text.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingCredential => "Missing Bearer token",
            Self::ExpiredToken => "Token expired",
            Self::InvalidToken => "Invalid token",
            Self::MissingIdentityClaim => "Token missing sub/id",
            Self::InvalidStatusClaim => "Invalid status claim",
            Self::Banned => "User is banned",
            Self::MissingAuthorizationContext => "Missing user context",
            Self::InsufficientPermissions => "Insufficient permissions",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        Envelope::error_with_status(self.public_message(), self.status_code()).into_response()
    }
}
