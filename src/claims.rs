use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthError, AuthResult};

/// Account lifecycle state carried by the `status` claim. Anything the
/// issuer sends outside this set is rejected, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Unverified,
    Active,
    Banned,
}

impl AccountStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "unverified" => Some(Self::Unverified),
            "active" => Some(Self::Active),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Active => "active",
            Self::Banned => "banned",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized, request-scoped view of a verified claim bag. Created by the
/// authentication gate, consumed by the authorization gate and handlers;
/// never persisted or shared across requests.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityContext {
    pub user_id: String,
    pub role: String,
    pub status: AccountStatus,
    pub verified: bool,
    /// Remaining claims passed through untouched. Keys shadowed by the
    /// derived fields above are dropped so the normalized values win.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdentityContext {
    /// Derive the identity facts from a verified claim bag.
    ///
    /// - `user_id`: `sub` falling back to `id`, coerced to a string.
    /// - `role`: trimmed, lowercased `type` (empty when absent).
    /// - `status`: must parse to one of [`AccountStatus`].
    /// - `verified`: true iff the status is not `unverified`.
    pub fn from_claims(claims: Map<String, Value>) -> AuthResult<Self> {
        let user_id = claims
            .get("sub")
            .or_else(|| claims.get("id"))
            .and_then(coerce_to_string)
            .ok_or(AuthError::MissingIdentityClaim)?;

        let role = claims
            .get("type")
            .and_then(Value::as_str)
            .map(|raw| raw.trim().to_lowercase())
            .unwrap_or_default();

        let status = claims
            .get("status")
            .and_then(Value::as_str)
            .and_then(AccountStatus::parse)
            .ok_or(AuthError::InvalidStatusClaim)?;

        let mut extra = claims;
        for shadowed in ["user_id", "role", "status", "verified"] {
            extra.remove(shadowed);
        }

        Ok(Self {
            user_id,
            role,
            verified: status != AccountStatus::Unverified,
            status,
            extra,
        })
    }

    /// Convenience role check against a normalized role name.
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role.trim().to_lowercase()
    }
}

fn coerce_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
