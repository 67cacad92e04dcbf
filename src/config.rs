use std::fmt;

use jsonwebtoken::Algorithm;

/// Verification configuration, built once at process start and threaded
/// into the verifier rather than read from the environment on every call.
///
/// A `None` secret or algorithm is a deployment problem; the verifier
/// reports it as misconfiguration instead of silently bypassing checks.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: Option<String>,
    pub algorithm: Option<Algorithm>,
}

impl AuthConfig {
    /// Config with the given shared secret and the HS256 default.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            algorithm: Some(Algorithm::HS256),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Read `JWT_SECRET` and `JWT_ALG` from the environment. An unset or
    /// empty secret stays `None`; `JWT_ALG` defaults to HS256.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let algorithm = match std::env::var("JWT_ALG") {
            Ok(raw) => parse_hmac_algorithm(&raw),
            Err(_) => Some(Algorithm::HS256),
        };
        Self { secret, algorithm }
    }
}

/// The key material is a shared secret, so only the HMAC family is
/// acceptable; anything else in `JWT_ALG` is a misconfiguration.
fn parse_hmac_algorithm(raw: &str) -> Option<Algorithm> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
