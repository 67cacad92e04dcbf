use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::AuthConfig;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// Missing secret or unusable algorithm. A deployment problem, never a
    /// statement about the client's token.
    #[error("token verification is not configured")]
    Misconfigured,
    #[error("token expired")]
    Expired,
    #[error("token verification failed: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Signature and expiry checks over a shared-secret JWT, allow-listed to
/// exactly the configured algorithm.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    config: AuthConfig,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verify the token and return its claim bag.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, VerifyError> {
        let (key, validation) = self.material()?;
        let data = decode::<Map<String, Value>>(token, &key, &validation).map_err(classify)?;
        debug!("token verified");
        Ok(data.claims)
    }

    /// Claim bag without signature or expiry validation. Useful for
    /// logging and diagnostics only; never admit a request based on it.
    pub fn decode_unverified(&self, token: &str) -> Result<Map<String, Value>, VerifyError> {
        let (key, mut validation) = self.material()?;
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        let data = decode::<Map<String, Value>>(token, &key, &validation).map_err(classify)?;
        Ok(data.claims)
    }

    fn material(&self) -> Result<(DecodingKey, Validation), VerifyError> {
        let secret = self
            .config
            .secret
            .as_deref()
            .ok_or(VerifyError::Misconfigured)?;
        let algorithm = self.config.algorithm.ok_or(VerifyError::Misconfigured)?;

        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(algorithm);
        // `exp` is optional; expiry is enforced only when the claim is present.
        validation.required_spec_claims.clear();
        // No expected audience is configured; `aud` and the other
        // registered claims pass through opaquely.
        validation.validate_aud = false;
        Ok((key, validation))
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> VerifyError {
    match err.kind() {
        ErrorKind::ExpiredSignature => VerifyError::Expired,
        _ => VerifyError::Invalid(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret";

    fn sign(claims: Value, secret: &str, algorithm: Algorithm) -> String {
        encode(
            &Header::new(algorithm),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign token")
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(AuthConfig::new(SECRET))
    }

    #[test]
    fn verifies_valid_token() {
        let token = sign(
            json!({ "sub": "42", "exp": Utc::now().timestamp() + 600 }),
            SECRET,
            Algorithm::HS256,
        );
        let claims = verifier().verify(&token).expect("valid token");
        assert_eq!(claims["sub"], json!("42"));
    }

    #[test]
    fn registered_claims_pass_through_without_validation() {
        // No audience or issuer is configured, so aud/iss/nbf are opaque
        // payload, not grounds for rejection.
        let token = sign(
            json!({
                "sub": "42",
                "aud": "mobile-app",
                "iss": "accounts.example",
                "nbf": Utc::now().timestamp() - 60,
                "exp": Utc::now().timestamp() + 600,
            }),
            SECRET,
            Algorithm::HS256,
        );
        let claims = verifier().verify(&token).expect("aud-bearing token");
        assert_eq!(claims["aud"], json!("mobile-app"));
        assert_eq!(claims["iss"], json!("accounts.example"));
    }

    #[test]
    fn accepts_token_without_exp() {
        let token = sign(json!({ "sub": "42" }), SECRET, Algorithm::HS256);
        let claims = verifier().verify(&token).expect("exp-less token");
        assert_eq!(claims["sub"], json!("42"));
    }

    #[test]
    fn expired_token_is_distinguished() {
        let token = sign(
            json!({ "sub": "42", "exp": Utc::now().timestamp() - 600 }),
            SECRET,
            Algorithm::HS256,
        );
        let err = verifier().verify(&token).expect_err("expired");
        assert!(matches!(err, VerifyError::Expired));
    }

    #[test]
    fn bad_signature_is_invalid() {
        let token = sign(
            json!({ "sub": "42", "exp": Utc::now().timestamp() + 600 }),
            "some-other-secret",
            Algorithm::HS256,
        );
        let err = verifier().verify(&token).expect_err("bad signature");
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verifier().verify("not.a.jwt").expect_err("garbage");
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn algorithm_mismatch_is_invalid() {
        // Signed HS512, verifier pinned to HS256
        let token = sign(
            json!({ "sub": "42", "exp": Utc::now().timestamp() + 600 }),
            SECRET,
            Algorithm::HS512,
        );
        let err = verifier().verify(&token).expect_err("wrong algorithm");
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn missing_secret_is_misconfigured() {
        let config = AuthConfig {
            secret: None,
            algorithm: Some(Algorithm::HS256),
        };
        let err = TokenVerifier::new(config)
            .verify("irrelevant")
            .expect_err("no secret");
        assert!(matches!(err, VerifyError::Misconfigured));
    }

    #[test]
    fn missing_algorithm_is_misconfigured() {
        let config = AuthConfig {
            secret: Some(SECRET.to_string()),
            algorithm: None,
        };
        let err = TokenVerifier::new(config)
            .verify("irrelevant")
            .expect_err("no algorithm");
        assert!(matches!(err, VerifyError::Misconfigured));
    }

    #[test]
    fn decode_unverified_ignores_signature_and_expiry() {
        let token = sign(
            json!({ "sub": "42", "exp": Utc::now().timestamp() - 600 }),
            "some-other-secret",
            Algorithm::HS256,
        );
        let claims = verifier()
            .decode_unverified(&token)
            .expect("unverified decode");
        assert_eq!(claims["sub"], json!("42"));
    }
}
