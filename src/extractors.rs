use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::claims::IdentityContext;
use crate::error::AuthError;

/// Hands the identity context placed by the authentication gate to
/// handlers. Routes reached without the gate reject with 401.
#[async_trait]
impl<S> FromRequestParts<S> for IdentityContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .ok_or(AuthError::MissingAuthorizationContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde_json::json;

    fn identity() -> IdentityContext {
        IdentityContext::from_claims(
            json!({ "sub": "42", "type": "admin", "status": "active" })
                .as_object()
                .expect("object literal")
                .clone(),
        )
        .expect("valid claims")
    }

    #[tokio::test]
    async fn extracts_context_from_extensions() {
        let mut req = Request::builder().body(()).expect("request");
        req.extensions_mut().insert(identity());
        let (mut parts, _) = req.into_parts();

        let extracted = IdentityContext::from_request_parts(&mut parts, &())
            .await
            .expect("extracts");
        assert_eq!(extracted.user_id, "42");
        assert_eq!(extracted.role, "admin");
    }

    #[tokio::test]
    async fn rejects_when_gate_did_not_run() {
        let req = Request::builder().body(()).expect("request");
        let (mut parts, _) = req.into_parts();

        let err = IdentityContext::from_request_parts(&mut parts, &())
            .await
            .expect_err("missing context");
        assert_eq!(err, AuthError::MissingAuthorizationContext);
    }
}
