use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tracing::{error, info, warn};

use crate::bearer::bearer_token;
use crate::claims::{AccountStatus, IdentityContext};
use crate::error::AuthError;
use crate::verifier::{TokenVerifier, VerifyError};

/// Authentication gate: extract the bearer token, verify it, normalize
/// the claims and attach an [`IdentityContext`] for downstream stages.
///
/// Every terminal outcome produces one structured log line; the token and
/// secret are never logged.
pub async fn authenticate(
    State(verifier): State<Arc<TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ip = client_ip(&req);

    let Some(token) = bearer_token(req.headers()) else {
        warn!(ip = %ip, "missing bearer token");
        return Err(AuthError::MissingCredential);
    };

    let claims = match verifier.verify(&token) {
        Ok(claims) => claims,
        Err(VerifyError::Expired) => {
            warn!(ip = %ip, "expired token");
            return Err(AuthError::ExpiredToken);
        }
        Err(VerifyError::Misconfigured) => {
            // Operator problem, not client traffic; alert loudly but keep
            // the wire response indistinguishable from a bad token.
            error!(ip = %ip, "token verification misconfigured, rejecting request");
            return Err(AuthError::InvalidToken);
        }
        Err(err @ VerifyError::Invalid(_)) => {
            warn!(ip = %ip, error = %err, "invalid token");
            return Err(AuthError::InvalidToken);
        }
    };

    let identity = IdentityContext::from_claims(claims).map_err(|err| {
        warn!(ip = %ip, error = %err, "claim normalization failed");
        err
    })?;

    if identity.status == AccountStatus::Banned {
        warn!(user_id = %identity.user_id, ip = %ip, "banned user attempted access");
        return Err(AuthError::Banned);
    }

    info!(
        user_id = %identity.user_id,
        role = %identity.role,
        status = %identity.status,
        "request authenticated"
    );

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Allowed-role set for the authorization gate. Normalized once at
/// construction; an empty set means any authenticated caller passes.
#[derive(Clone, Debug, Default)]
pub struct RoleSet {
    allowed: Arc<HashSet<String>>,
}

impl RoleSet {
    pub fn new<I, T>(roles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let allowed = roles
            .into_iter()
            .map(|role| role.as_ref().trim().to_lowercase())
            .filter(|role| !role.is_empty())
            .collect::<HashSet<_>>();
        Self {
            allowed: Arc::new(allowed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.allowed.contains(role)
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut roles: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        roles.sort_unstable();
        f.write_str(&roles.join(", "))
    }
}

/// Authorization gate: compare the already-attached identity against the
/// allowed role set. Never touches tokens or headers.
pub async fn authorize(
    State(allowed): State<RoleSet>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(identity) = req.extensions().get::<IdentityContext>() else {
        // Reaching this without the authentication gate is a pipeline
        // ordering bug; still answered as unauthorized.
        warn!("role guard reached without an identity context");
        return Err(AuthError::MissingAuthorizationContext);
    };

    let role = identity.role.trim().to_lowercase();
    if !allowed.is_empty() && !allowed.contains(&role) {
        warn!(
            user_id = %identity.user_id,
            role = %role,
            required = %allowed,
            ip = %client_ip(&req),
            "insufficient permissions"
        );
        return Err(AuthError::InsufficientPermissions);
    }

    info!(user_id = %identity.user_id, role = %role, "permission granted");
    Ok(next.run(req).await)
}

/// Wire the authentication gate onto every route of `router`.
///
/// Layers run outermost-last, so apply this after any [`require_roles`]
/// guard on the same router:
///
/// ```ignore
/// let admin = require_roles(admin_routes, ["admin"]);
/// let app = apply_authentication(admin, verifier);
/// ```
pub fn apply_authentication<S>(router: Router<S>, verifier: Arc<TokenVerifier>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(verifier, authenticate))
}

/// Wire the authorization gate onto every route of `router`.
pub fn require_roles<S, I, T>(router: Router<S>, roles: I) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    router.layer(middleware::from_fn_with_state(RoleSet::new(roles), authorize))
}

fn client_ip(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
