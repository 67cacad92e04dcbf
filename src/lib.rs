pub mod bearer;
pub mod claims;
pub mod config;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod verifier;

pub use bearer::bearer_token;
pub use claims::{AccountStatus, IdentityContext};
pub use config::AuthConfig;
pub use envelope::{reason_phrase, Envelope};
pub use error::{AuthError, AuthResult};
pub use middleware::{apply_authentication, authenticate, authorize, require_roles, RoleSet};
pub use verifier::{TokenVerifier, VerifyError};
