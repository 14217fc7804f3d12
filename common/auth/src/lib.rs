pub mod claims;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod jwks;
pub mod verifier;

pub use claims::Claims;
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult, ClaimFault};
pub use extract::bearer_token;
pub use guard::PermissionGuard;
pub use jwks::{JwksClient, KeyCache};
pub use verifier::TokenVerifier;
