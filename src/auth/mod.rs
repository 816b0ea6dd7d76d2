mod helpers;
mod middleware;
mod password;
mod token;

pub use helpers::extract_bearer_token;
pub use middleware::{AuthError, RequireUser};
pub use password::CredentialHasher;
pub use token::{Claims, TokenIssuer};
