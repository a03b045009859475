use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role carried by every token issued at signup and signin.
pub const USER_ROLE: &str = "user";

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: Uuid,      // user ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,       // issued at (unix timestamp)
    pub exp: i64,       // expires at (unix timestamp)
    pub iss: String,    // issuer
    pub aud: String,    // audience
}
