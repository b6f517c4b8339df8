use serde::{Deserialize, Serialize};

/// Claims carried by the identity provider's session token. `sub` is the
/// user id every data lookup is scoped by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
    #[serde(default)]
    pub email: Option<String>,
}
