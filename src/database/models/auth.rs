use serde::{Deserialize, Serialize};

use super::user::UserInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed HS256 token sent back as `Authorization: Bearer <token>`
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}

impl AuthResponse {
    pub fn bearer(access_token: String, user: UserInfo) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}
