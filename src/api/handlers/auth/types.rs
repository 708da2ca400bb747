use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::{Capability, Role};

/// Login form body (`application/x-www-form-urlencoded`).
#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SessionResponse {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub capabilities: Vec<Capability>,
}
