use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    /// Fixed role list carried in the access token.
    pub enum UserRole {
        SuperAdmin => "SUPER_ADMIN",
        Owner => "OWNER",
        Admin => "ADMIN",
        Foreman => "FOREMAN",
    }
}

impl UserRole {
    /// Roles allowed to move money (settle and void payouts).
    pub fn can_manage_payroll(&self) -> bool {
        matches!(self, UserRole::SuperAdmin | UserRole::Owner | UserRole::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: Uuid,
    pub name: String,
    pub base_currency: String,
}
