use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    pub enum ProjectStatus {
        Open => "OPEN",
        Closed => "CLOSED",
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}
