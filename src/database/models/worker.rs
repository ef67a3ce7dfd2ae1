use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The wage a worker earns right now; copied onto each new work log.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct WorkerRate {
    pub id: Uuid,
    pub hourly_rate: BigDecimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

impl WorkerIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
