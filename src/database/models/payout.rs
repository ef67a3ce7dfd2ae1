use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::work_log::WorkLogEntry;
use super::worker::WorkerIdentity;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: Uuid,
    pub company_id: Uuid,
    pub worker_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_regular_hours: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_overtime_hours: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_amount: BigDecimal, // NUMERIC(15,2)
    pub currency: String,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayoutWithWorker {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payout: Payout,
    #[sqlx(flatten)]
    pub worker: WorkerIdentity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDetails {
    #[serde(flatten)]
    pub payout: Payout,
    pub worker: WorkerIdentity,
    pub work_logs: Vec<WorkLogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettleWorkerInput {
    pub worker_id: Uuid,
    /// Settle only entries logged in this currency.
    pub currency: Option<String>,
    pub note: Option<String>,
}

/// Totals computed from a worker's pending entries, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayout {
    pub company_id: Uuid,
    pub worker_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_regular_hours: BigDecimal,
    pub total_overtime_hours: BigDecimal,
    pub total_amount: BigDecimal,
    pub currency: String,
    pub note: Option<String>,
}

/// What a settlement returns to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub payout: Payout,
    pub settled_log_ids: Vec<Uuid>,
    /// Entries of the worker still pending in other currencies.
    pub pending_remaining: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidReceipt {
    pub payout_id: Uuid,
    pub reopened_log_ids: Vec<Uuid>,
}
