use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::project::Project;
use super::work_log::WorkLogDetails;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerCostSummary {
    pub name: String,
    pub position: String,
    /// Currency of the worker's newest entry in the project.
    pub currency: String,
    /// The entries behind the totals were logged in more than one currency.
    pub mixed_currency: bool,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_hours: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_cost: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_hours: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub total_cost: BigDecimal,
    pub workers: BTreeMap<Uuid, WorkerCostSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub cost: BigDecimal,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub hours: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_projects: i64,
    pub total_workers: i64,
    #[serde(serialize_with = "super::decimal::serialize")]
    pub pending_labor_cost: BigDecimal,
    pub base_currency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_logs: Vec<WorkLogDetails>,
    pub chart_data: Vec<DailyPoint>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailsResponse {
    #[serde(flatten)]
    pub project: Project,
    pub work_logs: Vec<WorkLogDetails>,
    pub analytics: ProjectAnalytics,
    pub base_currency: String,
}
