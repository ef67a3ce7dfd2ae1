use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::{
    models::{
        DailyPoint, DashboardResponse, DashboardStats, ProjectAnalytics, ProjectDetailsResponse,
        ProjectStatus, WorkLogDetails, WorkLogEntry, WorkLogStatus, WorkerCostSummary,
    },
    repositories::{CompanyRepository, ProjectRepository, WorkLogRepository, WorkerRepository},
};
use crate::error::AppError;
use crate::services::settlement::round_money;

pub const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Per-project totals and the per-worker breakdown, priced at each entry's
/// frozen rate.
pub fn project_analytics(logs: &[WorkLogDetails]) -> ProjectAnalytics {
    let mut total_hours = BigDecimal::from(0);
    let mut total_cost = BigDecimal::from(0);
    let mut workers: BTreeMap<Uuid, WorkerCostSummary> = BTreeMap::new();
    // Newest entry seen per worker; its currency labels the summary.
    let mut newest: HashMap<Uuid, (NaiveDate, DateTime<Utc>)> = HashMap::new();

    for log in logs {
        let hours = log.entry.total_hours();
        let cost = log.entry.cost();

        let summary = workers
            .entry(log.entry.worker_id)
            .or_insert_with(|| WorkerCostSummary {
                name: log.worker.full_name(),
                position: log.worker.position.clone(),
                currency: log.entry.currency.clone(),
                mixed_currency: false,
                total_hours: BigDecimal::from(0),
                total_cost: BigDecimal::from(0),
            });
        if summary.currency != log.entry.currency {
            summary.mixed_currency = true;
        }

        let stamp = (log.entry.date, log.entry.created_at);
        let latest = newest.entry(log.entry.worker_id).or_insert(stamp);
        if stamp >= *latest {
            *latest = stamp;
            summary.currency = log.entry.currency.clone();
        }

        summary.total_hours += &hours;
        summary.total_cost += &cost;

        total_hours += hours;
        total_cost += cost;
    }

    for summary in workers.values_mut() {
        summary.total_hours = round_money(&summary.total_hours);
        summary.total_cost = round_money(&summary.total_cost);
    }

    ProjectAnalytics {
        total_hours: round_money(&total_hours),
        total_cost: round_money(&total_cost),
        workers,
    }
}

pub fn total_cost(entries: &[WorkLogEntry]) -> BigDecimal {
    let sum: BigDecimal = entries.iter().map(WorkLogEntry::cost).sum();
    round_money(&sum)
}

pub fn month_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.day0()))
}

/// One point per calendar day from `start` to `end` inclusive. Days without
/// entries are present with zero cost and hours.
pub fn daily_series(entries: &[WorkLogEntry], start: NaiveDate, end: NaiveDate) -> Vec<DailyPoint> {
    let mut by_day: HashMap<NaiveDate, (BigDecimal, BigDecimal)> = HashMap::new();
    for entry in entries {
        if entry.date < start || entry.date > end {
            continue;
        }
        let (cost, hours) = by_day
            .entry(entry.date)
            .or_insert_with(|| (BigDecimal::from(0), BigDecimal::from(0)));
        *cost += entry.cost();
        *hours += entry.total_hours();
    }

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| match by_day.remove(&date) {
            Some((cost, hours)) => DailyPoint {
                date,
                cost: round_money(&cost),
                hours: round_money(&hours),
            },
            None => DailyPoint {
                date,
                cost: round_money(&BigDecimal::from(0)),
                hours: round_money(&BigDecimal::from(0)),
            },
        })
        .collect()
}

#[derive(Clone)]
pub struct AnalyticsService {
    work_logs: WorkLogRepository,
    workers: WorkerRepository,
    projects: ProjectRepository,
    companies: CompanyRepository,
}

impl AnalyticsService {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            work_logs: WorkLogRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            companies: CompanyRepository::new(pool),
        }
    }

    /// Company dashboard as of `today`: headline figures, the latest entries,
    /// and the month-to-date daily series.
    pub async fn dashboard(
        &self,
        company_id: Uuid,
        today: NaiveDate,
    ) -> Result<DashboardResponse, AppError> {
        let active_projects = self
            .projects
            .count_by_status(company_id, ProjectStatus::Open)
            .await?;
        let total_workers = self.workers.count_for_company(company_id).await?;
        let pending = self
            .work_logs
            .entries_by_status(company_id, WorkLogStatus::Pending)
            .await?;
        let base_currency = self.companies.base_currency(company_id).await?;
        let recent_logs = self
            .work_logs
            .recent(company_id, RECENT_ACTIVITY_LIMIT)
            .await?;

        let start = month_start(today);
        let month = self
            .work_logs
            .entries_between(company_id, start, today)
            .await?;

        Ok(DashboardResponse {
            stats: DashboardStats {
                active_projects,
                total_workers,
                pending_labor_cost: total_cost(&pending),
                base_currency,
            },
            recent_logs,
            chart_data: daily_series(&month, start, today),
        })
    }

    pub async fn project_details(
        &self,
        company_id: Uuid,
        project_id: Uuid,
    ) -> Result<ProjectDetailsResponse, AppError> {
        let project = self
            .projects
            .find_by_id(company_id, project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("project {} not found", project_id)))?;

        let work_logs = self
            .work_logs
            .list_for_project(company_id, project_id)
            .await?;
        let base_currency = self.companies.base_currency(company_id).await?;

        Ok(ProjectDetailsResponse {
            analytics: project_analytics(&work_logs),
            project,
            work_logs,
            base_currency,
        })
    }
}
