use std::collections::{HashMap, HashSet};

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{BulkEntryInput, BulkWorkLogInput, NewWorkLog, WorkLogEntry},
    repositories::{ProjectRepository, WorkLogRepository, WorkerRepository},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;

pub const MAX_HOURS_PER_DAY: i64 = 24;

/// A row that passed validation, hours rounded to the stored precision.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedEntry {
    pub worker_id: Uuid,
    pub regular_hours: BigDecimal,
    pub overtime_hours: BigDecimal,
}

fn over_a_day() -> AppError {
    AppError::validation(format!(
        "a worker cannot log more than {} hours in one day",
        MAX_HOURS_PER_DAY
    ))
}

/// Round a raw hour value to the stored precision. The range is checked on
/// the raw value first; rounding a value like `1e30000000` would expand
/// every digit of it.
pub fn normalize_hours(hours: &BigDecimal) -> Result<BigDecimal, AppError> {
    if *hours < BigDecimal::from(0) {
        return Err(AppError::validation("hours cannot be negative"));
    }
    if *hours > BigDecimal::from(MAX_HOURS_PER_DAY) {
        return Err(over_a_day());
    }

    Ok(hours.with_scale_round(2, RoundingMode::HalfUp))
}

/// Range checks shared by bulk submissions and single-entry corrections.
/// Zero total hours pass here; callers decide whether to drop or reject them.
pub fn check_hours(regular: &BigDecimal, overtime: &BigDecimal) -> Result<(), AppError> {
    let zero = BigDecimal::from(0);

    if *regular < zero || *overtime < zero {
        return Err(AppError::validation("hours cannot be negative"));
    }

    if regular + overtime > BigDecimal::from(MAX_HOURS_PER_DAY) {
        return Err(over_a_day());
    }

    Ok(())
}

/// Validate a daily submission and drop the rows that carry no hours.
pub fn accept_entries(entries: &[BulkEntryInput]) -> Result<Vec<AcceptedEntry>, AppError> {
    let zero = BigDecimal::from(0);
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(entries.len());

    for entry in entries {
        let regular_hours = normalize_hours(&entry.regular_hours)?;
        let overtime_hours = normalize_hours(&entry.overtime_hours)?;

        check_hours(&regular_hours, &overtime_hours)?;

        if regular_hours <= zero && overtime_hours <= zero {
            continue;
        }

        if !seen.insert(entry.worker_id) {
            return Err(AppError::validation(format!(
                "worker {} appears more than once in the submission",
                entry.worker_id
            )));
        }

        accepted.push(AcceptedEntry {
            worker_id: entry.worker_id,
            regular_hours,
            overtime_hours,
        });
    }

    if accepted.is_empty() {
        return Err(AppError::validation("no entries with positive hours"));
    }

    Ok(accepted)
}

#[derive(Clone)]
pub struct BulkEntryService {
    pool: PgPool,
    work_logs: WorkLogRepository,
    workers: WorkerRepository,
    projects: ProjectRepository,
}

impl BulkEntryService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            work_logs: WorkLogRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            pool,
        }
    }

    /// Record one project's daily hours for many workers. The worker's current
    /// rate and currency are copied onto every row.
    pub async fn submit(
        &self,
        company_id: Uuid,
        input: BulkWorkLogInput,
    ) -> Result<Vec<WorkLogEntry>, AppError> {
        let accepted = accept_entries(&input.entries)?;

        let mut tx = DatabaseTransaction::begin(&self.pool).await?;
        let result = self
            .insert_accepted(&mut tx, company_id, input.project_id, input.date, &accepted)
            .await;
        let created = DatabaseTransaction::complete(tx, result).await?;

        log::info!(
            "Recorded {} work log(s) for project {} on {}",
            created.len(),
            input.project_id,
            input.date
        );

        Ok(created)
    }

    async fn insert_accepted(
        &self,
        conn: &mut sqlx::PgConnection,
        company_id: Uuid,
        project_id: Uuid,
        date: NaiveDate,
        accepted: &[AcceptedEntry],
    ) -> Result<Vec<WorkLogEntry>, AppError> {
        if !self
            .projects
            .exists_in_company(conn, company_id, project_id)
            .await?
        {
            return Err(AppError::not_found(format!("project {} not found", project_id)));
        }

        let worker_ids: Vec<Uuid> = accepted.iter().map(|entry| entry.worker_id).collect();
        let rates: HashMap<Uuid, _> = self
            .workers
            .current_rates(conn, company_id, &worker_ids)
            .await?
            .into_iter()
            .map(|rate| (rate.id, rate))
            .collect();

        let mut new_logs = Vec::with_capacity(accepted.len());
        for entry in accepted {
            let rate = rates.get(&entry.worker_id).ok_or_else(|| {
                AppError::not_found(format!("worker {} not found", entry.worker_id))
            })?;

            new_logs.push(NewWorkLog {
                company_id,
                worker_id: entry.worker_id,
                project_id,
                date,
                regular_hours: entry.regular_hours.clone(),
                overtime_hours: entry.overtime_hours.clone(),
                hourly_rate_at_time: rate.hourly_rate.clone(),
                currency: rate.currency.clone(),
            });
        }

        Ok(self.work_logs.insert_many(conn, &new_logs).await?)
    }
}
