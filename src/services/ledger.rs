use bigdecimal::BigDecimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::{
    models::{UpdateWorkLogInput, WorkLogDetails, WorkLogEntry, WorkLogQuery, WorkLogStatus},
    repositories::{ProjectRepository, WorkLogRepository},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;
use crate::services::bulk_entry::{check_hours, normalize_hours};

/// Apply a correction to a pending entry. Rate, currency and settlement
/// state are never touched here.
pub fn apply_update(
    mut entry: WorkLogEntry,
    input: &UpdateWorkLogInput,
) -> Result<WorkLogEntry, AppError> {
    if !entry.state.is_pending() {
        return Err(AppError::invalid_state(format!(
            "work log {} is settled and cannot be edited",
            entry.id
        )));
    }

    if let Some(date) = input.date {
        entry.date = date;
    }
    if let Some(project_id) = input.project_id {
        entry.project_id = project_id;
    }
    if let Some(regular) = &input.regular_hours {
        entry.regular_hours = normalize_hours(regular)?;
    }
    if let Some(overtime) = &input.overtime_hours {
        entry.overtime_hours = normalize_hours(overtime)?;
    }

    check_hours(&entry.regular_hours, &entry.overtime_hours)?;
    if entry.total_hours() <= BigDecimal::from(0) {
        return Err(AppError::validation("a work log must carry positive hours"));
    }

    Ok(entry)
}

#[derive(Clone)]
pub struct LedgerService {
    pool: PgPool,
    work_logs: WorkLogRepository,
    projects: ProjectRepository,
}

impl LedgerService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            work_logs: WorkLogRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list_all(
        &self,
        company_id: Uuid,
        query: &WorkLogQuery,
    ) -> Result<Vec<WorkLogDetails>, AppError> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::validation("`from` must not be after `to`"));
            }
        }

        Ok(self.work_logs.list(company_id, query).await?)
    }

    pub async fn list_pending(&self, company_id: Uuid) -> Result<Vec<WorkLogDetails>, AppError> {
        Ok(self
            .work_logs
            .list_by_status(company_id, WorkLogStatus::Pending)
            .await?)
    }

    pub async fn list_settled(&self, company_id: Uuid) -> Result<Vec<WorkLogDetails>, AppError> {
        Ok(self
            .work_logs
            .list_by_status(company_id, WorkLogStatus::Settled)
            .await?)
    }

    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: UpdateWorkLogInput,
    ) -> Result<WorkLogEntry, AppError> {
        if input.is_empty() {
            return Err(AppError::validation("nothing to update"));
        }
        for hours in [&input.regular_hours, &input.overtime_hours].into_iter().flatten() {
            normalize_hours(hours)?;
        }

        let mut tx = DatabaseTransaction::begin(&self.pool).await?;
        let result = self.update_locked(&mut tx, company_id, id, &input).await;
        DatabaseTransaction::complete(tx, result).await
    }

    async fn update_locked(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
        input: &UpdateWorkLogInput,
    ) -> Result<WorkLogEntry, AppError> {
        let entry = self
            .work_logs
            .lock_by_id(conn, company_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("work log {} not found", id)))?;

        let updated = apply_update(entry, input)?;

        if let Some(project_id) = input.project_id {
            if !self
                .projects
                .exists_in_company(conn, company_id, project_id)
                .await?
            {
                return Err(AppError::not_found(format!("project {} not found", project_id)));
            }
        }

        Ok(self.work_logs.update_fields(conn, &updated).await?)
    }

    /// Remove a mis-entered log. Only pending entries may be deleted.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = DatabaseTransaction::begin(&self.pool).await?;
        let result = self.delete_locked(&mut tx, company_id, id).await;
        DatabaseTransaction::complete(tx, result).await
    }

    async fn delete_locked(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError> {
        let entry = self
            .work_logs
            .lock_by_id(conn, company_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("work log {} not found", id)))?;

        if !entry.state.is_pending() {
            return Err(AppError::invalid_state(format!(
                "work log {} is settled; void its payout first",
                id
            )));
        }

        self.work_logs.delete_pending(conn, company_id, id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::WorkLogState;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn entry(state: WorkLogState) -> WorkLogEntry {
        WorkLogEntry {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            regular_hours: dec("8.00"),
            overtime_hours: dec("0.00"),
            hourly_rate_at_time: dec("20.00"),
            currency: "EUR".to_string(),
            state,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn corrects_hours_and_keeps_the_rate() {
        let original = entry(WorkLogState::Pending);
        let input = UpdateWorkLogInput {
            overtime_hours: Some(dec("1.5")),
            ..Default::default()
        };

        let updated = apply_update(original.clone(), &input).unwrap();
        assert_eq!(updated.overtime_hours, dec("1.50"));
        assert_eq!(updated.regular_hours, original.regular_hours);
        assert_eq!(updated.hourly_rate_at_time, original.hourly_rate_at_time);
        assert_eq!(updated.state, WorkLogState::Pending);
    }

    #[test]
    fn settled_entries_cannot_be_edited() {
        let settled = entry(WorkLogState::Settled {
            payout_id: Uuid::new_v4(),
        });
        let input = UpdateWorkLogInput {
            regular_hours: Some(dec("6")),
            ..Default::default()
        };

        assert!(matches!(
            apply_update(settled, &input),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn correction_cannot_zero_out_an_entry() {
        let input = UpdateWorkLogInput {
            regular_hours: Some(dec("0")),
            ..Default::default()
        };

        assert!(matches!(
            apply_update(entry(WorkLogState::Pending), &input),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn correction_respects_hour_limits() {
        let input = UpdateWorkLogInput {
            overtime_hours: Some(dec("-2")),
            ..Default::default()
        };
        assert!(apply_update(entry(WorkLogState::Pending), &input).is_err());

        let input = UpdateWorkLogInput {
            regular_hours: Some(dec("25")),
            ..Default::default()
        };
        assert!(apply_update(entry(WorkLogState::Pending), &input).is_err());
    }

    #[test]
    fn huge_exponent_correction_is_rejected() {
        let input = UpdateWorkLogInput {
            regular_hours: Some(dec("1e30000000")),
            ..Default::default()
        };

        assert!(matches!(
            apply_update(entry(WorkLogState::Pending), &input),
            Err(AppError::Validation(ref m)) if m.contains("24 hours")
        ));
    }
}
