use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::{
    models::{
        NewPayout, PayoutDetails, PayoutWithWorker, SettlementReceipt, VoidReceipt, WorkLogEntry,
    },
    repositories::{PayoutRepository, WorkLogRepository, WorkerRepository},
    transaction::DatabaseTransaction,
};
use crate::error::AppError;

pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettlementTotals {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_regular_hours: BigDecimal,
    pub total_overtime_hours: BigDecimal,
    pub total_amount: BigDecimal,
    pub currency: String,
}

/// Fold a worker's pending entries into payout totals. The amount is summed
/// at full precision and rounded once.
pub fn compute_totals(entries: &[WorkLogEntry]) -> Result<SettlementTotals, AppError> {
    let Some(first) = entries.first() else {
        return Err(AppError::NothingToSettle("no pending logs to settle".to_string()));
    };

    let mut totals = SettlementTotals {
        period_start: first.date,
        period_end: first.date,
        total_regular_hours: BigDecimal::from(0),
        total_overtime_hours: BigDecimal::from(0),
        total_amount: BigDecimal::from(0),
        currency: first.currency.clone(),
    };

    for entry in entries {
        if entry.currency != totals.currency {
            return Err(AppError::invalid_state(format!(
                "one payout cannot mix currencies ({} and {})",
                totals.currency, entry.currency
            )));
        }

        totals.period_start = totals.period_start.min(entry.date);
        totals.period_end = totals.period_end.max(entry.date);
        totals.total_regular_hours += &entry.regular_hours;
        totals.total_overtime_hours += &entry.overtime_hours;
        totals.total_amount += entry.cost();
    }

    totals.total_regular_hours = round_money(&totals.total_regular_hours);
    totals.total_overtime_hours = round_money(&totals.total_overtime_hours);
    totals.total_amount = round_money(&totals.total_amount);

    Ok(totals)
}

/// Split a worker's pending entries into the ones a single payout covers and
/// the ones left pending. With no currency requested, the group is the
/// currency of the first entry, which is the oldest when `pending` comes from
/// the ledger.
pub fn currency_group(
    pending: Vec<WorkLogEntry>,
    currency: Option<&str>,
) -> (Vec<WorkLogEntry>, Vec<WorkLogEntry>) {
    let target = match currency {
        Some(currency) => currency.to_string(),
        None => match pending.first() {
            Some(oldest) => oldest.currency.clone(),
            None => return (pending, Vec::new()),
        },
    };

    pending
        .into_iter()
        .partition(|entry| entry.currency.eq_ignore_ascii_case(&target))
}

#[derive(Clone)]
pub struct SettlementService {
    pool: PgPool,
    work_logs: WorkLogRepository,
    workers: WorkerRepository,
    payouts: PayoutRepository,
}

impl SettlementService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            work_logs: WorkLogRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool.clone()),
            payouts: PayoutRepository::new(pool.clone()),
            pool,
        }
    }

    /// Pay out a worker's pending entries in one currency: `currency` when
    /// given, otherwise the currency of the oldest pending entry. Entries in
    /// other currencies stay pending for a later call. Concurrent calls for
    /// the same worker serialise on the entry row locks; the loser sees
    /// nothing pending.
    pub async fn settle_worker(
        &self,
        company_id: Uuid,
        worker_id: Uuid,
        currency: Option<&str>,
        note: Option<String>,
    ) -> Result<SettlementReceipt, AppError> {
        let mut tx = DatabaseTransaction::begin(&self.pool).await?;
        let result = self
            .settle_locked(&mut tx, company_id, worker_id, currency, note)
            .await;
        let receipt = DatabaseTransaction::complete(tx, result).await?;

        log::info!(
            "Settled {} work log(s) for worker {} into payout {} ({} {})",
            receipt.settled_log_ids.len(),
            worker_id,
            receipt.payout.id,
            receipt.payout.total_amount,
            receipt.payout.currency
        );

        Ok(receipt)
    }

    async fn settle_locked(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        worker_id: Uuid,
        currency: Option<&str>,
        note: Option<String>,
    ) -> Result<SettlementReceipt, AppError> {
        if !self
            .workers
            .exists_in_company(conn, company_id, worker_id)
            .await?
        {
            return Err(AppError::not_found(format!("worker {} not found", worker_id)));
        }

        let pending = self
            .work_logs
            .lock_pending_for_worker(conn, company_id, worker_id)
            .await?;
        let (group, remaining) = currency_group(pending, currency);
        if group.is_empty() {
            if let Some(currency) = currency {
                return Err(AppError::NothingToSettle(format!(
                    "no pending logs in {} to settle",
                    currency
                )));
            }
        }
        let totals = compute_totals(&group)?;

        let payout = self
            .payouts
            .insert(
                conn,
                &NewPayout {
                    company_id,
                    worker_id,
                    period_start: totals.period_start,
                    period_end: totals.period_end,
                    total_regular_hours: totals.total_regular_hours,
                    total_overtime_hours: totals.total_overtime_hours,
                    total_amount: totals.total_amount,
                    currency: totals.currency,
                    note,
                },
            )
            .await?;

        let settled_log_ids: Vec<Uuid> = group.iter().map(|entry| entry.id).collect();
        let updated = self
            .work_logs
            .mark_settled(conn, company_id, &settled_log_ids, payout.id)
            .await?;

        if updated != settled_log_ids.len() as u64 {
            return Err(AppError::internal_server_error_message(format!(
                "settled {} of {} locked work logs",
                updated,
                settled_log_ids.len()
            )));
        }

        Ok(SettlementReceipt {
            payout,
            settled_log_ids,
            pending_remaining: remaining.len(),
        })
    }

    /// Undo a settlement: its entries return to pending and the payout row
    /// is removed.
    pub async fn void_payout(
        &self,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<VoidReceipt, AppError> {
        let mut tx = DatabaseTransaction::begin(&self.pool).await?;
        let result = self.void_locked(&mut tx, company_id, payout_id).await;
        let receipt = DatabaseTransaction::complete(tx, result).await?;

        log::info!(
            "Voided payout {}, {} work log(s) back to pending",
            payout_id,
            receipt.reopened_log_ids.len()
        );

        Ok(receipt)
    }

    async fn void_locked(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<VoidReceipt, AppError> {
        self.payouts
            .lock_by_id(conn, company_id, payout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("payout {} not found", payout_id)))?;

        let reopened_log_ids = self
            .work_logs
            .reopen_for_payout(conn, company_id, payout_id)
            .await?;
        self.payouts.delete(conn, company_id, payout_id).await?;

        Ok(VoidReceipt {
            payout_id,
            reopened_log_ids,
        })
    }

    pub async fn history(&self, company_id: Uuid) -> Result<Vec<PayoutWithWorker>, AppError> {
        Ok(self.payouts.history(company_id).await?)
    }

    pub async fn payout_details(
        &self,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<PayoutDetails, AppError> {
        let PayoutWithWorker { payout, worker } = self
            .payouts
            .find_with_worker(company_id, payout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("payout {} not found", payout_id)))?;

        let work_logs = self.work_logs.list_for_payout(company_id, payout_id).await?;

        Ok(PayoutDetails {
            payout,
            worker,
            work_logs,
        })
    }
}
