use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::{
    models::{NewPayout, Payout, PayoutWithWorker},
    utils::sql,
};

#[derive(Clone)]
pub struct PayoutRepository {
    pool: PgPool,
}

impl PayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        payout: &NewPayout,
    ) -> Result<Payout, sqlx::Error> {
        sqlx::query_as::<_, Payout>(&sql(r#"
            INSERT INTO
                worker_payouts (
                    company_id,
                    worker_id,
                    period_start,
                    period_end,
                    total_regular_hours,
                    total_overtime_hours,
                    total_amount,
                    currency,
                    note
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                company_id,
                worker_id,
                period_start,
                period_end,
                total_regular_hours,
                total_overtime_hours,
                total_amount,
                currency,
                paid_at,
                note
        "#))
        .bind(payout.company_id)
        .bind(payout.worker_id)
        .bind(payout.period_start)
        .bind(payout.period_end)
        .bind(&payout.total_regular_hours)
        .bind(&payout.total_overtime_hours)
        .bind(&payout.total_amount)
        .bind(&payout.currency)
        .bind(&payout.note)
        .fetch_one(&mut *conn)
        .await
    }

    /// Load a payout of the tenant and hold its row lock until commit.
    pub async fn lock_by_id(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<Option<Payout>, sqlx::Error> {
        sqlx::query_as::<_, Payout>(&sql(r#"
            SELECT
                id,
                company_id,
                worker_id,
                period_start,
                period_end,
                total_regular_hours,
                total_overtime_hours,
                total_amount,
                currency,
                paid_at,
                note
            FROM
                worker_payouts
            WHERE
                id = ?
                AND company_id = ?
            FOR UPDATE
        "#))
        .bind(payout_id)
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn delete(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&sql(
            "DELETE FROM worker_payouts WHERE id = ? AND company_id = ?",
        ))
        .bind(payout_id)
        .bind(company_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Payouts of a company with the worker they paid, most recent first.
    pub async fn history(&self, company_id: Uuid) -> Result<Vec<PayoutWithWorker>, sqlx::Error> {
        sqlx::query_as::<_, PayoutWithWorker>(&sql(r#"
            SELECT
                wp.id,
                wp.company_id,
                wp.worker_id,
                wp.period_start,
                wp.period_end,
                wp.total_regular_hours,
                wp.total_overtime_hours,
                wp.total_amount,
                wp.currency,
                wp.paid_at,
                wp.note,
                w.first_name,
                w.last_name,
                w.position
            FROM
                worker_payouts wp
                JOIN workers w ON w.id = wp.worker_id
            WHERE
                wp.company_id = ?
            ORDER BY
                wp.paid_at DESC
        "#))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_with_worker(
        &self,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<Option<PayoutWithWorker>, sqlx::Error> {
        sqlx::query_as::<_, PayoutWithWorker>(&sql(r#"
            SELECT
                wp.id,
                wp.company_id,
                wp.worker_id,
                wp.period_start,
                wp.period_end,
                wp.total_regular_hours,
                wp.total_overtime_hours,
                wp.total_amount,
                wp.currency,
                wp.paid_at,
                wp.note,
                w.first_name,
                w.last_name,
                w.position
            FROM
                worker_payouts wp
                JOIN workers w ON w.id = wp.worker_id
            WHERE
                wp.id = ?
                AND wp.company_id = ?
        "#))
        .bind(payout_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
    }
}
