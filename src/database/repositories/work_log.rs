use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::{
    models::{
        NewWorkLog, WorkLogDetails, WorkLogDetailsRow, WorkLogEntry, WorkLogQuery, WorkLogRow,
        WorkLogStatus,
    },
    utils::sql,
};

const WORK_LOG_COLUMNS: &str = r#"
    wl.id,
    wl.company_id,
    wl.worker_id,
    wl.project_id,
    wl.date,
    wl.regular_hours,
    wl.overtime_hours,
    wl.status,
    wl.payout_id,
    wl.hourly_rate_at_time,
    wl.currency,
    wl.created_at
"#;

const DETAIL_COLUMNS: &str = r#"
    w.first_name AS worker_first_name,
    w.last_name AS worker_last_name,
    w.position AS worker_position,
    p.name AS project_name
"#;

const DETAIL_JOINS: &str = r#"
    JOIN workers w ON w.id = wl.worker_id
    JOIN projects p ON p.id = wl.project_id
"#;

fn into_entries(rows: Vec<WorkLogRow>) -> Result<Vec<WorkLogEntry>, sqlx::Error> {
    rows.into_iter().map(WorkLogEntry::try_from).collect()
}

fn into_details(rows: Vec<WorkLogDetailsRow>) -> Result<Vec<WorkLogDetails>, sqlx::Error> {
    rows.into_iter().map(WorkLogDetails::try_from).collect()
}

#[derive(Clone)]
pub struct WorkLogRepository {
    pool: PgPool,
}

impl WorkLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All entries of a company, optionally bounded by date, newest day first.
    pub async fn list(
        &self,
        company_id: Uuid,
        query: &WorkLogQuery,
    ) -> Result<Vec<WorkLogDetails>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogDetailsRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}, {DETAIL_COLUMNS}
            FROM work_logs wl
            {DETAIL_JOINS}
            WHERE
                wl.company_id = ?
                AND (?::DATE IS NULL OR wl.date >= ?)
                AND (?::DATE IS NULL OR wl.date <= ?)
            ORDER BY wl.date DESC, wl.entry_seq DESC
            "#
        )))
        .bind(company_id)
        .bind(query.from)
        .bind(query.from)
        .bind(query.to)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await?;

        into_details(rows)
    }

    pub async fn list_by_status(
        &self,
        company_id: Uuid,
        status: WorkLogStatus,
    ) -> Result<Vec<WorkLogDetails>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogDetailsRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}, {DETAIL_COLUMNS}
            FROM work_logs wl
            {DETAIL_JOINS}
            WHERE wl.company_id = ? AND wl.status = ?
            ORDER BY wl.date DESC, wl.entry_seq DESC
            "#
        )))
        .bind(company_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        into_details(rows)
    }

    pub async fn list_for_project(
        &self,
        company_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<WorkLogDetails>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogDetailsRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}, {DETAIL_COLUMNS}
            FROM work_logs wl
            {DETAIL_JOINS}
            WHERE wl.company_id = ? AND wl.project_id = ?
            ORDER BY wl.date DESC, wl.entry_seq DESC
            "#
        )))
        .bind(company_id)
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        into_details(rows)
    }

    /// Bare entries in a status, used for cost rollups.
    pub async fn entries_by_status(
        &self,
        company_id: Uuid,
        status: WorkLogStatus,
    ) -> Result<Vec<WorkLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}
            FROM work_logs wl
            WHERE wl.company_id = ? AND wl.status = ?
            ORDER BY wl.entry_seq
            "#
        )))
        .bind(company_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    /// Entries whose calendar day falls within `[start, end]`.
    pub async fn entries_between(
        &self,
        company_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}
            FROM work_logs wl
            WHERE wl.company_id = ? AND wl.date BETWEEN ? AND ?
            ORDER BY wl.date, wl.entry_seq
            "#
        )))
        .bind(company_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    /// Most recently created entries; rows created together keep insertion order.
    pub async fn recent(
        &self,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WorkLogDetails>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogDetailsRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}, {DETAIL_COLUMNS}
            FROM work_logs wl
            {DETAIL_JOINS}
            WHERE wl.company_id = ?
            ORDER BY wl.created_at DESC, wl.entry_seq ASC
            LIMIT ?
            "#
        )))
        .bind(company_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_details(rows)
    }

    pub async fn list_for_payout(
        &self,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<Vec<WorkLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}
            FROM work_logs wl
            WHERE wl.company_id = ? AND wl.payout_id = ?
            ORDER BY wl.date, wl.entry_seq
            "#
        )))
        .bind(company_id)
        .bind(payout_id)
        .fetch_all(&self.pool)
        .await?;

        into_entries(rows)
    }

    /// Load one entry of the tenant and lock it for the rest of the transaction.
    pub async fn lock_by_id(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<WorkLogEntry>, sqlx::Error> {
        let row = sqlx::query_as::<_, WorkLogRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}
            FROM work_logs wl
            WHERE wl.id = ? AND wl.company_id = ?
            FOR UPDATE
            "#
        )))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(WorkLogEntry::try_from).transpose()
    }

    /// Lock every pending entry of a worker. A concurrent settlement of the same
    /// worker waits here and then sees the rows as already settled.
    pub async fn lock_pending_for_worker(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        worker_id: Uuid,
    ) -> Result<Vec<WorkLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, WorkLogRow>(&sql(&format!(
            r#"
            SELECT {WORK_LOG_COLUMNS}
            FROM work_logs wl
            WHERE wl.company_id = ? AND wl.worker_id = ? AND wl.status = ?
            ORDER BY wl.date, wl.entry_seq
            FOR UPDATE
            "#
        )))
        .bind(company_id)
        .bind(worker_id)
        .bind(WorkLogStatus::Pending)
        .fetch_all(&mut *conn)
        .await?;

        into_entries(rows)
    }

    /// Insert a batch of pending entries in a single statement.
    pub async fn insert_many(
        &self,
        conn: &mut PgConnection,
        logs: &[NewWorkLog],
    ) -> Result<Vec<WorkLogEntry>, sqlx::Error> {
        if logs.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO work_logs (company_id, worker_id, project_id, date, regular_hours, \
             overtime_hours, status, hourly_rate_at_time, currency) ",
        );

        builder.push_values(logs, |mut row, log| {
            row.push_bind(log.company_id)
                .push_bind(log.worker_id)
                .push_bind(log.project_id)
                .push_bind(log.date)
                .push_bind(log.regular_hours.clone())
                .push_bind(log.overtime_hours.clone())
                .push_bind(WorkLogStatus::Pending)
                .push_bind(log.hourly_rate_at_time.clone())
                .push_bind(log.currency.clone());
        });

        builder.push(
            " RETURNING id, company_id, worker_id, project_id, date, regular_hours, \
             overtime_hours, status, payout_id, hourly_rate_at_time, currency, created_at",
        );

        let rows = builder
            .build_query_as::<WorkLogRow>()
            .fetch_all(&mut *conn)
            .await?;

        into_entries(rows)
    }

    /// Rewrite the correctable fields of an entry. Rate, currency and state are
    /// not touched.
    pub async fn update_fields(
        &self,
        conn: &mut PgConnection,
        entry: &WorkLogEntry,
    ) -> Result<WorkLogEntry, sqlx::Error> {
        let row = sqlx::query_as::<_, WorkLogRow>(&sql(r#"
            UPDATE work_logs
            SET
                date = ?,
                project_id = ?,
                regular_hours = ?,
                overtime_hours = ?
            WHERE id = ? AND company_id = ?
            RETURNING
                id,
                company_id,
                worker_id,
                project_id,
                date,
                regular_hours,
                overtime_hours,
                status,
                payout_id,
                hourly_rate_at_time,
                currency,
                created_at
        "#))
        .bind(entry.date)
        .bind(entry.project_id)
        .bind(&entry.regular_hours)
        .bind(&entry.overtime_hours)
        .bind(entry.id)
        .bind(entry.company_id)
        .fetch_one(&mut *conn)
        .await?;

        row.try_into()
    }

    pub async fn delete_pending(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&sql(
            "DELETE FROM work_logs WHERE id = ? AND company_id = ? AND status = ?",
        ))
        .bind(id)
        .bind(company_id)
        .bind(WorkLogStatus::Pending)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Flip exactly the given pending entries to settled under `payout_id`.
    pub async fn mark_settled(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        ids: &[Uuid],
        payout_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&sql(r#"
            UPDATE work_logs
            SET status = ?, payout_id = ?
            WHERE company_id = ? AND status = ? AND id = ANY(?)
        "#))
        .bind(WorkLogStatus::Settled)
        .bind(payout_id)
        .bind(company_id)
        .bind(WorkLogStatus::Pending)
        .bind(ids)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Return every entry of a payout to the pending pool.
    pub async fn reopen_for_payout(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        payout_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let ids = sqlx::query_scalar::<_, Uuid>(&sql(r#"
            UPDATE work_logs
            SET status = ?, payout_id = NULL
            WHERE company_id = ? AND payout_id = ?
            RETURNING id
        "#))
        .bind(WorkLogStatus::Pending)
        .bind(company_id)
        .bind(payout_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids)
    }
}
