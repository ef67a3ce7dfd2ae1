use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::{
    models::WorkerRate,
    utils::sql,
};

#[derive(Clone)]
pub struct WorkerRepository {
    pool: PgPool,
}

impl WorkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current rate and currency of the given workers, restricted to the tenant.
    /// Workers of other companies are simply absent from the result.
    pub async fn current_rates(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        worker_ids: &[Uuid],
    ) -> Result<Vec<WorkerRate>, sqlx::Error> {
        sqlx::query_as::<_, WorkerRate>(&sql(r#"
            SELECT
                id,
                hourly_rate,
                currency
            FROM
                workers
            WHERE
                company_id = ?
                AND id = ANY(?)
        "#))
        .bind(company_id)
        .bind(worker_ids)
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn exists_in_company(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        worker_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(&sql(
            "SELECT EXISTS(SELECT 1 FROM workers WHERE id = ? AND company_id = ?)",
        ))
        .bind(worker_id)
        .bind(company_id)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn count_for_company(&self, company_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&sql("SELECT COUNT(*) FROM workers WHERE company_id = ?"))
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
    }
}
