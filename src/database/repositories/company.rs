use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{models::CompanyProfile, utils::sql};

/// Used when a tenant row has no explicit base currency.
pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, company_id: Uuid) -> Result<Option<CompanyProfile>, sqlx::Error> {
        sqlx::query_as::<_, CompanyProfile>(&sql(r#"
            SELECT
                id,
                name,
                base_currency
            FROM
                companies
            WHERE
                id = ?
        "#))
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn base_currency(&self, company_id: Uuid) -> Result<String, sqlx::Error> {
        Ok(self
            .find_by_id(company_id)
            .await?
            .map(|company| company.base_currency)
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string()))
    }
}
