use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::{
    models::{Project, ProjectStatus},
    utils::sql,
};

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&sql(r#"
            SELECT
                id,
                company_id,
                name,
                status,
                created_at
            FROM
                projects
            WHERE
                id = ?
                AND company_id = ?
        "#))
        .bind(project_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn exists_in_company(
        &self,
        conn: &mut PgConnection,
        company_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(&sql(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ? AND company_id = ?)",
        ))
        .bind(project_id)
        .bind(company_id)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn count_by_status(
        &self,
        company_id: Uuid,
        status: ProjectStatus,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&sql(
            "SELECT COUNT(*) FROM projects WHERE company_id = ? AND status = ?",
        ))
        .bind(company_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }
}
