use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppError;

#[derive(Debug)]
pub struct DatabaseTransaction;

impl DatabaseTransaction {
    pub async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
        pool.begin().await.map_err(AppError::from)
    }

    /// Commit when the work inside the transaction succeeded, roll back otherwise.
    /// The original error is returned unchanged after a rollback.
    pub async fn complete<T>(
        tx: Transaction<'_, Postgres>,
        result: Result<T, AppError>,
    ) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                tx.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}
