use actix_web::web;
use sqlx::PgPool;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::{AnalyticsService, BulkEntryService, LedgerService, SettlementService};

/// Engine services shared by every worker thread.
#[derive(Clone)]
pub struct AppState {
    pub bulk_entry: web::Data<BulkEntryService>,
    pub ledger: web::Data<LedgerService>,
    pub settlement: web::Data<SettlementService>,
    pub analytics: web::Data<AnalyticsService>,
    pub config: web::Data<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            bulk_entry: web::Data::new(BulkEntryService::new(pool.clone())),
            ledger: web::Data::new(LedgerService::new(pool.clone())),
            settlement: web::Data::new(SettlementService::new(pool.clone())),
            analytics: web::Data::new(AnalyticsService::new(pool)),
            config: web::Data::new(config),
        }
    }

    /// Register services, extractor settings and the `/api/v1` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.bulk_entry.clone())
            .app_data(self.ledger.clone())
            .app_data(self.settlement.clone())
            .app_data(self.analytics.clone())
            .app_data(handlers::shared::json_config())
            .app_data(handlers::shared::path_config())
            .app_data(handlers::shared::query_config())
            .configure(routes::configure);
    }
}
