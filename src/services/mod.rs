pub mod analytics;
pub mod auth;
pub mod bulk_entry;
pub mod ledger;
pub mod settlement;

pub use analytics::AnalyticsService;
pub use auth::{Claims, TenantContext};
pub use bulk_entry::BulkEntryService;
pub use ledger::LedgerService;
pub use settlement::SettlementService;
