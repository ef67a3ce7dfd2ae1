pub mod analytics;
pub mod company;
mod decimal;
mod macros;
pub mod payout;
pub mod project;
pub mod work_log;
pub mod worker;

// Re-export all models for easy importing
pub use analytics::*;
pub use company::*;
pub use payout::*;
pub use project::*;
pub use work_log::*;
pub use worker::*;
