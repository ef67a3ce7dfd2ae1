pub mod dashboard;
pub mod payouts;
pub mod projects;
pub mod shared;
pub mod work_logs;
