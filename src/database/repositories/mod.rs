pub mod company;
pub mod payout;
pub mod project;
pub mod work_log;
pub mod worker;

// Re-export all repositories for easy importing
pub use company::CompanyRepository;
pub use payout::PayoutRepository;
pub use project::ProjectRepository;
pub use work_log::WorkLogRepository;
pub use worker::WorkerRepository;
