use actix_web::web;

pub mod dashboard;
pub mod payouts;
pub mod work_logs;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(work_logs::configure)
            .configure(payouts::configure)
            .configure(dashboard::configure),
    );
}
