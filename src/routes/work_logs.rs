use actix_web::web;

use crate::handlers::work_logs;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/work-logs")
            .route("", web::get().to(work_logs::list_work_logs))
            .route("/bulk", web::post().to(work_logs::bulk_create))
            .route("/pending", web::get().to(work_logs::list_pending))
            .route("/history", web::get().to(work_logs::list_history))
            .route("/{id}", web::put().to(work_logs::update_work_log))
            .route("/{id}", web::delete().to(work_logs::delete_work_log)),
    );
}
