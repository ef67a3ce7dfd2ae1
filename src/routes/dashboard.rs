use actix_web::web;

use crate::handlers::{dashboard, projects};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard").route("/stats", web::get().to(dashboard::get_dashboard_stats)),
    )
    .service(
        web::scope("/projects")
            .route("/{id}/details", web::get().to(projects::get_project_details)),
    );
}
