use actix_web::web;

use crate::handlers::payouts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payouts")
            .route("/settle", web::post().to(payouts::settle_worker))
            .route("/history", web::get().to(payouts::payout_history))
            .route("/{id}", web::get().to(payouts::get_payout))
            .route("/{id}", web::delete().to(payouts::void_payout)),
    );
}
