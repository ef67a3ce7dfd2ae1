use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use crate::database::models::SettleWorkerInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::{SettlementService, TenantContext};

/// Settle the pending hours of one worker. Payroll roles only.
pub async fn settle_worker(
    ctx: TenantContext,
    settlement: web::Data<SettlementService>,
    input: web::Json<SettleWorkerInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    ctx.requires_payroll()?;

    let SettleWorkerInput {
        worker_id,
        currency,
        note,
    } = input.into_inner();
    log::info!(
        "User {} settling worker {} (correlation_id={})",
        ctx.user_id,
        worker_id,
        req.correlation_id().unwrap_or_default()
    );

    let receipt = settlement
        .settle_worker(ctx.company_id, worker_id, currency.as_deref(), note)
        .await?;

    Ok(ApiResponse::success_with_message(
        receipt,
        "Worker settled successfully",
    ))
}

pub async fn payout_history(
    ctx: TenantContext,
    settlement: web::Data<SettlementService>,
) -> Result<HttpResponse, AppError> {
    let history = settlement.history(ctx.company_id).await?;

    Ok(ApiResponse::success(history))
}

pub async fn get_payout(
    ctx: TenantContext,
    settlement: web::Data<SettlementService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let details = settlement
        .payout_details(ctx.company_id, path.into_inner())
        .await?;

    Ok(ApiResponse::success(details))
}

pub async fn void_payout(
    ctx: TenantContext,
    settlement: web::Data<SettlementService>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    ctx.requires_payroll()?;

    let payout_id = path.into_inner();
    log::info!(
        "User {} voiding payout {} (correlation_id={})",
        ctx.user_id,
        payout_id,
        req.correlation_id().unwrap_or_default()
    );

    let receipt = settlement.void_payout(ctx.company_id, payout_id).await?;

    Ok(ApiResponse::success_with_message(
        receipt,
        "Payout voided, work logs returned to pending",
    ))
}
