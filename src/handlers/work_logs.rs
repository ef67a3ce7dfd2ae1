use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::{BulkWorkLogInput, UpdateWorkLogInput, WorkLogQuery};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{BulkEntryService, LedgerService, TenantContext};

/// Record a day's hours for several workers on one project.
pub async fn bulk_create(
    ctx: TenantContext,
    service: web::Data<BulkEntryService>,
    input: web::Json<BulkWorkLogInput>,
) -> Result<HttpResponse, AppError> {
    let created = service.submit(ctx.company_id, input.into_inner()).await?;

    Ok(ApiResponse::created(created))
}

pub async fn list_work_logs(
    ctx: TenantContext,
    ledger: web::Data<LedgerService>,
    query: web::Query<WorkLogQuery>,
) -> Result<HttpResponse, AppError> {
    let logs = ledger.list_all(ctx.company_id, &query).await?;

    Ok(ApiResponse::success(logs))
}

pub async fn list_pending(
    ctx: TenantContext,
    ledger: web::Data<LedgerService>,
) -> Result<HttpResponse, AppError> {
    let logs = ledger.list_pending(ctx.company_id).await?;

    Ok(ApiResponse::success(logs))
}

pub async fn list_history(
    ctx: TenantContext,
    ledger: web::Data<LedgerService>,
) -> Result<HttpResponse, AppError> {
    let logs = ledger.list_settled(ctx.company_id).await?;

    Ok(ApiResponse::success(logs))
}

pub async fn update_work_log(
    ctx: TenantContext,
    ledger: web::Data<LedgerService>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateWorkLogInput>,
) -> Result<HttpResponse, AppError> {
    let updated = ledger
        .update(ctx.company_id, path.into_inner(), input.into_inner())
        .await?;

    Ok(ApiResponse::success(updated))
}

pub async fn delete_work_log(
    ctx: TenantContext,
    ledger: web::Data<LedgerService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    ledger.delete(ctx.company_id, path.into_inner()).await?;

    Ok(ApiResponse::<()>::message("Work log deleted"))
}
