use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AnalyticsService, TenantContext};

/// Project with its work logs and labour cost breakdown.
pub async fn get_project_details(
    ctx: TenantContext,
    analytics: web::Data<AnalyticsService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let details = analytics
        .project_details(ctx.company_id, path.into_inner())
        .await?;

    Ok(ApiResponse::success(details))
}
