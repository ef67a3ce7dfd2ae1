use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{AnalyticsService, TenantContext};

pub async fn get_dashboard_stats(
    ctx: TenantContext,
    analytics: web::Data<AnalyticsService>,
) -> Result<HttpResponse, AppError> {
    let today = Utc::now().date_naive();
    let dashboard = analytics.dashboard(ctx.company_id, today).await?;

    Ok(ApiResponse::success(dashboard))
}
