use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::models::ReportQuery;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn attendance_report(
    claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let report = state
        .report_service
        .attendance_report(claims.user_id(), &query)
        .await?;

    Ok(ApiResponse::success(report))
}

pub async fn payroll_report(
    claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let report = state
        .report_service
        .payroll_report(claims.user_id(), &query)
        .await?;

    Ok(ApiResponse::success(report))
}
