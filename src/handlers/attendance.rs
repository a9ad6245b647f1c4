use actix_web::{HttpResponse, Result, web};
use serde::{Deserialize, Serialize};

use crate::database::models::{
    Attendance, AttendanceInput, AttendanceUpdateInput, SalaryAccrual,
};
use crate::database::repositories::{AttendanceRepository, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, RangeQuery, owned_worker};
use crate::services::Claims;

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkedAttendance {
    pub attendance: Attendance,
    pub accrual: SalaryAccrual,
}

/// Set the status for a day, replacing any earlier mark.
pub async fn mark_attendance(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AttendanceRepository>,
    input: web::Json<AttendanceInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    let worker = owned_worker(&workers, &claims, &input.worker_id).await?;

    let (attendance, accrual) = repo
        .mark_attendance(&worker, input.date, input.status, claims.user_id())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(MarkedAttendance {
        attendance,
        accrual,
    }))
}

/// Picking the status already stored for the day clears it.
pub async fn toggle_attendance(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AttendanceRepository>,
    input: web::Json<AttendanceInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    let worker = owned_worker(&workers, &claims, &input.worker_id).await?;

    let result = repo
        .toggle_attendance(&worker, input.date, input.status, claims.user_id())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(result))
}

pub async fn get_worker_attendance(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&workers, &claims, &path.into_inner()).await?;

    let records = repo
        .get_for_worker(&worker.id, query.range())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(records))
}

pub async fn update_attendance(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AttendanceRepository>,
    path: web::Path<String>,
    input: web::Json<AttendanceUpdateInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let attendance_id = path.into_inner();
    let existing = repo
        .find_by_id(&attendance_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))?;

    let worker = workers
        .find_for_user(&existing.worker_id, claims.user_id())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::PermissionDenied("Access denied".to_string()))?;

    let updated = repo
        .update_status(&existing, worker.daily_rate, input.status, claims.user_id())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}
