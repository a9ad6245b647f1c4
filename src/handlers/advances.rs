use actix_web::{HttpResponse, Result, web};
use chrono::Local;

use crate::database::models::{AdvanceInput, TodayAdvanceTotal};
use crate::database::repositories::{AdvanceRepository, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, RangeQuery, owned_worker};
use crate::payroll::validate_advance;
use crate::services::Claims;

pub async fn record_advance(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AdvanceRepository>,
    input: web::Json<AdvanceInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    let worker = owned_worker(&workers, &claims, &input.worker_id).await?;
    validate_advance(input.amount, worker.max_advance_limit).map_err(AppError::from)?;

    let advance = repo.create_advance(&input).await.map_err(AppError::from)?;

    log::info!(
        "Advance of {} recorded for worker {} on {}",
        advance.amount,
        worker.id,
        advance.date
    );

    Ok(ApiResponse::created(advance))
}

pub async fn get_advances(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AdvanceRepository>,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&workers, &claims, &path.into_inner()).await?;

    let advances = repo
        .get_for_worker(&worker.id, query.range())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(advances))
}

/// Sum of advances handed out today, in server local time.
pub async fn get_today_total(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<AdvanceRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&workers, &claims, &path.into_inner()).await?;
    let today = Local::now().date_naive();

    let total = repo
        .total_for_day(&worker.id, today)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(TodayAdvanceTotal {
        worker_id: worker.id,
        date: today,
        total,
    }))
}
