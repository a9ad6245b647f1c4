use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::AppState;
use crate::database::models::{AmountInput, CreateWorkerInput, HiddenInput, UpdateWorkerInput};
use crate::database::repositories::{WorkerFilter, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, owned_worker};
use crate::services::Claims;

#[derive(Debug, Deserialize)]
pub struct WorkerQuery {
    pub site_id: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_hidden: bool,
}

fn validate_rate(rate: Option<f64>) -> Result<(), AppError> {
    match rate {
        Some(rate) if rate.is_nan() || rate < 0.0 => Err(AppError::BadRequest(
            "Daily rate cannot be negative".to_string(),
        )),
        _ => Ok(()),
    }
}

pub async fn create_worker(
    claims: Claims,
    state: web::Data<AppState>,
    repo: web::Data<WorkerRepository>,
    input: web::Json<CreateWorkerInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Worker name is required".to_string()).into());
    }
    validate_rate(input.daily_rate)?;

    state
        .subscription_service
        .ensure_can_add_worker(claims.user_id())
        .await?;

    let worker = repo
        .create_worker(claims.user_id(), input)
        .await
        .map_err(AppError::from)?;

    log::info!("Worker {} added by {}", worker.id, claims.user_id());

    Ok(ApiResponse::created(worker))
}

/// List the caller's workers. Hidden workers are left out unless asked for.
pub async fn get_workers(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    query: web::Query<WorkerQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let filter = WorkerFilter {
        site_id: query.site_id,
        search: query.search.filter(|s| !s.trim().is_empty()),
        include_hidden: query.include_hidden,
    };

    let workers = repo
        .get_workers(claims.user_id(), &filter)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(workers))
}

pub async fn get_worker(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&repo, &claims, &path.into_inner()).await?;

    Ok(ApiResponse::success(worker))
}

pub async fn update_worker(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    path: web::Path<String>,
    input: web::Json<UpdateWorkerInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    validate_rate(input.daily_rate)?;

    let worker = owned_worker(&repo, &claims, &path.into_inner()).await?;
    let updated = repo
        .update_worker(&worker.id, input)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}

pub async fn delete_worker(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let worker = owned_worker(&repo, &claims, &path.into_inner()).await?;
    repo.delete_worker(&worker.id)
        .await
        .map_err(AppError::from)?;

    log::info!("Worker {} deleted by {}", worker.id, claims.user_id());

    Ok(ApiResponse::success_message("Worker deleted"))
}

pub async fn set_hidden(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    path: web::Path<String>,
    input: web::Json<HiddenInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let worker = owned_worker(&repo, &claims, &path.into_inner()).await?;
    let updated = repo
        .set_hidden(&worker.id, input.hidden)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}

pub async fn add_overtime(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    path: web::Path<String>,
    input: web::Json<AmountInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    if !input.amount.is_finite() || input.amount < 0.0 {
        return Err(AppError::BadRequest("Overtime cannot be negative".to_string()).into());
    }

    let worker = owned_worker(&repo, &claims, &path.into_inner()).await?;
    let updated = repo
        .add_overtime(&worker.id, input.amount)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}

pub async fn add_adjustment(
    claims: Claims,
    repo: web::Data<WorkerRepository>,
    path: web::Path<String>,
    input: web::Json<AmountInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    if !input.amount.is_finite() {
        return Err(AppError::BadRequest("Adjustment must be a number".to_string()).into());
    }

    let worker = owned_worker(&repo, &claims, &path.into_inner()).await?;
    let updated = repo
        .add_adjustment(&worker.id, input.amount)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(updated))
}
