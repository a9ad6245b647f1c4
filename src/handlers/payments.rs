use actix_web::{HttpResponse, Result, web};
use chrono::Local;

use crate::database::models::PaymentInput;
use crate::database::repositories::{PaymentRepository, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, owned_worker};
use crate::services::Claims;

pub async fn record_payment(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<PaymentRepository>,
    input: web::Json<PaymentInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(AppError::BadRequest("Payment amount must be positive".to_string()).into());
    }
    if input.period_from > input.period_to {
        return Err(
            AppError::BadRequest("Payment period ends before it starts".to_string()).into(),
        );
    }

    let worker = owned_worker(&workers, &claims, &input.worker_id).await?;
    let payment = repo
        .create_payment(&input, Local::now().date_naive())
        .await
        .map_err(AppError::from)?;

    log::info!("Payment {} recorded for worker {}", payment.id, worker.id);

    Ok(ApiResponse::created(payment))
}

pub async fn get_payments(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    repo: web::Data<PaymentRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&workers, &claims, &path.into_inner()).await?;

    let payments = repo
        .get_for_worker(&worker.id)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(payments))
}
