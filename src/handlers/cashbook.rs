use actix_web::{HttpResponse, Result, web};

use crate::database::models::{CashbookEntryInput, CashbookSummary};
use crate::database::repositories::{CashbookFilter, CashbookRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn create_entry(
    claims: Claims,
    repo: web::Data<CashbookRepository>,
    input: web::Json<CashbookEntryInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    if input.description.trim().is_empty() {
        return Err(AppError::BadRequest("Description is required".to_string()).into());
    }
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(AppError::BadRequest("Amount must be positive".to_string()).into());
    }

    let entry = repo
        .create_entry(claims.user_id(), input)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::created(entry))
}

pub async fn get_entries(
    claims: Claims,
    repo: web::Data<CashbookRepository>,
    query: web::Query<CashbookFilter>,
) -> Result<HttpResponse> {
    let entries = repo
        .get_entries(claims.user_id(), &query)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(entries))
}

/// Income, expense and balance over the filtered entries.
pub async fn get_summary(
    claims: Claims,
    repo: web::Data<CashbookRepository>,
    query: web::Query<CashbookFilter>,
) -> Result<HttpResponse> {
    let entries = repo
        .get_entries(claims.user_id(), &query)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(CashbookSummary::from_entries(&entries)))
}
