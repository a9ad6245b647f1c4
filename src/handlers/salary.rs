use actix_web::{HttpResponse, Result, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::database::repositories::{AdvanceRepository, AttendanceRepository, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, RangeQuery, owned_worker};
use crate::payroll::DateRange;
use crate::services::Claims;

#[derive(Debug, Deserialize)]
pub struct SalaryQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Earnings summary for a worker over an inclusive range.
pub async fn get_salary(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    attendance: web::Data<AttendanceRepository>,
    advances: web::Data<AdvanceRepository>,
    path: web::Path<String>,
    query: web::Query<SalaryQuery>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&workers, &claims, &path.into_inner()).await?;
    let range = DateRange::new(query.date_from, query.date_to);

    let records = attendance
        .get_for_worker(&worker.id, Some(range))
        .await
        .map_err(AppError::from)?;
    let taken = advances
        .get_for_worker(&worker.id, Some(range))
        .await
        .map_err(AppError::from)?;

    let summary = worker.ledger().summarize(
        range,
        records.iter().map(|r| (r.date, r.status)),
        taken.iter().map(|a| (a.date, a.amount)),
    );

    Ok(ApiResponse::success(summary))
}

pub async fn get_accruals(
    claims: Claims,
    workers: web::Data<WorkerRepository>,
    attendance: web::Data<AttendanceRepository>,
    path: web::Path<String>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse> {
    let worker = owned_worker(&workers, &claims, &path.into_inner()).await?;

    let accruals = attendance
        .get_accruals(&worker.id, query.range())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(accruals))
}
