use actix_web::HttpResponse;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::Worker;
use crate::database::repositories::WorkerRepository;
use crate::error::AppError;
use crate::payroll::DateRange;
use crate::services::Claims;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    // 200 with data
    pub fn success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    // 201 with data
    pub fn created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }
}

impl ApiResponse<()> {
    // 200 with message, no data
    pub fn success_message(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
        })
    }

    // Error body, status set by the caller
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// Optional `date_from`/`date_to` query pair. The range only applies
/// when both ends are given.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RangeQuery {
    pub fn range(&self) -> Option<DateRange> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => Some(DateRange::new(from, to)),
            _ => None,
        }
    }
}

/// Loads a worker owned by the caller. Workers belonging to someone
/// else are reported as missing.
pub async fn owned_worker(
    repo: &WorkerRepository,
    claims: &Claims,
    worker_id: &str,
) -> Result<Worker, AppError> {
    repo.find_for_user(worker_id, claims.user_id())
        .await?
        .ok_or_else(|| AppError::worker_not_found(worker_id))
}
