use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::models::CreateSiteInput;
use crate::database::repositories::SiteRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn create_site(
    claims: Claims,
    state: web::Data<AppState>,
    repo: web::Data<SiteRepository>,
    input: web::Json<CreateSiteInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let input = input.into_inner();
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Site name is required".to_string()).into());
    }

    state
        .subscription_service
        .ensure_can_add_site(claims.user_id())
        .await?;

    let site = repo
        .create_site(claims.user_id(), input)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::created(site))
}

pub async fn get_sites(claims: Claims, repo: web::Data<SiteRepository>) -> Result<HttpResponse> {
    let sites = repo
        .get_sites_for_user(claims.user_id())
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(sites))
}
