use actix_web::{HttpResponse, Result, web};

use crate::AppState;
use crate::database::models::{CreateUserInput, LoginInput};
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<CreateUserInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.register(request.into_inner()).await?;

    Ok(ApiResponse::created(response))
}

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = state.auth_service.login(request.into_inner()).await?;

    Ok(ApiResponse::success(response))
}

pub async fn me(claims: Claims, state: web::Data<AppState>) -> Result<HttpResponse> {
    let user = state.auth_service.current_user(&claims).await?;

    Ok(ApiResponse::success(user))
}
