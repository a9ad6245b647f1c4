use actix_web::{HttpResponse, Result, web};
use serde::Serialize;

use crate::AppState;
use crate::database::models::{PlanLimits, Subscription, SubscriptionInput};
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub limits: PlanLimits,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        let limits = subscription.effective_limits();
        Self {
            subscription,
            limits,
        }
    }
}

pub async fn get_subscription(
    claims: Claims,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let subscription = state
        .subscription_service
        .get_subscription(claims.user_id())
        .await?;

    Ok(ApiResponse::success(SubscriptionResponse::from(subscription)))
}

pub async fn update_subscription(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<SubscriptionInput>,
) -> Result<HttpResponse> {
    claims.require_editor()?;

    let subscription = state
        .subscription_service
        .update_subscription(claims.user_id(), input.into_inner())
        .await?;

    Ok(ApiResponse::success(SubscriptionResponse::from(subscription)))
}
