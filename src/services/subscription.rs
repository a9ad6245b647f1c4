use moka::future::Cache;
use std::time::Duration;

use crate::database::models::{PlanLimits, Subscription, SubscriptionInput};
use crate::database::repositories::{SiteRepository, SubscriptionRepository, WorkerRepository};
use crate::error::AppError;

/// Resolves a user's plan and enforces its site and worker caps.
///
/// Plans are read on every create, so lookups go through a short-lived
/// cache that is refreshed whenever the plan changes.
#[derive(Clone)]
pub struct SubscriptionService {
    subscription_repository: SubscriptionRepository,
    site_repository: SiteRepository,
    worker_repository: WorkerRepository,
    cache: Cache<String, Subscription>,
}

impl SubscriptionService {
    pub fn new(
        subscription_repository: SubscriptionRepository,
        site_repository: SiteRepository,
        worker_repository: WorkerRepository,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300))
            .build();

        Self {
            subscription_repository,
            site_repository,
            worker_repository,
            cache,
        }
    }

    pub async fn get_subscription(&self, user_id: &str) -> Result<Subscription, AppError> {
        if let Some(subscription) = self.cache.get(user_id).await {
            return Ok(subscription);
        }

        let subscription = self
            .subscription_repository
            .find_for_user(user_id)
            .await?
            .unwrap_or_else(|| Subscription::basic(user_id));

        self.cache
            .insert(user_id.to_string(), subscription.clone())
            .await;

        Ok(subscription)
    }

    pub async fn update_subscription(
        &self,
        user_id: &str,
        input: SubscriptionInput,
    ) -> Result<Subscription, AppError> {
        let subscription = self
            .subscription_repository
            .upsert(user_id, input.plan, input.status.unwrap_or_default())
            .await?;

        log::info!(
            "User {} switched to {} plan ({})",
            user_id,
            subscription.plan,
            subscription.status
        );

        self.cache
            .insert(user_id.to_string(), subscription.clone())
            .await;

        Ok(subscription)
    }

    pub async fn ensure_can_add_site(&self, user_id: &str) -> Result<(), AppError> {
        let subscription = self.get_subscription(user_id).await?;
        let PlanLimits { max_sites, .. } = subscription.effective_limits();

        if let Some(limit) = max_sites {
            let count = self.site_repository.count_for_user(user_id).await?;
            if count >= limit {
                return Err(AppError::PlanLimitReached {
                    plan: subscription.plan.to_string(),
                    resource: "sites",
                    limit,
                });
            }
        }

        Ok(())
    }

    pub async fn ensure_can_add_worker(&self, user_id: &str) -> Result<(), AppError> {
        let subscription = self.get_subscription(user_id).await?;
        let PlanLimits { max_workers, .. } = subscription.effective_limits();

        if let Some(limit) = max_workers {
            let count = self.worker_repository.count_for_user(user_id).await?;
            if count >= limit {
                return Err(AppError::PlanLimitReached {
                    plan: subscription.plan.to_string(),
                    resource: "workers",
                    limit,
                });
            }
        }

        Ok(())
    }
}
