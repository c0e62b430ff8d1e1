use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::subscription::domain::{NewSubscription, PeriodFilter, Subscription};
use crate::subscription::repository::SubscriptionRepository;

/// Application service over the subscription repository.
/// Pure delegation; failures on the write and aggregate paths are logged here.
#[derive(Clone)]
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
}

fn log_failure(op: &'static str, e: &ServiceError) {
    if e.is_client_error() {
        warn!(op, kind = ?e.kind(), code = e.code(), err = %e, "subscription operation rejected");
    } else {
        error!(op, kind = ?e.kind(), code = e.code(), err = %e, "subscription operation failed");
    }
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Subscription>, ServiceError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Subscription, ServiceError> { self.repo.get_by_id(id).await }

    #[instrument(skip(self, input), fields(user_id = input.user_id, service_name = %input.service_name))]
    pub async fn add(&self, input: NewSubscription) -> Result<Uuid, ServiceError> {
        match self.repo.create(input).await {
            Ok(id) => {
                info!(%id, "subscription saved");
                Ok(id)
            }
            Err(e) => {
                log_failure("add", &e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        info!(%id, "subscription deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(start = %filter.start, end = %filter.end))]
    pub async fn total_price(&self, filter: &PeriodFilter) -> Result<i64, ServiceError> {
        self.repo.sum_price_by_period(filter).await.map_err(|e| {
            log_failure("total_price", &e);
            e
        })
    }
}
