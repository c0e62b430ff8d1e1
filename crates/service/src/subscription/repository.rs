use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewSubscription, PeriodFilter, Subscription};
use crate::errors::ServiceError;

/// Storage contract for subscription records.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Every row in store order; an empty store is an empty vec.
    async fn list_all(&self) -> Result<Vec<Subscription>, ServiceError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, ServiceError>;
    /// Mints the id. A taken (user_id, service_name) pair is `AlreadyExists`.
    async fn create(&self, input: NewSubscription) -> Result<Uuid, ServiceError>;
    /// Hard delete; zero affected rows is `NotFound`.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError>;
    /// Sum of prices of matching subscriptions, 0 when none match.
    async fn sum_price_by_period(&self, filter: &PeriodFilter) -> Result<i64, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use crate::errors::ErrorKind;

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        rows: Mutex<Vec<Subscription>>,
        fail_with: Option<ErrorKind>,
        calls: AtomicUsize,
    }

    impl MockSubscriptionRepository {
        pub fn new() -> Self { Self::default() }

        /// Every call fails with `kind`, as a broken store would.
        pub fn failing(kind: ErrorKind) -> Self {
            Self { fail_with: Some(kind), ..Self::default() }
        }

        pub fn with_rows(rows: Vec<Subscription>) -> Self {
            Self { rows: Mutex::new(rows), ..Self::default() }
        }

        /// Number of repository calls made so far.
        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

        pub fn len(&self) -> usize { self.rows().len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn rows(&self) -> MutexGuard<'_, Vec<Subscription>> {
            self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        fn enter(&self, op: &str) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                None => Ok(()),
                Some(ErrorKind::StorageTimeout) => Err(ServiceError::Timeout(format!("{op}: deadline elapsed"))),
                Some(ErrorKind::NotFound) => Err(ServiceError::not_found("subscription")),
                Some(ErrorKind::AlreadyExists) => Err(ServiceError::AlreadyExists(format!("{op}: duplicate"))),
                Some(ErrorKind::Validation) => Err(ServiceError::Validation(format!("{op}: rejected"))),
                Some(ErrorKind::StorageUnavailable) => Err(ServiceError::Unavailable(format!("{op}: connection refused"))),
            }
        }
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn list_all(&self) -> Result<Vec<Subscription>, ServiceError> {
            self.enter("list_all")?;
            Ok(self.rows().clone())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Subscription, ServiceError> {
            self.enter("get_by_id")?;
            self.rows()
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("subscription"))
        }

        async fn create(&self, input: NewSubscription) -> Result<Uuid, ServiceError> {
            self.enter("create")?;
            let mut rows = self.rows();
            if rows.iter().any(|s| s.user_id == input.user_id && s.service_name == input.service_name) {
                return Err(ServiceError::AlreadyExists(format!(
                    "subscription for user {} and service {} already exists",
                    input.user_id, input.service_name
                )));
            }
            let id = Uuid::new_v4();
            rows.push(Subscription {
                id,
                user_id: input.user_id,
                service_name: input.service_name,
                price: input.price,
                start_date: input.start_date,
                end_date: input.end_date,
            });
            Ok(id)
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
            self.enter("delete_by_id")?;
            let mut rows = self.rows();
            let before = rows.len();
            rows.retain(|s| s.id != id);
            if rows.len() == before {
                return Err(ServiceError::not_found("subscription"));
            }
            Ok(())
        }

        async fn sum_price_by_period(&self, filter: &PeriodFilter) -> Result<i64, ServiceError> {
            self.enter("sum_price_by_period")?;
            Ok(self.rows().iter().filter(|s| filter.matches(s)).map(|s| i64::from(s.price)).sum())
        }
    }
}
