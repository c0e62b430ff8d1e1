use std::future::Future;
use std::time::Duration;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnAcquireErr, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect, Set,
    SqlErr,
};
use tracing::debug;
use uuid::Uuid;

use models::subscription;

use crate::errors::ServiceError;
use crate::subscription::domain::{NewSubscription, PeriodFilter, Subscription};
use crate::subscription::repository::SubscriptionRepository;

/// SeaORM-backed repository. Owns the shared connection handle.
pub struct SeaOrmSubscriptionRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl SeaOrmSubscriptionRepository {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, timeout: Self::DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one storage call under the per-call deadline.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(|e| translate(op, e)),
            Err(_) => Err(ServiceError::Timeout(format!("{op} exceeded {:?}", self.timeout))),
        }
    }
}

/// Map store errors onto service error kinds.
fn translate(op: &str, e: DbErr) -> ServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        return ServiceError::AlreadyExists(format!("subscription for this user and service already exists ({msg})"));
    }
    match e {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
            ServiceError::Timeout(format!("{op}: timed out acquiring a connection"))
        }
        other => ServiceError::Unavailable(format!("{op}: {other}")),
    }
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn list_all(&self) -> Result<Vec<Subscription>, ServiceError> {
        let rows = self.bounded("list_all", subscription::Entity::find().all(&self.db)).await?;
        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, ServiceError> {
        self.bounded("get_by_id", subscription::Entity::find_by_id(id).one(&self.db))
            .await?
            .map(Subscription::from)
            .ok_or_else(|| ServiceError::not_found("subscription"))
    }

    async fn create(&self, input: NewSubscription) -> Result<Uuid, ServiceError> {
        let id = Uuid::new_v4();
        let am = subscription::ActiveModel {
            id: Set(id),
            user_id: Set(input.user_id),
            service_name: Set(input.service_name),
            price: Set(input.price),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
        };
        // the unique (user_id, service_name) index decides duplicates, no pre-check query
        self.bounded("create", subscription::Entity::insert(am).exec_without_returning(&self.db))
            .await?;
        debug!(%id, "subscription row inserted");
        Ok(id)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        let res = self
            .bounded("delete_by_id", subscription::Entity::delete_by_id(id).exec(&self.db))
            .await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found("subscription"));
        }
        Ok(())
    }

    async fn sum_price_by_period(&self, filter: &PeriodFilter) -> Result<i64, ServiceError> {
        let mut cond = Condition::all()
            .add(subscription::Column::StartDate.lte(filter.end))
            .add(
                Condition::any()
                    .add(subscription::Column::EndDate.is_null())
                    .add(subscription::Column::EndDate.gte(filter.start)),
            );
        if let Some(user_id) = filter.user_id {
            cond = cond.add(subscription::Column::UserId.eq(user_id));
        }
        if let Some(name) = &filter.service_name {
            cond = cond.add(subscription::Column::ServiceName.eq(name.as_str()));
        }

        let query = subscription::Entity::find()
            .select_only()
            .column_as(Expr::col(subscription::Column::Price).sum(), "total")
            .filter(cond)
            .into_tuple::<Option<i64>>()
            .one(&self.db);
        let total = self.bounded("sum_price_by_period", query).await?;
        Ok(total.flatten().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_support::get_db;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, models::subscription::DATE_FORMAT).unwrap()
    }

    // Unique per test so runs against a shared PostgreSQL do not collide
    fn fresh_user() -> i64 {
        1_000 + (Uuid::new_v4().as_u128() % 1_000_000_000) as i64
    }

    fn new_sub(user_id: i64, name: &str, price: i64, start: &str, end: Option<&str>) -> NewSubscription {
        NewSubscription::new(user_id, name, price, d(start), end.map(d)).unwrap()
    }

    #[tokio::test]
    async fn create_get_list_delete() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db);
        let user = fresh_user();

        let input = new_sub(user, "Yandex Plus", 400, "2025-07-01", Some("2025-12-01"));
        let id = repo.create(input.clone()).await?;
        let found = repo.get_by_id(id).await?;
        assert_eq!(found.id, id);
        assert_eq!(found.user_id, input.user_id);
        assert_eq!(found.service_name, input.service_name);
        assert_eq!(found.price, input.price);
        assert_eq!(found.start_date, input.start_date);
        assert_eq!(found.end_date, input.end_date);

        let all = repo.list_all().await?;
        assert!(all.iter().any(|s| s.id == id));

        repo.delete_by_id(id).await?;
        let after = repo.get_by_id(id).await.unwrap_err();
        assert_eq!(after.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_distinct() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db);
        let user = fresh_user();

        let a = repo.create(new_sub(user, "A", 1, "2024-01-01", None)).await?;
        let b = repo.create(new_sub(user, "B", 1, "2024-01-01", None)).await?;
        assert_ne!(a, b);
        assert!(!a.is_nil());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_pair_is_already_exists_and_changes_nothing() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db);
        let user = fresh_user();

        repo.create(new_sub(user, "Netflix", 400, "2024-01-01", None)).await?;
        let before = repo.list_all().await?.len();
        let err = repo.create(new_sub(user, "Netflix", 999, "2024-05-01", None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(repo.list_all().await?.len(), before);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_duplicates_admit_one() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = std::sync::Arc::new(SeaOrmSubscriptionRepository::new(db));
        let user = fresh_user();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let repo = repo.clone();
            let input = new_sub(user, "Kinopoisk", 300, "2024-01-01", None);
            handles.push(tokio::spawn(async move { repo.create(input).await }));
        }
        let mut ok = 0;
        for h in handles {
            match h.await? {
                Ok(_) => ok += 1,
                Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyExists),
            }
        }
        assert_eq!(ok, 1);
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db);
        let err = repo.delete_by_id(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn sum_over_period_matches_active_window() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db);
        let user = fresh_user();

        repo.create(new_sub(user, "A", 100, "2024-01-01", Some("2024-06-01"))).await?;
        repo.create(new_sub(user, "B", 50, "2024-03-01", None)).await?;

        let feb = PeriodFilter::new(Some(user as i32), None, d("2024-02-01"), d("2024-02-28"))?;
        assert_eq!(repo.sum_price_by_period(&feb).await?, 100);

        let year = PeriodFilter::new(Some(user as i32), None, d("2024-01-01"), d("2024-12-31"))?;
        assert_eq!(repo.sum_price_by_period(&year).await?, 150);

        let only_b = PeriodFilter::new(Some(user as i32), Some("B".into()), d("2024-01-01"), d("2024-12-31"))?;
        assert_eq!(repo.sum_price_by_period(&only_b).await?, 50);

        // A ended on 2024-06-01, B is open-ended
        let late = PeriodFilter::new(Some(user as i32), None, d("2030-01-01"), d("2030-01-31"))?;
        assert_eq!(repo.sum_price_by_period(&late).await?, 50);
        Ok(())
    }

    #[tokio::test]
    async fn sum_without_matches_is_zero() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db);
        let nobody = PeriodFilter::new(Some(fresh_user() as i32), None, d("1999-01-01"), d("1999-12-31"))?;
        assert_eq!(repo.sum_price_by_period(&nobody).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn closed_connection_is_unavailable() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else {
            return Ok(());
        };
        let repo = SeaOrmSubscriptionRepository::new(db.clone());
        db.close().await?;
        let err = repo.list_all().await.unwrap_err();
        assert!(!err.is_client_error());
        Ok(())
    }

    #[tokio::test]
    async fn elapsed_deadline_is_timeout() {
        let repo = SeaOrmSubscriptionRepository::new(DatabaseConnection::Disconnected)
            .with_timeout(Duration::from_millis(10));
        let slow = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, DbErr>(())
        };
        let err = repo.bounded("slow", slow).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageTimeout);
    }

    #[test]
    fn connection_errors_translate() {
        let e = translate("list_all", DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
        assert_eq!(e.kind(), ErrorKind::StorageTimeout);
        let e = translate("list_all", DbErr::Custom("boom".into()));
        assert_eq!(e.kind(), ErrorKind::StorageUnavailable);
        assert!(e.to_string().contains("list_all"));
    }
}
