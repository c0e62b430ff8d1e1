use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::subscription as model;

use crate::errors::ServiceError;

/// Stored subscription (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: i32,
    pub service_name: String,
    pub price: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<model::Model> for Subscription {
    fn from(m: model::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            service_name: m.service_name,
            price: m.price,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}

/// Validated create input. The id is minted by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub user_id: i32,
    pub service_name: String,
    pub price: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewSubscription {
    pub fn new(
        user_id: i64,
        service_name: &str,
        price: i64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ServiceError> {
        let user_id = model::validate_user_id(user_id)?;
        let service_name = model::validate_service_name(service_name)?;
        let price = model::validate_price(price)?;
        model::validate_period(start_date, end_date)?;
        Ok(Self { user_id, service_name, price, start_date, end_date })
    }
}

/// Period and optional user/service filters for price aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodFilter {
    pub user_id: Option<i32>,
    pub service_name: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodFilter {
    pub fn new(
        user_id: Option<i32>,
        service_name: Option<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ServiceError> {
        if end < start {
            return Err(ServiceError::Validation("end date must not be before start date".into()));
        }
        Ok(Self { user_id, service_name, start, end })
    }

    /// True when `sub` passes the user/service filters and was active at some
    /// point in `[start, end]`.
    pub fn matches(&self, sub: &Subscription) -> bool {
        self.user_id.map_or(true, |u| sub.user_id == u)
            && self.service_name.as_deref().map_or(true, |s| sub.service_name == s)
            && sub.start_date <= self.end
            && sub.end_date.map_or(true, |e| e >= self.start)
    }
}
