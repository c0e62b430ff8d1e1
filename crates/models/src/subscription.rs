use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Textual date format used on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const SERVICE_NAME_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: i32,
    pub service_name: String,
    pub price: i32,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_user_id(user_id: i64) -> Result<i32, errors::ModelError> {
    if user_id <= 0 {
        return Err(errors::ModelError::Validation("user_id must be a positive integer".into()));
    }
    i32::try_from(user_id).map_err(|_| errors::ModelError::Validation("user_id is out of range".into()))
}

pub fn validate_service_name(name: &str) -> Result<String, errors::ModelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(errors::ModelError::Validation("service_name required".into()));
    }
    if name.chars().count() > SERVICE_NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!(
            "service_name must be at most {SERVICE_NAME_MAX_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

pub fn validate_price(price: i64) -> Result<i32, errors::ModelError> {
    if price <= 0 {
        return Err(errors::ModelError::Validation("price must be a positive integer".into()));
    }
    i32::try_from(price).map_err(|_| errors::ModelError::Validation("price is out of range".into()))
}

/// `end` may be absent (open-ended) but never before `start`.
pub fn validate_period(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), errors::ModelError> {
    match end {
        Some(end) if end < start => Err(errors::ModelError::Validation(
            "end_date must not be before start_date".into(),
        )),
        _ => Ok(()),
    }
}

/// Parse a strict `YYYY-MM-DD` date. `field` names the input in the error.
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, errors::ModelError> {
    let invalid = || errors::ModelError::Validation(format!("invalid {field} date format, use YYYY-MM-DD"));
    let value = value.trim();
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
