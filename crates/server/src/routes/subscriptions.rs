use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use models::subscription::{format_date, parse_date, validate_user_id};
use service::errors::ServiceError;
use service::subscription::{NewSubscription, PeriodFilter, Subscription};

use super::ServerState;
use crate::errors::JsonApiError;

/// Create body. Fields are optional here so that a missing one is a 400 with
/// a field name rather than a generic decode failure. A client-supplied `id`
/// is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub user_id: Option<i64>,
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl CreateSubscriptionRequest {
    /// `today` fills in an absent start date.
    pub fn into_new_subscription(self, today: NaiveDate) -> Result<NewSubscription, ServiceError> {
        let user_id = self.user_id.ok_or_else(|| missing("user_id"))?;
        let service_name = self.service_name.ok_or_else(|| missing("service_name"))?;
        let price = self.price.ok_or_else(|| missing("price"))?;
        let start_date = match non_blank(self.start_date) {
            Some(s) => parse_date(&s, "start_date")?,
            None => today,
        };
        let end_date = non_blank(self.end_date)
            .map(|s| parse_date(&s, "end_date"))
            .transpose()?;
        NewSubscription::new(user_id, &service_name, price, start_date, end_date)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TotalPriceRequest {
    /// Absent or 0 means all users.
    pub user_id: Option<i64>,
    /// Absent or empty means all services.
    pub service_name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TotalPriceRequest {
    pub fn into_filter(self) -> Result<PeriodFilter, ServiceError> {
        let start = non_blank(self.start).ok_or_else(|| missing("start"))?;
        let end = non_blank(self.end).ok_or_else(|| missing("end"))?;
        let start = parse_date(&start, "start")?;
        let end = parse_date(&end, "end")?;
        let user_id = match self.user_id {
            None | Some(0) => None,
            Some(u) => Some(validate_user_id(u)?),
        };
        PeriodFilter::new(user_id, non_blank(self.service_name), start, end)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodResponse {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalPriceResponse {
    pub total_price: i64,
    pub period: PeriodResponse,
    pub user_id: i32,
    pub service_name: String,
}

impl TotalPriceResponse {
    pub fn new(total_price: i64, filter: &PeriodFilter) -> Self {
        Self {
            total_price,
            period: PeriodResponse { start: format_date(filter.start), end: format_date(filter.end) },
            user_id: filter.user_id.unwrap_or(0),
            service_name: filter.service_name.clone().unwrap_or_default(),
        }
    }
}

fn missing(field: &str) -> ServiceError {
    ServiceError::Validation(format!("{field} is required"))
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, JsonApiError> {
    id.map(|Path(id)| id).map_err(|e| {
        warn!(err = %e.body_text(), "rejected subscription id");
        JsonApiError::bad_request(format!("invalid subscription id: {}", e.body_text()))
    })
}

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    body.map(|Json(v)| v).map_err(|e| {
        warn!(status = %e.status(), err = %e.body_text(), "rejected request body");
        JsonApiError::bad_request(format!("invalid request body: {}", e.body_text()))
    })
}

#[utoipa::path(
    get,
    path = "/subs",
    tag = "subscriptions",
    responses(
        (status = 200, description = "All subscriptions", body = [crate::openapi::SubscriptionDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Subscription>>, JsonApiError> {
    let rows = state
        .subscriptions
        .list()
        .await
        .map_err(|e| JsonApiError::from_service("list", e))?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/subs/{id}",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription found", body = crate::openapi::SubscriptionDoc),
        (status = 204, description = "No subscription with this id"),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Subscription>, JsonApiError> {
    let id = parse_id(id)?;
    let sub = state
        .subscriptions
        .get(id)
        .await
        .map_err(|e| JsonApiError::from_service("get", e))?;
    Ok(Json(sub))
}

#[utoipa::path(
    post,
    path = "/subs",
    tag = "subscriptions",
    request_body = crate::openapi::CreateSubscriptionDoc,
    responses(
        (status = 201, description = "Subscription saved", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid body or field", body = crate::openapi::ErrorDoc),
        (status = 409, description = "User already has this service", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), JsonApiError> {
    let input = parse_body(body)?
        .into_new_subscription(Utc::now().date_naive())
        .map_err(|e| JsonApiError::from_service("add", e))?;
    let id = state
        .subscriptions
        .add(input)
        .await
        .map_err(JsonApiError::from)?;
    let message = format!("subscription {id} was saved");
    Ok((StatusCode::CREATED, Json(MessageResponse { id, message })))
}

#[utoipa::path(
    delete,
    path = "/subs/{id}",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Subscription deleted", body = crate::openapi::MessageDoc),
        (status = 204, description = "No subscription with this id"),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let id = parse_id(id)?;
    state
        .subscriptions
        .delete(id)
        .await
        .map_err(|e| JsonApiError::from_service("delete", e))?;
    let message = format!("subscription {id} was deleted");
    Ok(Json(MessageResponse { id, message }))
}

#[utoipa::path(
    post,
    path = "/subs/total",
    tag = "subscriptions",
    request_body = crate::openapi::TotalPriceRequestDoc,
    responses(
        (status = 200, description = "Sum of prices over the period", body = crate::openapi::TotalPriceResponseDoc),
        (status = 400, description = "Invalid body, date or period", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn total(
    State(state): State<ServerState>,
    body: Result<Json<TotalPriceRequest>, JsonRejection>,
) -> Result<Json<TotalPriceResponse>, JsonApiError> {
    let filter = parse_body(body)?
        .into_filter()
        .map_err(|e| JsonApiError::from_service("total_price", e))?;
    let total = state
        .subscriptions
        .total_price(&filter)
        .await
        .map_err(JsonApiError::from)?;
    Ok(Json(TotalPriceResponse::new(total, &filter)))
}
