use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub message: Option<String> }

#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: Uuid,
    pub user_id: i32,
    pub service_name: String,
    /// Whole currency units, > 0
    pub price: i32,
    /// YYYY-MM-DD
    pub start_date: String,
    /// YYYY-MM-DD; absent means open-ended
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateSubscriptionDoc {
    pub user_id: i64,
    pub service_name: String,
    pub price: i64,
    /// YYYY-MM-DD, defaults to today (UTC)
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageDoc { pub id: Uuid, pub message: String }

#[derive(ToSchema)]
pub struct TotalPriceRequestDoc {
    /// 0 or absent: all users
    pub user_id: Option<i64>,
    /// Empty or absent: all services
    pub service_name: Option<String>,
    pub start: String,
    pub end: String,
}

#[derive(ToSchema)]
pub struct PeriodDoc { pub start: String, pub end: String }

#[derive(ToSchema)]
pub struct TotalPriceResponseDoc {
    pub total_price: i64,
    pub period: PeriodDoc,
    pub user_id: i32,
    pub service_name: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Subscription service API", description = "CRUD for user subscriptions and price totals"),
    paths(
        crate::routes::health,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::total,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            SubscriptionDoc,
            CreateSubscriptionDoc,
            MessageDoc,
            TotalPriceRequestDoc,
            PeriodDoc,
            TotalPriceResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
