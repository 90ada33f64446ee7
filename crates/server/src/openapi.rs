use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String }

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

/// Stored subscription as returned by the API
#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i64,
    #[schema(example = "2025-07-01T00:00:00Z")]
    pub start_date: String,
    #[schema(example = "2025-12-01T00:00:00Z")]
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for create and update; `id` is optional and ignored on update
#[derive(ToSchema)]
pub struct SubscriptionInputDoc {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400)]
    pub price: i64,
    #[schema(example = "2025-07-01T00:00:00Z")]
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::delete,
        crate::routes::subscriptions::total,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            MessageResponse,
            SubscriptionDoc,
            SubscriptionInputDoc,
            crate::routes::subscriptions::TotalResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
