use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use common::types::Message;
use models::{subscription, MonthYear};
use service::errors::ServiceError;
use service::subscription::{domain::NewSubscription, Lookup, SubscriptionChanges};

use crate::{errors::JsonApiError, routes::ServerState};

/// Request body for create and update. Missing fields fall back to zero values,
/// so an absent `user_id` surfaces as the nil UUID.
#[derive(Debug, Deserialize)]
pub struct SubscriptionInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub price: i64,
    pub start_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub end_date: Option<DateTime<FixedOffset>>,
}

impl SubscriptionInput {
    fn user_id(&self) -> Uuid {
        self.user_id.unwrap_or_default()
    }

    /// A missing or nil id is replaced with a fresh v4 UUID.
    fn into_new(self) -> NewSubscription {
        let id = self.id.filter(|id| !id.is_nil()).unwrap_or_else(Uuid::new_v4);
        NewSubscription {
            id,
            user_id: self.user_id(),
            service_name: self.service_name,
            price: self.price,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    fn into_changes(self) -> SubscriptionChanges {
        SubscriptionChanges {
            user_id: self.user_id(),
            service_name: self.service_name,
            price: self.price,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Decodes the body as JSON whatever the `Content-Type` header says.
fn parse_input(body: &[u8]) -> Result<SubscriptionInput, serde_json::Error> {
    serde_json::from_slice(body)
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalQuery {
    /// User ID
    pub user_id: Option<String>,
    /// Service name
    pub service_name: Option<String>,
    /// Start of range, MM-YYYY
    pub from: Option<String>,
    /// End of range, MM-YYYY (inclusive month)
    pub to: Option<String>,
}

impl TotalQuery {
    /// The first occurrence of each key wins; unknown keys are ignored.
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "user_id" => &mut q.user_id,
                "service_name" => &mut q.service_name,
                "from" => &mut q.from,
                "to" => &mut q.to,
                _ => continue,
            };
            if slot.is_none() { *slot = Some(value); }
        }
        q
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TotalResponse {
    pub total: i64,
}

/// Empty or unparsable month values are dropped rather than rejected.
fn parse_month(raw: Option<&str>) -> Option<MonthYear> {
    raw.filter(|s| !s.is_empty()).and_then(|s| MonthYear::parse(s).ok())
}

#[utoipa::path(
    post, path = "/subscriptions", tag = "subscriptions",
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::SubscriptionDoc),
        (status = 400, description = "Invalid input", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Create Failed", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<subscription::Model>), JsonApiError> {
    let input = parse_input(&body).map_err(|e| {
        warn!(err = %e, "invalid create request");
        JsonApiError::bad_request(format!("invalid input: {}", e))
    })?;

    match state.subscriptions.create(input.into_new()).await {
        Ok(m) => { info!(id = %m.id, user_id = %m.user_id, "created subscription"); Ok((StatusCode::CREATED, Json(m))) },
        Err(ServiceError::Validation(msg)) => Err(JsonApiError::bad_request(msg)),
        Err(e) => {
            error!(err = %e, "create subscription failed");
            Err(JsonApiError::internal("Failed to create subscription"))
        }
    }
}

#[utoipa::path(
    get, path = "/subscriptions", tag = "subscriptions",
    responses(
        (status = 200, description = "List OK", body = [crate::openapi::SubscriptionDoc]),
        (status = 500, description = "List Failed", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<subscription::Model>>, JsonApiError> {
    match state.subscriptions.list().await {
        Ok(list) => { info!(count = list.len(), "list subscriptions"); Ok(Json(list)) }
        Err(e) => {
            error!(err = %e, "list subscriptions failed");
            Err(JsonApiError::internal("Failed to list subscriptions"))
        }
    }
}

#[utoipa::path(
    get, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SubscriptionDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Get Failed", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<subscription::Model>, JsonApiError> {
    match state.subscriptions.get(&id).await {
        Ok(Lookup::Found(m)) => Ok(Json(m)),
        Ok(Lookup::NotFound) => Err(JsonApiError::not_found("Subscription not found")),
        Err(e) => {
            error!(err = %e, %id, "get subscription failed");
            Err(JsonApiError::internal("Failed to get subscription"))
        }
    }
}

#[utoipa::path(
    put, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MessageResponse),
        (status = 400, description = "Invalid input", body = crate::openapi::ErrorResponse),
        (status = 500, description = "Update Failed, including unknown id", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Message>, JsonApiError> {
    let input = parse_input(&body).map_err(|e| {
        warn!(err = %e, %id, "invalid update request");
        JsonApiError::bad_request(e.to_string())
    })?;

    // Not-found is not distinguished from store failures here.
    match state.subscriptions.update(&id, input.into_changes()).await {
        Ok(m) => { info!(id = %m.id, "updated subscription"); Ok(Json(Message::new("Subscription updated"))) },
        Err(e) => {
            error!(err = %e, %id, "update subscription failed");
            Err(JsonApiError::internal(e.to_string()))
        }
    }
}

#[utoipa::path(
    delete, path = "/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageResponse),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Message>, JsonApiError> {
    match state.subscriptions.delete(&id).await {
        Ok(removed) => { info!(%id, removed, "deleted subscription"); Ok(Json(Message::new("Subscription deleted"))) },
        Err(e) => {
            error!(err = %e, %id, "delete subscription failed");
            Err(JsonApiError::internal("Failed to delete subscription"))
        }
    }
}

#[utoipa::path(
    get, path = "/subscriptions/total", tag = "subscriptions",
    params(TotalQuery),
    responses(
        (status = 200, description = "Sum of prices", body = TotalResponse),
        (status = 500, description = "Total Failed", body = crate::openapi::ErrorResponse)
    )
)]
pub async fn total(
    State(state): State<ServerState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<TotalResponse>, JsonApiError> {
    // An undecodable query string degrades to no filters.
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_else(|e| {
        warn!(err = %e.body_text(), "ignoring undecodable total query");
        Vec::new()
    });
    let q = TotalQuery::from_pairs(pairs);
    let from = parse_month(q.from.as_deref());
    let to = parse_month(q.to.as_deref());

    match state.subscriptions.total(q.user_id.as_deref(), q.service_name.as_deref(), from, to).await {
        Ok(total) => Ok(Json(TotalResponse { total })),
        Err(e) => {
            error!(err = %e, "calculate total failed");
            Err(JsonApiError::internal("Failed to calculate total"))
        }
    }
}
