use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;
use chrono::Utc;
use models::subscription::{self, Entity as SubscriptionEntity, NewSubscription};
use crate::errors::ServiceError;
use crate::subscription::PriceFilter;

/// Insert a subscription row.
pub async fn create_subscription<C: ConnectionTrait>(db: &C, new: NewSubscription) -> Result<subscription::Model, ServiceError> {
    let created = subscription::create(db, new).await?;
    Ok(created)
}

/// List all subscriptions in the store's natural order.
pub async fn list_subscriptions<C: ConnectionTrait>(db: &C) -> Result<Vec<subscription::Model>, ServiceError> {
    let rows = SubscriptionEntity::find().all(db).await?;
    Ok(rows)
}

/// Get a subscription by id.
pub async fn get_subscription<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<subscription::Model>, ServiceError> {
    let found = SubscriptionEntity::find_by_id(id).one(db).await?;
    Ok(found)
}

/// Overwrite every column of an existing row and refresh `updated_at`.
pub async fn save_subscription<C: ConnectionTrait>(db: &C, sub: subscription::Model) -> Result<subscription::Model, ServiceError> {
    let mut am: subscription::ActiveModel = sub.into();
    am = am.reset_all();
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

/// Delete a subscription; returns true if a row was removed.
pub async fn delete_subscription<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ServiceError> {
    let res = SubscriptionEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// `COALESCE(SUM(price), 0)` over rows matching every provided filter.
pub async fn sum_price<C: ConnectionTrait>(db: &C, filter: &PriceFilter) -> Result<i64, ServiceError> {
    let mut query = SubscriptionEntity::find()
        .select_only()
        .column_as(Expr::cust(r#"COALESCE(SUM("price"), 0)::BIGINT"#), "total");
    if let Some(uid) = filter.user_id {
        query = query.filter(subscription::Column::UserId.eq(uid));
    }
    if let Some(name) = &filter.service_name {
        query = query.filter(subscription::Column::ServiceName.eq(name.as_str()));
    }
    if let Some(from) = filter.from {
        query = query.filter(subscription::Column::StartDate.gte(from.first_instant()));
    }
    if let Some(to) = filter.to {
        query = query.filter(subscription::Column::StartDate.lt(to.end_exclusive()));
    }
    let total: Option<i64> = query.into_tuple().one(db).await?;
    Ok(total.unwrap_or(0))
}
