use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::subscription;

use crate::db::subscription_store;
use crate::errors::ServiceError;
use crate::subscription::domain::{Lookup, NewSubscription, PriceFilter};
use crate::subscription::repository::SubscriptionRepository;

/// SeaORM-backed repository implementation. Owns the connection pool.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, new: NewSubscription) -> Result<subscription::Model, ServiceError> {
        subscription_store::create_subscription(&self.db, new).await
    }

    async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError> {
        subscription_store::list_subscriptions(&self.db).await
    }

    async fn get(&self, id: Uuid) -> Result<Lookup<subscription::Model>, ServiceError> {
        subscription_store::get_subscription(&self.db, id).await.map(Lookup::from)
    }

    async fn update(&self, sub: subscription::Model) -> Result<subscription::Model, ServiceError> {
        subscription_store::save_subscription(&self.db, sub).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        subscription_store::delete_subscription(&self.db, id).await
    }

    async fn sum_price(&self, filter: &PriceFilter) -> Result<i64, ServiceError> {
        subscription_store::sum_price(&self.db, filter).await
    }
}
