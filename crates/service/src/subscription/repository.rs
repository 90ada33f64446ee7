use async_trait::async_trait;
use uuid::Uuid;

use models::subscription;

use super::domain::{Lookup, NewSubscription, PriceFilter};
use crate::errors::ServiceError;

/// Persistence boundary for subscriptions. Every method is a single store round-trip.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, new: NewSubscription) -> Result<subscription::Model, ServiceError>;
    async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Lookup<subscription::Model>, ServiceError>;
    /// Full overwrite of the row with `sub.id`; `updated_at` is refreshed by the store.
    async fn update(&self, sub: subscription::Model) -> Result<subscription::Model, ServiceError>;
    /// Idempotent; returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn sum_price(&self, filter: &PriceFilter) -> Result<i64, ServiceError>;
}

/// In-memory repository for tests and for running the HTTP layer without Postgres
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};
    use chrono::Utc;

    #[derive(Default)]
    pub struct InMemorySubscriptionRepository {
        rows: Mutex<Vec<subscription::Model>>, // insertion order
    }

    impl InMemorySubscriptionRepository {
        pub fn new() -> Self { Self::default() }

        fn rows(&self) -> Result<MutexGuard<'_, Vec<subscription::Model>>, ServiceError> {
            self.rows.lock().map_err(|_| ServiceError::Db("in-memory store lock poisoned".into()))
        }
    }

    #[async_trait]
    impl SubscriptionRepository for InMemorySubscriptionRepository {
        async fn create(&self, new: NewSubscription) -> Result<subscription::Model, ServiceError> {
            let mut rows = self.rows()?;
            if rows.iter().any(|r| r.id == new.id) {
                return Err(ServiceError::Db(format!("duplicate key: subscription {} already exists", new.id)));
            }
            let row = new.into_model(Utc::now().into());
            rows.push(row.clone());
            Ok(row)
        }

        async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError> {
            Ok(self.rows()?.clone())
        }

        async fn get(&self, id: Uuid) -> Result<Lookup<subscription::Model>, ServiceError> {
            let rows = self.rows()?;
            Ok(rows.iter().find(|r| r.id == id).cloned().into())
        }

        async fn update(&self, mut sub: subscription::Model) -> Result<subscription::Model, ServiceError> {
            let mut rows = self.rows()?;
            let Some(slot) = rows.iter_mut().find(|r| r.id == sub.id) else {
                return Err(ServiceError::Db(format!("no row updated for subscription {}", sub.id)));
            };
            sub.updated_at = Utc::now().into();
            *slot = sub.clone();
            Ok(sub)
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok(rows.len() < before)
        }

        async fn sum_price(&self, filter: &PriceFilter) -> Result<i64, ServiceError> {
            let rows = self.rows()?;
            let total = rows
                .iter()
                .filter(|r| filter.matches(r))
                .try_fold(0i64, |acc, r| acc.checked_add(r.price));
            total.ok_or_else(|| ServiceError::Db("sum of price out of range for bigint".into()))
        }
    }
}
