use std::sync::Arc;

use models::{subscription, MonthYear};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{Lookup, NewSubscription, PriceFilter, SubscriptionChanges};
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Parse an id taken from a request path or query.
///
/// A malformed id is reported as `MalformedId`; callers treat it like a failed query.
pub fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|e| ServiceError::MalformedId(format!("{raw:?}: {e}")))
}

/// Subscription business service independent of web framework.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use service::subscription::{SubscriptionService, repository::mock::InMemorySubscriptionRepository};
/// use service::subscription::domain::NewSubscription;
///
/// let svc = SubscriptionService::new(Arc::new(InMemorySubscriptionRepository::new()));
/// let new = NewSubscription {
///     id: uuid::Uuid::new_v4(),
///     user_id: uuid::Uuid::new_v4(),
///     service_name: "Yandex Plus".into(),
///     price: 400,
///     start_date: chrono::DateTime::parse_from_rfc3339("2025-07-01T00:00:00Z").unwrap(),
///     end_date: None,
/// };
/// let created = tokio_test::block_on(svc.create(new)).unwrap();
/// let total = tokio_test::block_on(svc.total(None, Some("Yandex Plus"), None, None)).unwrap();
/// assert_eq!(total, created.price);
/// ```
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, new), fields(id = %new.id, user_id = %new.user_id))]
    pub async fn create(&self, new: NewSubscription) -> Result<subscription::Model, ServiceError> {
        subscription::validate_user_id(new.user_id).map_err(|e| match e {
            models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
            other => ServiceError::Model(other),
        })?;
        let created = self.repo.create(new).await?;
        info!(id = %created.id, service_name = %created.service_name, "subscription_created");
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<subscription::Model>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, raw_id: &str) -> Result<Lookup<subscription::Model>, ServiceError> {
        let id = parse_id(raw_id)?;
        self.repo.get(id).await
    }

    /// Overwrite the mutable fields of an existing subscription.
    /// `id` and `created_at` always come from the stored row.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, raw_id: &str, changes: SubscriptionChanges) -> Result<subscription::Model, ServiceError> {
        let id = parse_id(raw_id)?;
        let mut sub = match self.repo.get(id).await? {
            Lookup::Found(sub) => sub,
            Lookup::NotFound => return Err(ServiceError::not_found("subscription")),
        };

        sub.service_name = changes.service_name;
        sub.price = changes.price;
        sub.user_id = changes.user_id;
        sub.start_date = changes.start_date;
        sub.end_date = changes.end_date;

        let saved = self.repo.update(sub).await?;
        info!(id = %saved.id, "subscription_updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<bool, ServiceError> {
        let id = parse_id(raw_id)?;
        let removed = self.repo.delete(id).await?;
        debug!(%id, removed, "subscription_delete");
        Ok(removed)
    }

    /// Sum of `price` over matching subscriptions. Empty strings are treated as absent filters.
    pub async fn total(
        &self,
        user_id: Option<&str>,
        service_name: Option<&str>,
        from: Option<MonthYear>,
        to: Option<MonthYear>,
    ) -> Result<i64, ServiceError> {
        let user_id = match user_id.filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_id(raw)?),
            None => None,
        };
        let filter = PriceFilter {
            user_id,
            service_name: service_name.filter(|s| !s.is_empty()).map(str::to_string),
            from,
            to,
        };
        let total = self.repo.sum_price(&filter).await?;
        debug!(?filter, total, "subscription_total");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::repository::mock::InMemorySubscriptionRepository;
    use chrono::{DateTime, FixedOffset};

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn service() -> SubscriptionService<dyn SubscriptionRepository> {
        let repo: Arc<dyn SubscriptionRepository> = Arc::new(InMemorySubscriptionRepository::new());
        SubscriptionService::new(repo)
    }

    fn new_sub(user_id: Uuid, name: &str, price: i64, start: &str) -> NewSubscription {
        NewSubscription {
            id: Uuid::new_v4(),
            user_id,
            service_name: name.into(),
            price,
            start_date: ts(start),
            end_date: None,
        }
    }

    #[tokio::test]
    async fn get_missing_is_not_found_not_error() {
        let svc = service();
        let res = svc.get(&Uuid::new_v4().to_string()).await.unwrap();
        assert_eq!(res, Lookup::NotFound);
    }

    #[tokio::test]
    async fn create_rejects_nil_user_id() {
        let svc = service();
        let err = svc.create(new_sub(Uuid::nil(), "Netflix", 100, "2024-01-15T00:00:00Z")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "invalid user_id"));
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn total_overflow_is_a_store_error() {
        let svc = service();
        svc.create(new_sub(Uuid::new_v4(), "Big", i64::MAX, "2024-01-15T00:00:00Z")).await.unwrap();
        svc.create(new_sub(Uuid::new_v4(), "Big", 1, "2024-01-16T00:00:00Z")).await.unwrap();
        assert!(matches!(svc.total(None, Some("Big"), None, None).await, Err(ServiceError::Db(_))));
        assert_eq!(svc.total(None, Some("Big"), MonthYear::parse("02-2024").ok(), None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_id_is_reported() {
        let svc = service();
        assert!(matches!(svc.get("not-a-uuid").await, Err(ServiceError::MalformedId(_))));
        assert!(matches!(svc.delete("42").await, Err(ServiceError::MalformedId(_))));
    }

    #[tokio::test]
    async fn update_overwrites_mutable_fields_only() {
        let svc = service();
        let a = svc.create(new_sub(Uuid::new_v4(), "Netflix", 100, "2024-01-15T00:00:00Z")).await.unwrap();

        let b = SubscriptionChanges {
            user_id: Uuid::new_v4(),
            service_name: "Kinopoisk".into(),
            price: 250,
            start_date: ts("2024-03-01T00:00:00Z"),
            end_date: Some(ts("2024-12-31T00:00:00Z")),
        };
        svc.update(&a.id.to_string(), b.clone()).await.unwrap();

        let got = svc.get(&a.id.to_string()).await.unwrap().into_option().unwrap();
        assert_eq!(got.id, a.id);
        assert_eq!(got.created_at, a.created_at);
        assert_eq!(got.user_id, b.user_id);
        assert_eq!(got.service_name, b.service_name);
        assert_eq!(got.price, b.price);
        assert_eq!(got.start_date, b.start_date);
        assert_eq!(got.end_date, b.end_date);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let svc = service();
        let changes = SubscriptionChanges {
            user_id: Uuid::new_v4(),
            service_name: "x".into(),
            price: 1,
            start_date: ts("2024-01-01T00:00:00Z"),
            end_date: None,
        };
        let err = svc.update(&Uuid::new_v4().to_string(), changes).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let svc = service();
        let a = svc.create(new_sub(Uuid::new_v4(), "Netflix", 100, "2024-01-15T00:00:00Z")).await.unwrap();
        let id = a.id.to_string();
        assert!(svc.delete(&id).await.unwrap());
        assert!(!svc.delete(&id).await.unwrap());
        assert_eq!(svc.get(&id).await.unwrap(), Lookup::NotFound);
    }

    #[tokio::test]
    async fn total_follows_filters() {
        let svc = service();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        svc.create(new_sub(u1, "Netflix", 100, "2024-01-15T00:00:00Z")).await.unwrap();
        svc.create(new_sub(u1, "Spotify", 200, "2024-02-10T00:00:00Z")).await.unwrap();
        svc.create(new_sub(u2, "Netflix", 50, "2024-01-20T00:00:00Z")).await.unwrap();

        let jan = MonthYear::parse("01-2024").ok();
        let mar = MonthYear::parse("03-2024").ok();
        let u1s = u1.to_string();

        assert_eq!(svc.total(None, None, None, None).await.unwrap(), 350);
        assert_eq!(svc.total(Some(&u1s), None, None, None).await.unwrap(), 300);
        assert_eq!(svc.total(None, None, jan, jan).await.unwrap(), 150);
        assert_eq!(svc.total(None, None, jan, mar).await.unwrap(), 350);
        assert_eq!(svc.total(None, Some("Netflix"), None, None).await.unwrap(), 150);
        assert_eq!(svc.total(None, Some("nonexistent"), None, None).await.unwrap(), 0);
        assert_eq!(svc.total(Some(""), Some(""), None, None).await.unwrap(), 350);
        assert!(matches!(svc.total(Some("bogus"), None, None, None).await, Err(ServiceError::MalformedId(_))));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let svc = service();
        let new = new_sub(Uuid::new_v4(), "Netflix", 100, "2024-01-15T00:00:00Z");
        svc.create(new.clone()).await.unwrap();
        assert!(matches!(svc.create(new).await, Err(ServiceError::Db(_))));
    }
}
