use chrono::{DateTime, FixedOffset};
use models::{subscription, MonthYear};
use uuid::Uuid;

pub use models::subscription::NewSubscription;

/// Outcome of a lookup by id. Store failures travel separately as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

/// Mutable fields written by an update; everything else is kept from the stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionChanges {
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

/// Filters for the price total. `None` means the filter is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    /// Lower bound: `start_date` on or after the first instant of this month.
    pub from: Option<MonthYear>,
    /// Upper bound: `start_date` anywhere up to the end of this month.
    pub to: Option<MonthYear>,
}

impl PriceFilter {
    pub fn matches(&self, sub: &subscription::Model) -> bool {
        if let Some(uid) = self.user_id {
            if sub.user_id != uid { return false; }
        }
        if let Some(name) = &self.service_name {
            if &sub.service_name != name { return false; }
        }
        if let Some(from) = self.from {
            if sub.start_date < from.first_instant() { return false; }
        }
        if let Some(to) = self.to {
            if sub.start_date >= to.end_exclusive() { return false; }
        }
        true
    }
}
