use sea_orm::{entity::prelude::*, Set, ConnectionTrait, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insertable shape: the id is already decided, timestamps are stamped on insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: Option<DateTimeWithTimeZone>,
}

impl NewSubscription {
    /// Materialize the row as it will be stored at `now`.
    pub fn into_model(self, now: DateTimeWithTimeZone) -> Model {
        Model {
            id: self.id,
            user_id: self.user_id,
            service_name: self.service_name,
            price: self.price,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn validate_user_id(user_id: Uuid) -> Result<(), errors::ModelError> {
    if user_id.is_nil() {
        return Err(errors::ModelError::Validation("invalid user_id".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewSubscription) -> Result<Model, errors::ModelError> {
    let row = new.into_model(Utc::now().into());
    let am: ActiveModel = row.into();
    am.reset_all().insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
