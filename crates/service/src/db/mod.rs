//! Statement-level data access over a SeaORM connection, one function per query.

pub mod subscription_store;
