use crate::db::ping;
use sea_orm::{DatabaseBackend, Statement, ConnectionTrait};
use anyhow::Result;

use super::setup_test_db;

/// Test basic database connection
#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()); };

    ping(&db).await?;

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let row = db.query_one(stmt).await?.expect("one row");
    let test_value: i32 = row.try_get("", "test")?;
    assert_eq!(test_value, 1);
    Ok(())
}

/// The first migration must leave the uuid extension behind for column defaults
#[tokio::test]
async fn test_uuid_extension_installed() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()); };

    let stmt = Statement::from_string(
        DatabaseBackend::Postgres,
        "SELECT COUNT(*)::BIGINT AS n FROM pg_extension WHERE extname = 'uuid-ossp'".to_string(),
    );
    let row = db.query_one(stmt).await?.expect("one row");
    let n: i64 = row.try_get("", "n")?;
    assert_eq!(n, 1);
    Ok(())
}
