use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use configs::DatabaseConfig;
use server::routes::{self, ServerState};
use service::subscription::{repo::seaorm::SeaOrmSubscriptionRepository, SubscriptionRepository};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

/// Router backed by Postgres, or `None` when no database is reachable.
async fn build_app() -> anyhow::Result<Option<Router>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(None); }
    let mut cfg = DatabaseConfig::from_env();
    cfg.min_connections = 1;
    cfg.connect_timeout_secs = 3;
    let db = match models::db::connect_with_config(&cfg).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return Ok(None);
        }
    };
    migration::Migrator::up(&db, None).await?;
    let repo: Arc<dyn SubscriptionRepository> = Arc::new(SeaOrmSubscriptionRepository::new(db));
    Ok(Some(routes::build_router(ServerState::new(repo), cors())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v)?)
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body)?).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn test_subscription_lifecycle_against_postgres() -> anyhow::Result<()> {
    let Some(app) = build_app().await? else { return Ok(()); };

    let user = Uuid::new_v4();
    let svc = format!("db_flow_{}", Uuid::new_v4());
    let (status, created) = send(&app, "POST", "/subscriptions", Some(json!({
        "user_id": user, "service_name": svc, "price": 400, "start_date": "2025-07-01T00:00:00Z"
    }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().expect("id").to_string();

    let (status, got) = send(&app, "GET", &format!("/subscriptions/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(got["service_name"], json!(svc));

    let (status, _) = send(&app, "PUT", &format!("/subscriptions/{id}"), Some(json!({
        "user_id": user, "service_name": svc, "price": 500, "start_date": "2025-08-01T00:00:00Z"
    }))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, total) = send(&app, "GET", &format!("/subscriptions/total?service_name={svc}&from=08-2025&to=08-2025"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total["total"], 500);

    let (status, _) = send(&app, "DELETE", &format!("/subscriptions/{id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/subscriptions/{id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_total_for_unknown_service_is_zero() -> anyhow::Result<()> {
    let Some(app) = build_app().await? else { return Ok(()); };
    let uri = format!("/subscriptions/total?service_name=missing_{}", Uuid::new_v4());
    let (status, total) = send(&app, "GET", &uri, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(total, json!({"total": 0}));
    Ok(())
}
