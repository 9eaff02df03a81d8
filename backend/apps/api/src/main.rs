//! API Server Entry Point
//!
//! Wires the bounded-context crates into one router under `/api/v1`.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod dashboard;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, http,
    http::{Method, header},
    middleware::{from_fn, from_fn_with_state},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::{
    AuthConfig, AuthLayerState, PgAuthRepository, require_admin, require_auth, require_instructor,
};
use catalog::PgCatalogStore;
use cohort::PgCohortStore;
use commerce::{CommerceConfig, PgCommerceStore};
use coursework::PgCourseworkStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api=info,auth=info,catalog=info,commerce=info,cohort=info,\
             coursework=info,tower_http=info"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: remove expired auth sessions
    // Errors here should not prevent server startup
    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    match auth_repo.cleanup_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    let auth_config = Arc::new(AuthConfig::from_env());
    let commerce_config = Arc::new(CommerceConfig::from_env());

    let catalog_store = PgCatalogStore::new(pool.clone());
    let commerce_store = PgCommerceStore::new(pool.clone());
    let cohort_store = PgCohortStore::new(pool.clone());
    let coursework_store = PgCourseworkStore::new(pool.clone());

    let auth_state = AuthLayerState {
        repo: auth_repo.clone(),
        config: auth_config.clone(),
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Authenticated, any role
    let student_routes = Router::new()
        .merge(cohort::student_router(cohort_store.clone()))
        .merge(coursework::student_router(coursework_store.clone()))
        .merge(dashboard::student_router(pool.clone()));

    let user_routes = Router::new()
        .merge(commerce::checkout_router(
            commerce_store.clone(),
            commerce_config.clone(),
        ))
        .nest("/student", student_routes)
        .nest("/classes", cohort::classes_router(cohort_store.clone()))
        .nest(
            "/discussions",
            coursework::discussions_router(coursework_store.clone()),
        )
        .layer(from_fn_with_state(auth_state.clone(), require_auth));

    let instructor_routes = Router::new()
        .merge(catalog::instructor_router(catalog_store.clone()))
        .merge(cohort::instructor_router(cohort_store.clone()))
        .merge(coursework::instructor_router(coursework_store.clone()))
        .merge(dashboard::instructor_router(pool.clone()))
        .layer(from_fn(require_instructor))
        .layer(from_fn_with_state(auth_state.clone(), require_auth));

    let admin_routes = Router::new()
        .merge(catalog::admin_router(catalog_store.clone()))
        .merge(cohort::admin_router(cohort_store.clone()))
        .merge(dashboard::admin_router(pool.clone()))
        .layer(from_fn(require_admin))
        .layer(from_fn_with_state(auth_state.clone(), require_auth));

    let api_v1 = Router::new()
        .nest("/auth", auth::auth_router(auth_repo, auth_config))
        .nest("/public", catalog::public_router(catalog_store))
        .nest(
            "/webhooks",
            commerce::webhook_router(commerce_store, commerce_config),
        )
        .merge(user_routes)
        .nest("/instructor", instructor_routes)
        .nest("/admin", admin_routes);

    let app = Router::new()
        .nest("/api/v1", api_v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
