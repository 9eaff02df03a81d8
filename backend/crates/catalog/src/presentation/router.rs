//! Catalog Routers
//!
//! Auth and role layers are applied by the API app when these routers
//! are nested; the instructor and admin routers assume `require_auth`
//! plus the matching role middleware have already run.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infra::postgres::PgCatalogStore;
use crate::presentation::handlers;

/// Unauthenticated browse endpoints
pub fn public_router(store: PgCatalogStore) -> Router {
    Router::new()
        .route("/courses", get(handlers::list_courses))
        .route("/courses/{slug}", get(handlers::show_course))
        .route("/courses/{id}/related", get(handlers::related_courses))
        .route("/categories", get(handlers::list_public_categories))
        .with_state(store)
}

/// Course builder endpoints for instructors
pub fn instructor_router(store: PgCatalogStore) -> Router {
    Router::new()
        .route(
            "/courses",
            get(handlers::list_my_courses).post(handlers::create_course),
        )
        .route(
            "/courses/{id}",
            get(handlers::show_my_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/courses/{id}/submit-review", post(handlers::submit_for_review))
        .route(
            "/courses/{id}/sections",
            get(handlers::list_sections).post(handlers::create_section),
        )
        .route(
            "/courses/{id}/sections/reorder",
            post(handlers::reorder_sections),
        )
        .route(
            "/sections/{id}",
            put(handlers::update_section).delete(handlers::delete_section),
        )
        .route("/sections/{id}/lessons", post(handlers::create_lesson))
        .route(
            "/sections/{id}/lessons/reorder",
            post(handlers::reorder_lessons),
        )
        .route(
            "/lessons/{id}",
            put(handlers::update_lesson).delete(handlers::delete_lesson),
        )
        .with_state(store)
}

/// Category management and course review for admins
pub fn admin_router(store: PgCatalogStore) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_all_categories).post(handlers::create_category),
        )
        .route("/categories/reorder", post(handlers::reorder_categories))
        .route(
            "/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route("/courses/pending", get(handlers::list_pending_courses))
        .route("/courses/{id}/review", post(handlers::review_course))
        .with_state(store)
}
