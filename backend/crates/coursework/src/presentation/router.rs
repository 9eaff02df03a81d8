//! Coursework Routers
//!
//! The API app nests `instructor_router` behind `require_auth` plus
//! `require_instructor`; the other two only need authentication.

use axum::{
    Router,
    routing::{get, post},
};

use crate::infra::postgres::PgCourseworkStore;
use crate::presentation::handlers;

pub fn instructor_router(store: PgCourseworkStore) -> Router {
    Router::new()
        .route(
            "/batches/{id}/assignments",
            get(handlers::list_batch_assignments).post(handlers::create_assignment),
        )
        .route("/batches/{id}/grades", post(handlers::upsert_grade))
        .route(
            "/assignments/{id}",
            get(handlers::show_assignment)
                .put(handlers::update_assignment)
                .delete(handlers::delete_assignment),
        )
        .route(
            "/assignments/{id}/submissions",
            get(handlers::list_submissions),
        )
        .route(
            "/submissions/{id}/grade",
            post(handlers::grade_submission),
        )
        .with_state(store)
}

pub fn student_router(store: PgCourseworkStore) -> Router {
    Router::new()
        .route("/assignments", get(handlers::list_my_assignments))
        .route("/assignments/{id}", get(handlers::show_my_assignment))
        .route("/assignments/{id}/submit", post(handlers::submit_assignment))
        .route("/grades", get(handlers::list_my_grades))
        .with_state(store)
}

pub fn discussions_router(store: PgCourseworkStore) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_discussions).post(handlers::create_discussion),
        )
        .route(
            "/{id}",
            get(handlers::show_discussion)
                .put(handlers::update_discussion)
                .delete(handlers::delete_discussion),
        )
        .route("/{id}/pin", post(handlers::toggle_pin))
        .route("/{id}/lock", post(handlers::toggle_lock))
        .with_state(store)
}
