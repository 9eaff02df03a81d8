//! Cohort Routers
//!
//! The API app nests these behind `require_auth` plus the matching
//! role middleware; `classes_router` only needs authentication since
//! both roles use it.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::infra::postgres::PgCohortStore;
use crate::presentation::handlers;

pub fn admin_router(store: PgCohortStore) -> Router {
    Router::new()
        .route(
            "/batches",
            get(handlers::list_batches).post(handlers::create_batch),
        )
        .route("/batches/{id}/courses", post(handlers::attach_course))
        .route(
            "/batches/{id}/courses/{course_id}",
            delete(handlers::detach_course),
        )
        .route(
            "/batches/{id}/instructors",
            get(handlers::list_batch_instructors).post(handlers::assign_instructor),
        )
        .route(
            "/batches/{id}/instructors/{user_id}",
            delete(handlers::remove_instructor),
        )
        .with_state(store)
}

pub fn instructor_router(store: PgCohortStore) -> Router {
    Router::new()
        .route("/batches", get(handlers::list_my_batches))
        .route(
            "/batches/{id}",
            get(handlers::show_my_batch)
                .put(handlers::update_batch)
                .delete(handlers::delete_batch),
        )
        .route("/batches/{id}/stats", get(handlers::batch_stats))
        .with_state(store)
}

pub fn student_router(store: PgCohortStore) -> Router {
    Router::new()
        .route("/courses/{course_id}/batches", get(handlers::course_batches))
        .route("/batches/{id}", get(handlers::show_batch))
        .route("/batches/{id}/enroll", post(handlers::enroll_in_batch))
        .with_state(store)
}

pub fn classes_router(store: PgCohortStore) -> Router {
    Router::new()
        .route("/", get(handlers::list_classes).post(handlers::create_class))
        .route("/join", post(handlers::join_class))
        .route("/{id}", get(handlers::show_class))
        .route("/{id}/people", get(handlers::class_people))
        .route(
            "/{id}/stream",
            get(handlers::class_stream).post(handlers::post_to_stream),
        )
        .route("/{id}/classwork", get(handlers::class_classwork))
        .with_state(store)
}
