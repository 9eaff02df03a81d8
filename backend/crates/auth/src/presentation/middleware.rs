//! Auth Middleware
//!
//! `require_auth` validates the session cookie and inserts a
//! `CurrentUser` into request extensions for downstream handlers.
//! `require_instructor` / `require_admin` layer on top of it for
//! role-gated route groups.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;
use platform::client::{extract_client_ip, extract_fingerprint};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AuthConfig;
use crate::domain::value_object::{public_id::PublicId, user_role::UserRole};
use crate::error::AuthError;
use crate::infra::postgres::PgAuthRepository;

/// Authenticated user, inserted into request extensions by
/// `require_auth` and consumed by handlers in every feature crate.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub public_id: PublicId,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_instructor_or_higher(&self) -> bool {
        self.role.is_instructor_or_higher()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// State for the auth middleware layer
#[derive(Clone)]
pub struct AuthLayerState {
    pub repo: Arc<PgAuthRepository>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid auth session
pub async fn require_auth(
    State(state): State<AuthLayerState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let headers = req.headers();

    let client_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());
    let client_ip = extract_client_ip(headers, client_ip);

    let fingerprint = match extract_fingerprint(headers, client_ip) {
        Ok(fp) => fp,
        Err(e) => return Err(AuthError::from(e).into_response()),
    };

    let token = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name)
        .ok_or_else(|| AuthError::SessionInvalid.into_response())?;

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let session = use_case
        .get_session(&token, &fingerprint.hash)
        .await
        .map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        public_id: session.public_id,
        role: session.role,
    });

    Ok(next.run(req).await)
}

/// Middleware that requires instructor or admin role
///
/// Must run after `require_auth`.
pub async fn require_instructor(req: Request<Body>, next: Next) -> Result<Response, Response> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .copied()
        .ok_or_else(|| AuthError::SessionInvalid.into_response())?;

    if !user.is_instructor_or_higher() {
        return Err(AuthError::Forbidden.into_response());
    }

    Ok(next.run(req).await)
}

/// Middleware that requires admin role
///
/// Must run after `require_auth`.
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, Response> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .copied()
        .ok_or_else(|| AuthError::SessionInvalid.into_response())?;

    if !user.is_admin() {
        return Err(AuthError::Forbidden.into_response());
    }

    Ok(next.run(req).await)
}
