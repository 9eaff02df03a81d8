//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::client::{extract_client_ip, extract_fingerprint};
use platform::cookie::SessionCookie;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfoResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState {
    pub repo: Arc<PgAuthRepository>,
    pub config: Arc<AuthConfig>,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AuthAppState>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)> {
    let use_case = RegisterUseCase::new(state.repo.clone());

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role: UserRole::Student,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            public_id: output.public_id,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AuthAppState>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse> {
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let remember_me = req.remember_me;

    let output = use_case
        .execute(
            LoginInput {
                email: req.email,
                password: req.password,
                remember_me,
            },
            fingerprint,
        )
        .await?;

    // Max-Age must match the remember_me TTL
    let cookie = build_session_cookie(&state.config, &output.session_token, remember_me);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            public_id: output.public_id,
            role: output.role,
        }),
    ))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AuthAppState>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse> {
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    if let Some(token) = token {
        let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
        // Ignore errors - just clear the cookie
        let _ = use_case.execute(&token).await;
    }

    let cookie = build_clear_cookie(&state.config);

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

/// GET /api/v1/auth/user
pub async fn current_user(
    State(state): State<AuthAppState>,
    headers: HeaderMap,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
) -> AuthResult<Json<UserInfoResponse>> {
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));
    let fingerprint = extract_fingerprint(&headers, client_ip)?;

    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let check = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let session = check.get_session(&token, &fingerprint.hash).await?;

    let user = UserRepository::find_by_id(state.repo.as_ref(), &session.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserInfoResponse {
        public_id: user.public_id.to_string(),
        name: user.name.to_string(),
        email: user.email.to_string(),
        role: user.role.code().to_string(),
        last_login_at: user.last_login_at.map(|t| t.timestamp_millis()),
    }))
}

fn build_session_cookie(config: &AuthConfig, token: &str, remember_me: bool) -> String {
    let max_age = if remember_me {
        config.session_ttl_long.as_secs()
    } else {
        config.session_ttl_short.as_secs()
    };

    SessionCookie::new(&config.session_cookie_name, token)
        .secure(config.cookie_secure)
        .same_site(config.cookie_same_site)
        .max_age(max_age)
        .to_header_value()
}

fn build_clear_cookie(config: &AuthConfig) -> String {
    SessionCookie::removal(&config.session_cookie_name)
        .secure(config.cookie_secure)
        .same_site(config.cookie_same_site)
        .to_header_value()
}
