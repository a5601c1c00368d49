//! Credential and session management.
//!
//! Session tokens are signed HS256 JWTs carried in an HTTP-only cookie;
//! validity is signature + expiry plus a comparison against the user's
//! last password change, so a credential rotation invalidates every token
//! issued before it. Password-reset tokens are random values handed to the
//! user by email and stored only as SHA-256 hashes with a 10-minute expiry.
//!
//! Password hashing and timestamp stamping are explicit steps of the
//! use-case functions here, not persistence-layer hooks.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::db::{
    AuthResponse, DbPool, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, Role,
    SignupRequest, UpdatePasswordRequest, User, UserResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_name, validate_password};
use super::StatusMessage;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "jwt";

/// Lifetime of a password-reset token
const RESET_TOKEN_TTL_SECS: i64 = 10 * 60;

// -------------------------------------------------------------------------
// Password hashing
// -------------------------------------------------------------------------

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// -------------------------------------------------------------------------
// Session tokens
// -------------------------------------------------------------------------

/// Claims embedded in a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: user id
    pub sub: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Issue a signed session token for a user id
pub fn sign_session_token(user_id: &str, config: &Config) -> Result<String, ApiError> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + config.auth.jwt_expires_days * 24 * 60 * 60,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign session token: {}", e);
        ApiError::internal("Could not create session token")
    })
}

/// Decode and verify a session token (signature + expiry)
pub fn decode_session_token(token: &str, config: &Config) -> Result<SessionClaims, ApiError> {
    let claims = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(claims.claims)
}

/// Build the session cookie carrying a freshly issued token
fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.server.environment.is_production())
        .max_age(time::Duration::days(config.auth.jwt_expires_days))
        .build()
}

/// Cookie that overwrites the session with a short-lived placeholder
fn logout_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "loggedout"))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(10))
        .build()
}

// -------------------------------------------------------------------------
// Password-reset tokens
// -------------------------------------------------------------------------

/// Generate a random reset token (plaintext; only its hash is stored)
fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a reset token for storage
fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

// -------------------------------------------------------------------------
// Use-case functions
// -------------------------------------------------------------------------

/// Create a user account. Validates input, hashes the password (the
/// confirmation field never leaves this function), and persists the row.
pub(crate) async fn register_user(db: &DbPool, req: &SignupRequest) -> Result<User, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&req.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_email(&req.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&req.password, &req.password_confirm) {
        errors.add("password", e);
    }
    errors.finish()?;

    let email = req.email.trim().to_lowercase();
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::validation_field("email", "Email is already in use"));
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Could not create account")
    })?;
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.name.trim())
    .bind(&email)
    .bind(Role::User)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    fetch_user(db, &id)
        .await?
        .ok_or_else(|| ApiError::internal("Could not create account"))
}

/// Look up a user by credentials. User absent, inactive, or wrong password
/// all produce the same generic error so the response does not leak which
/// part was wrong.
pub(crate) async fn authenticate(
    db: &DbPool,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let user: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE email = ? AND active = 1")
            .bind(email.trim().to_lowercase())
            .fetch_optional(db)
            .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("incorrect email or password"))?;

    if !verify_password(password, &user.password_hash) {
        return Err(ApiError::unauthorized("incorrect email or password"));
    }

    Ok(user)
}

/// Set a new password: hash it, stamp the change, clear any reset token.
///
/// The change is stamped one second in the past so a session token issued
/// in the same second as the change still passes the strict comparison.
pub(crate) async fn set_user_password(
    db: &DbPool,
    user_id: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let password_hash = hash_password(new_password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Could not update password")
    })?;
    let changed_at = chrono::Utc::now().timestamp() - 1;

    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = ?,
            password_changed_at = ?,
            password_reset_token = NULL,
            password_reset_expires = NULL,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&password_hash)
    .bind(changed_at)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(())
}

/// Store a fresh reset token hash + expiry on the user and return the
/// plaintext. Overwrites any prior token: one active token per user.
pub(crate) async fn issue_reset_token(db: &DbPool, user_id: &str) -> Result<String, ApiError> {
    let token = generate_reset_token();
    let expires = chrono::Utc::now().timestamp() + RESET_TOKEN_TTL_SECS;

    sqlx::query(
        "UPDATE users SET password_reset_token = ?, password_reset_expires = ? WHERE id = ?",
    )
    .bind(hash_reset_token(&token))
    .bind(expires)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(token)
}

/// Clear a stored reset token (rollback after a failed email send)
pub(crate) async fn clear_reset_token(db: &DbPool, user_id: &str) -> Result<(), ApiError> {
    sqlx::query(
        "UPDATE users SET password_reset_token = NULL, password_reset_expires = NULL WHERE id = ?",
    )
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(())
}

/// Find the user holding an unexpired reset token matching the plaintext
pub(crate) async fn find_user_for_reset(
    db: &DbPool,
    plaintext_token: &str,
) -> Result<Option<User>, ApiError> {
    let now = chrono::Utc::now().timestamp();
    let user = sqlx::query_as(
        r#"
        SELECT * FROM users
        WHERE password_reset_token = ? AND password_reset_expires > ? AND active = 1
        "#,
    )
    .bind(hash_reset_token(plaintext_token))
    .bind(now)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

async fn fetch_user(db: &DbPool, id: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = ? AND active = 1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

// -------------------------------------------------------------------------
// Request authentication
// -------------------------------------------------------------------------

/// Extract the session token from the `Authorization: Bearer` header or
/// the session cookie
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

/// Resolve a session token to its user: signature + expiry, user still
/// exists and is active, and the password has not been changed since the
/// token was issued.
pub async fn user_from_token(state: &AppState, token: &str) -> Result<User, ApiError> {
    let claims = decode_session_token(token, &state.config)?;

    let user = fetch_user(&state.db, &claims.sub).await?.ok_or_else(|| {
        ApiError::unauthorized("the user belonging to this token no longer exists")
    })?;

    if user.password_changed_after(claims.iat) {
        return Err(ApiError::unauthorized(
            "password was changed recently, please log in again",
        ));
    }

    Ok(user)
}

/// Extractor for handlers that require an authenticated user
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or_else(|| {
            ApiError::unauthorized("you are not logged in, please log in to get access")
        })?;
        let user = user_from_token(state, &token).await?;
        Ok(CurrentUser(user))
    }
}

/// Extractor for pages that render differently for anonymous visitors.
/// Any authentication failure degrades to `None` instead of failing.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = match extract_token(&parts.headers) {
            Some(token) => user_from_token(state, &token).await.ok(),
            None => None,
        };
        Ok(MaybeUser(user))
    }
}

// -------------------------------------------------------------------------
// Authorization
// -------------------------------------------------------------------------

/// Whether a role is in the allow-list
pub fn role_allowed(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// Fail with AuthorizationError unless the user's role is allowed.
/// Called explicitly inside each protected handler, after authentication.
pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), ApiError> {
    if role_allowed(user.role, allowed) {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "you do not have permission to perform this action",
        ))
    }
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

/// POST /api/v1/users/signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let user = register_user(&state.db, &request).await?;

    // Welcome mail is best-effort; a failed send never aborts signup
    let account_url = format!("{}/me", state.config.server.public_url);
    if let Err(e) = state
        .mailer
        .send_welcome(&user.email, &user.name, &account_url)
        .await
    {
        tracing::warn!(email = %user.email, "Failed to send welcome email: {}", e);
    }

    let token = sign_session_token(&user.id, &state.config)?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    tracing::info!(user_id = %user.id, "New user signed up");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            status: "success",
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let user = authenticate(&state.db, &request.email, &request.password).await?;

    let token = sign_session_token(&user.id, &state.config)?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    Ok((
        jar,
        Json(AuthResponse {
            status: "success",
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// GET /api/v1/users/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<StatusMessage>) {
    let jar = jar.add(logout_cookie());
    (jar, Json(StatusMessage::ok("logged out")))
}

/// POST /api/v1/users/forgotPassword
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<StatusMessage>, ApiError> {
    let email = request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation_field("email", "Email is required"))?;

    let user: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE email = ? AND active = 1")
            .bind(email.to_lowercase())
            .fetch_optional(&state.db)
            .await?;
    let user = user.ok_or_else(|| ApiError::not_found("no user found with that email"))?;

    let token = issue_reset_token(&state.db, &user.id).await?;
    let reset_url = format!(
        "{}/api/v1/users/resetPassword/{}",
        state.config.server.public_url, token
    );

    // The reset mail must go out; otherwise roll the stored token back so
    // no usable token is left orphaned without the user knowing it exists.
    if let Err(e) = state
        .mailer
        .send_password_reset(&user.email, &user.name, &reset_url)
        .await
    {
        tracing::error!(email = %user.email, "Failed to send reset email: {}", e);
        clear_reset_token(&state.db, &user.id).await?;
        return Err(ApiError::internal("there was an error sending the email"));
    }

    Ok(Json(StatusMessage::ok("token sent to email")))
}

/// PATCH /api/v1/users/resetPassword/:token
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let user = find_user_for_reset(&state.db, &token)
        .await?
        .ok_or_else(|| ApiError::validation_message("token is invalid or expired"))?;

    validate_password(&request.password, &request.password_confirm)
        .map_err(|e| ApiError::validation_field("password", e))?;

    set_user_password(&state.db, &user.id, &request.password).await?;

    let token = sign_session_token(&user.id, &state.config)?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok((
        jar,
        Json(AuthResponse {
            status: "success",
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// PATCH /api/v1/users/updatePassword
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    if !verify_password(&request.current_password, &user.password_hash) {
        return Err(ApiError::unauthorized("your current password is wrong"));
    }

    validate_password(&request.new_password, &request.new_password_confirm)
        .map_err(|e| ApiError::validation_field("password", e))?;

    set_user_password(&state.db, &user.id, &request.new_password).await?;

    // The old token now predates the change; the response must carry a
    // fresh one.
    let token = sign_session_token(&user.id, &state.config)?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    Ok((
        jar,
        Json(AuthResponse {
            status: "success",
            token,
            user: UserResponse::from(user),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "correct-horse".to_string(),
            password_confirm: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn signup_never_stores_plaintext_password() {
        let pool = db::init_test().await;
        let user = register_user(&pool, &signup_request("a@example.com"))
            .await
            .unwrap();

        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "correct-horse");
        assert!(verify_password("correct-horse", &user.password_hash));
    }

    #[tokio::test]
    async fn signup_rejects_mismatched_confirmation() {
        let pool = db::init_test().await;
        let mut req = signup_request("a@example.com");
        req.password_confirm = "something-else".to_string();
        assert!(register_user(&pool, &req).await.is_err());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = db::init_test().await;
        register_user(&pool, &signup_request("dup@example.com"))
            .await
            .unwrap();
        let err = register_user(&pool, &signup_request("dup@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_failures_share_one_message() {
        let pool = db::init_test().await;
        register_user(&pool, &signup_request("known@example.com"))
            .await
            .unwrap();

        let wrong_password = authenticate(&pool, "known@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown_email = authenticate(&pool, "nobody@example.com", "correct-horse")
            .await
            .unwrap_err();

        assert_eq!(wrong_password.message(), unknown_email.message());
        assert_eq!(wrong_password.message(), "incorrect email or password");
    }

    #[tokio::test]
    async fn reset_token_is_single_use() {
        let pool = db::init_test().await;
        let user = register_user(&pool, &signup_request("reset@example.com"))
            .await
            .unwrap();

        let token = issue_reset_token(&pool, &user.id).await.unwrap();
        assert!(find_user_for_reset(&pool, &token).await.unwrap().is_some());

        // A successful reset clears the stored hash; the same plaintext
        // no longer matches anything.
        set_user_password(&pool, &user.id, "new-password-1").await.unwrap();
        assert!(find_user_for_reset(&pool, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_token_respects_expiry_boundary() {
        let pool = db::init_test().await;
        let user = register_user(&pool, &signup_request("expiry@example.com"))
            .await
            .unwrap();
        let token = issue_reset_token(&pool, &user.id).await.unwrap();

        let now = chrono::Utc::now().timestamp();

        // One second of validity left: succeeds
        sqlx::query("UPDATE users SET password_reset_expires = ? WHERE id = ?")
            .bind(now + 1)
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(find_user_for_reset(&pool, &token).await.unwrap().is_some());

        // One second past expiry: fails
        sqlx::query("UPDATE users SET password_reset_expires = ? WHERE id = ?")
            .bind(now - 1)
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();
        assert!(find_user_for_reset(&pool, &token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_reset_request_overwrites_prior_token() {
        let pool = db::init_test().await;
        let user = register_user(&pool, &signup_request("twice@example.com"))
            .await
            .unwrap();

        let first = issue_reset_token(&pool, &user.id).await.unwrap();
        let second = issue_reset_token(&pool, &user.id).await.unwrap();

        assert!(find_user_for_reset(&pool, &first).await.unwrap().is_none());
        assert!(find_user_for_reset(&pool, &second).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn password_change_invalidates_existing_tokens() {
        let pool = db::init_test().await;
        let state = crate::AppState::new(Config::default(), pool.clone());
        let user = register_user(&pool, &signup_request("stale@example.com"))
            .await
            .unwrap();

        let token = sign_session_token(&user.id, &state.config).unwrap();
        assert!(user_from_token(&state, &token).await.is_ok());

        // Simulate a later credential rotation: change stamped after iat
        let claims = decode_session_token(&token, &state.config).unwrap();
        sqlx::query("UPDATE users SET password_changed_at = ? WHERE id = ?")
            .bind(claims.iat + 10)
            .bind(&user.id)
            .execute(&pool)
            .await
            .unwrap();

        let err = user_from_token(&state, &token).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        // A token issued after the change is accepted: the change is
        // stamped behind the new token's iat
        set_user_password(&pool, &user.id, "rotated-password").await.unwrap();
        let fresh = sign_session_token(&user.id, &state.config).unwrap();
        assert!(user_from_token(&state, &fresh).await.is_ok());
    }

    #[test]
    fn session_token_round_trip() {
        let config = Config::default();
        let token = sign_session_token("user-1", &config).unwrap();
        let claims = decode_session_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = Config::default();
        let token = sign_session_token("user-1", &config).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(decode_session_token(&tampered, &config).is_err());
    }

    #[test]
    fn reset_token_hash_is_one_way_and_deterministic() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert_eq!(hash_reset_token(&token), hash_reset_token(&token));
        assert_ne!(hash_reset_token(&token), token);
    }

    #[test]
    fn role_allow_list_is_pure() {
        let allowed = [Role::Admin, Role::LeadGuide];
        assert!(role_allowed(Role::Admin, &allowed));
        assert!(role_allowed(Role::LeadGuide, &allowed));
        assert!(!role_allowed(Role::Guide, &allowed));
        assert!(!role_allowed(Role::User, &allowed));
        assert!(!role_allowed(Role::Admin, &[]));
    }
}
