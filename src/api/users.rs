//! User account endpoints: the authenticated "me" surface plus the
//! admin-only user management CRUD.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{Role, UpdateUserRequest, User, UserResponse};
use crate::AppState;

use super::auth::{require_role, CurrentUser};
use super::error::ApiError;
use super::uploads;
use super::validation::{validate_email, validate_name};

/// GET /api/v1/users/me
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// PATCH /api/v1/users/updateMe
///
/// Multipart form: optional `name` and `email` text fields plus an
/// optional `photo` image. Password fields are rejected here; credential
/// changes go through the password routes.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>, ApiError> {
    let mut new_name: Option<String> = None;
    let mut new_email: Option<String> = None;
    let mut photo_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "name" => new_name = Some(field.text().await?),
            "email" => new_email = Some(field.text().await?),
            "photo" => {
                if !uploads::is_image_content_type(field.content_type()) {
                    return Err(ApiError::validation_field("photo", "Please upload only images"));
                }
                photo_bytes = Some(field.bytes().await?.to_vec());
            }
            "password" | "password_confirm" | "new_password" => {
                return Err(ApiError::bad_request(
                    "this route is not for password updates, use /updatePassword",
                ));
            }
            _ => {}
        }
    }

    if let Some(ref name) = new_name {
        validate_name(name).map_err(|e| ApiError::validation_field("name", e))?;
    }
    let new_email = match new_email {
        Some(email) => {
            validate_email(&email).map_err(|e| ApiError::validation_field("email", e))?;

            let email = email.trim().to_lowercase();
            let taken: Option<(String,)> =
                sqlx::query_as("SELECT id FROM users WHERE email = ? AND id != ?")
                    .bind(&email)
                    .bind(&user.id)
                    .fetch_optional(&state.db)
                    .await?;
            if taken.is_some() {
                return Err(ApiError::validation_field("email", "Email is already in use"));
            }
            Some(email)
        }
        None => None,
    };

    let mut new_photo: Option<String> = None;
    if let Some(bytes) = photo_bytes {
        let filename =
            uploads::user_photo_filename(&user.id, chrono::Utc::now().timestamp_millis());
        let dest = state
            .config
            .server
            .uploads_dir
            .join("img/users")
            .join(&filename);
        let (width, height) = uploads::USER_PHOTO_SIZE;
        uploads::save_resized_jpeg(bytes, dest, width, height).await?;
        new_photo = Some(filename);
    }

    sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            photo = COALESCE(?, photo),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(new_name.as_deref().map(str::trim))
    .bind(&new_email)
    .bind(&new_photo)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(&user.id)
    .execute(&state.db)
    .await?;

    let updated: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// DELETE /api/v1/users/deleteMe
///
/// Soft delete: the row stays for referential integrity, but the account
/// disappears from reads and can no longer log in.
pub async fn delete_me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    sqlx::query("UPDATE users SET active = 0, updated_at = ? WHERE id = ?")
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// -------------------------------------------------------------------------
// Admin user management
// -------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_role(&current, &[Role::Admin])?;

    let users: Vec<User> =
        sqlx::query_as("SELECT * FROM users WHERE active = 1 ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    require_role(&current, &[Role::Admin])?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ? AND active = 1")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    user.map(|u| Json(UserResponse::from(u)))
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// PATCH /api/v1/users/:id
///
/// Admin-side update of name/email/role. Never touches passwords.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require_role(&current, &[Role::Admin])?;

    if let Some(ref name) = request.name {
        validate_name(name).map_err(|e| ApiError::validation_field("name", e))?;
    }
    if let Some(ref email) = request.email {
        validate_email(email).map_err(|e| ApiError::validation_field("email", e))?;
    }

    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            role = COALESCE(?, role),
            updated_at = ?
        WHERE id = ? AND active = 1
        "#,
    )
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(request.role)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(&id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_role(&current, &[Role::Admin])?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
