//! User model, roles, and auth DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Permission level of a user. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Role {
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Guide => write!(f, "guide"),
            Self::LeadGuide => write!(f, "lead-guide"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "guide" => Ok(Self::Guide),
            "lead-guide" => Ok(Self::LeadGuide),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub role: Role,
    pub password_hash: String,
    /// Unix seconds of the last credential rotation
    pub password_changed_at: Option<i64>,
    /// SHA-256 hex of the active reset token, if any
    pub password_reset_token: Option<String>,
    /// Unix seconds; reset token is dead once this passes
    pub password_reset_expires: Option<i64>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Whether the password changed strictly after a token issued at
    /// `token_issued_at` (unix seconds). Such tokens predate a credential
    /// rotation and must be rejected.
    pub fn password_changed_after(&self, token_issued_at: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => changed_at > token_issued_at,
            None => false,
        }
    }
}

/// Response DTO: never carries the password hash or reset-token fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            photo: user.photo,
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: &'static str,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Admin-side user update. Deliberately has no password field; credential
/// changes go through the password routes.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::User, Role::Guide, Role::LeadGuide, Role::Admin] {
            let s = role.to_string();
            assert_eq!(s.parse::<Role>().unwrap(), role);
        }
        assert!("superadmin".parse::<Role>().is_err());
    }

    #[test]
    fn lead_guide_serializes_kebab_case() {
        let json = serde_json::to_string(&Role::LeadGuide).unwrap();
        assert_eq!(json, "\"lead-guide\"");
    }

    fn user_with_change(changed_at: Option<i64>) -> User {
        User {
            id: "u1".into(),
            name: "Test".into(),
            email: "test@example.com".into(),
            photo: None,
            role: Role::User,
            password_hash: "hash".into(),
            password_changed_at: changed_at,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn token_predating_password_change_is_stale() {
        let user = user_with_change(Some(1_000));
        assert!(user.password_changed_after(999));
        // Equal timestamps pass: the comparison is strict
        assert!(!user.password_changed_after(1_000));
        assert!(!user.password_changed_after(1_001));
    }

    #[test]
    fn never_changed_password_never_invalidates() {
        let user = user_with_change(None);
        assert!(!user.password_changed_after(0));
    }

    #[test]
    fn response_dto_has_no_secret_fields() {
        let response = UserResponse::from(user_with_change(None));
        let json = serde_json::to_value(&response).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("password_reset_token"));
        assert!(!object.contains_key("password_reset_expires"));
    }
}
