//! Input validation for API requests.
//!
//! Validation functions return `Result<(), String>`; handlers collect
//! failures into a `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    /// Regex for validating email addresses. Deliberately loose: the real
    /// arbiter of deliverability is the mail transport.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Please provide a valid email".to_string());
    }
    Ok(())
}

/// Validate a password and its confirmation
pub fn validate_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if password != confirm {
        return Err("Password and confirmation must match".to_string());
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Name is too long (max 100 characters)".to_string());
    }
    Ok(())
}

/// Validate a tour name
pub fn validate_tour_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.len() < 3 {
        return Err("Tour name must be at least 3 characters".to_string());
    }
    if trimmed.len() > 100 {
        return Err("Tour name is too long (max 100 characters)".to_string());
    }
    Ok(())
}

/// Validate a price
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price <= 0.0 {
        return Err("Price must be a positive number".to_string());
    }
    Ok(())
}

/// Validate a positive integer field such as duration or group size
pub fn validate_positive(value: i64, field: &str) -> Result<(), String> {
    if value <= 0 {
        return Err(format!("{} must be greater than zero", field));
    }
    Ok(())
}

/// Derive a URL slug from a tour name: lowercase, alphanumerics kept,
/// everything else collapsed to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normal_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn password_length_and_confirmation() {
        assert!(validate_password("longenough", "longenough").is_ok());
        assert!(validate_password("short", "short").is_err());
        assert!(validate_password("longenough", "different1").is_err());
    }

    #[test]
    fn slugify_is_stable_and_hyphenated() {
        assert_eq!(slugify("The Forest Hiker"), "the-forest-hiker");
        assert_eq!(slugify("  Sea -- Explorer!  "), "sea-explorer");
        assert_eq!(slugify("Tour #5 (2026)"), "tour-5-2026");
        assert_eq!(slugify(slugify("The Forest Hiker").as_str()), "the-forest-hiker");
    }

    #[test]
    fn price_must_be_positive_and_finite() {
        assert!(validate_price(397.0).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-10.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
    }
}
