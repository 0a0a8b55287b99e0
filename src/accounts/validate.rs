//! Structural input validation for the account use cases.
//!
//! Rejects malformed input before any component is touched. Semantic checks
//! (duplicate email, credential verification) stay in the use-case layer.

use crate::accounts::RegisterRequest;
use crate::error::AccountError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub(crate) fn register(req: &RegisterRequest) -> Result<(), AccountError> {
    require("first name", &req.first_name)?;
    require("last name", &req.last_name)?;
    require("email", &req.email)?;
    email(&req.email)?;
    password(&req.password)?;
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), AccountError> {
    let malformed = || AccountError::Validation("email is malformed".to_string());

    if value.chars().any(|c| c.is_whitespace()) {
        return Err(malformed());
    }
    let (local, domain) = value.split_once('@').ok_or_else(malformed)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(malformed());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(malformed());
    }
    Ok(())
}

/// Password shape: minimum length, at least one letter and one digit.
fn password(value: &str) -> Result<(), AccountError> {
    if value.len() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !value.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(AccountError::Validation(
            "password must contain at least one letter".to_string(),
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(AccountError::Validation(
            "password must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(register(&request("a@x.com", "abcd1234")).is_ok());
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut req = request("a@x.com", "abcd1234");
        req.first_name = "  ".to_string();
        assert!(matches!(
            register(&req).unwrap_err(),
            AccountError::Validation(_)
        ));
    }

    #[test]
    fn test_malformed_emails_rejected() {
        for bad in ["", "ax.com", "@x.com", "a@", "a@xcom", "a@x.com ", "a@.com", "a@x.com.", "a@@x.com"] {
            let req = request(bad, "abcd1234");
            assert!(register(&req).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_password_shape_enforced() {
        // Too short
        assert!(register(&request("a@x.com", "a1")).is_err());
        // No digit
        assert!(register(&request("a@x.com", "abcdefgh")).is_err());
        // No letter
        assert!(register(&request("a@x.com", "12345678")).is_err());
        // Letter + digit + length is fine
        assert!(register(&request("a@x.com", "abcd1234")).is_ok());
    }
}
