//! Custom `validator` rules shared by the request types.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use validator::ValidationError;

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// 3 to 30 characters of ASCII letters, digits and underscore
pub fn username(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(3..=30).contains(&len) {
        return Err(rule(
            "username_length",
            "Username must be between 3 and 30 characters",
        ));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(rule(
            "username_charset",
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(())
}

/// At least one lowercase letter, one uppercase letter and one digit
pub fn password_strength(value: &str) -> Result<(), ValidationError> {
    let lower = value.chars().any(|c| c.is_ascii_lowercase());
    let upper = value.chars().any(|c| c.is_ascii_uppercase());
    let digit = value.chars().any(|c| c.is_ascii_digit());

    if lower && upper && digit {
        Ok(())
    } else {
        Err(rule(
            "password_strength",
            "Password must contain at least one lowercase letter, one uppercase letter, and one number",
        ))
    }
}

pub fn in_future(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value > Utc::now() {
        Ok(())
    } else {
        Err(rule("in_future", "Scheduled date must be in the future"))
    }
}

/// Both bounds optional; when both are present `from` must be strictly before `to`
pub fn date_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (from, to) {
        (Some(from), Some(to)) if from >= to => {
            Err(rule("date_range", "From date must be before to date"))
        }
        _ => Ok(()),
    }
}
