//! # Validation Utilities
//!
//! Input checks applied at the request boundary. Each returns a message fit
//! to show the caller.

/// Validate that a string's character count lies within `min..=max`.
pub fn validate_length(value: &str, min: usize, max: usize, field_name: &str) -> Result<(), String> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        Err(format!("{} must be between {} and {} characters", field_name, min, max))
    } else {
        Ok(())
    }
}

/// Validate minimum length.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate email format (basic shape check: `local@domain.tld`).
pub fn validate_email(email: &str) -> Result<(), String> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err("Invalid email format".to_string())
    }
}

/// Validate an absolute http(s) URL with a non-empty host.
pub fn validate_http_url(url: &str, field_name: &str) -> Result<(), String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !url.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(format!("{} must be a valid http(s) URL", field_name)),
    }
}
