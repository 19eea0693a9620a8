//! Input validation for values written to the store.

/// A value rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email address {0}")]
    InvalidEmail(String),

    #[error("{field} is too long ({actual} chars, max {max})")]
    TooLong { field: String, max: usize, actual: usize },

    #[error("{0} cannot be empty")]
    Empty(String),
}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for a countdown name.
pub const MAX_COUNTDOWN_NAME_LENGTH: usize = 100;

/// Maximum allowed length for a location query.
pub const MAX_LOCATION_LENGTH: usize = 200;

/// Maximum allowed length for a countdown message template.
pub const MAX_TEMPLATE_LENGTH: usize = 500;

/// Canonical form of an email address used as a user key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check that `email` looks like a deliverable `local@domain.tld` address.
///
/// Mail is only ever answered to addresses that pass this check.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let invalid = |reason: &str| Err(ValidationError::InvalidEmail(format!("{email}: {reason}")));

    let Some((local, domain)) = email.rsplit_once('@') else {
        return invalid("no @");
    };
    if local.is_empty() || local.contains('@') {
        return invalid("bad local part");
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("contains whitespace");
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return invalid("domain needs a dot-separated name");
    }

    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual: len,
        });
    }

    Ok(())
}

/// Validate a countdown name.
pub fn validate_countdown_name(name: &str) -> Result<(), ValidationError> {
    validate_text("countdown name", name, MAX_COUNTDOWN_NAME_LENGTH)
}

/// Validate a free-text location query.
pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    validate_text("location", location, MAX_LOCATION_LENGTH)
}

/// Validate a countdown message template.
pub fn validate_template(template: &str) -> Result<(), ValidationError> {
    validate_text("message", template, MAX_TEMPLATE_LENGTH)
}
