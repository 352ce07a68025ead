use serde::Serialize;

/// Longest accepted value for any repository field
pub const MAX_FIELD_LENGTH: usize = 255;

/// A single rejected input field with an operator-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check_field(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", field)));
    } else if value.chars().count() > MAX_FIELD_LENGTH {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", field, MAX_FIELD_LENGTH),
        ));
    }
}

/// Validate the (already trimmed) fields of a new repository.
///
/// Every invalid field is reported, not just the first one.
pub fn validate_new_repository(
    name: &str,
    registry: &str,
    repository: &str,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    check_field(&mut errors, "name", name);
    check_field(&mut errors, "registry", registry);
    check_field(&mut errors, "repository", repository);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
