use super::ApiError;

/// Validates the `name` query parameter before any tier is consulted.
/// Missing and blank names are rejected identically.
pub fn validate_name(name: Option<&str>) -> Result<&str, ApiError> {
    let Some(name) = name else {
        return Err(ApiError::validation("Missing required parameter: name"));
    };

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Name cannot be empty"));
    }

    if trimmed.len() > 100 {
        return Err(ApiError::validation("Name must be 100 characters or less"));
    }

    Ok(trimmed)
}
