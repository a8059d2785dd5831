use crate::error::ApiError;

/// Required string field: rejects empty and whitespace-only values
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_argument(format!("{} is required", field)));
    }
    Ok(())
}

/// Record ids are assigned from 1 upwards
pub fn require_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::invalid_argument("id must be a positive integer"));
    }
    Ok(())
}

/// Optional string field of a sparse update: blank means "leave unchanged"
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
