use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("movie", 1).is_ok());
        assert!(validate_id("movie", 12345).is_ok());
        assert!(validate_id("movie", 0).is_err());
        assert!(validate_id("review", -1).is_err());
    }
}
