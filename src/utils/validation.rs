use crate::utils::error::{CampusError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CampusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CampusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CampusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CampusError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks used by entity validation: an address needs an `@`.
pub fn looks_like_email(value: &str) -> bool {
    value.contains('@')
}

/// Folds a list of violated constraints into a single validation error.
pub fn errors_to_result(subject: &str, errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CampusError::validation(format!(
            "{}: {}",
            subject,
            errors.join("; ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("paths.data", "data/").is_ok());
        assert!(validate_path("paths.data", "").is_err());
        assert!(validate_path("paths.data", "da\0ta").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("registry.max_credits", 24, 1, 60).is_ok());
        assert!(validate_range("registry.max_credits", 0, 1, 60).is_err());
        assert!(validate_range("registry.max_credits", 61, 1, 60).is_err());
    }

    #[test]
    fn test_errors_to_result() {
        assert!(errors_to_result("Student 1", vec![]).is_ok());
        let err = errors_to_result("Student 1", vec!["a".into(), "b".into()]).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Student 1: a; b");
    }

    #[test]
    fn test_non_empty_string() {
        assert!(validate_non_empty_string("app.name", "Campus").is_ok());
        assert!(validate_non_empty_string("app.name", "   ").is_err());
    }
}
