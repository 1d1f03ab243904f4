use thiserror::Error;

/// Business-rule outcomes of the enrollment registry. Each variant is an
/// expected, recoverable result the caller can branch on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Cannot enroll inactive student: {reg_no}")]
    InactiveStudent { reg_no: String },

    #[error("Student {reg_no} is already enrolled in course {course_code}")]
    DuplicateEnrollment { reg_no: String, course_code: String },

    #[error(
        "Enrollment would exceed maximum credit limit. Current: {current}, Course: {candidate}, Limit: {limit}"
    )]
    CreditLimitExceeded {
        current: u32,
        candidate: u32,
        limit: u32,
    },
}

impl RegistryError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CampusError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Import error in {file} at line {line}: {message}")]
    ImportError {
        file: String,
        line: u64,
        message: String,
    },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BusinessRule,
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CampusError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Registry(_) => ErrorCategory::BusinessRule,
            Self::ValidationError { .. } | Self::ImportError { .. } | Self::NotFound { .. } => {
                ErrorCategory::Input
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::BusinessRule => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Registry(e) => format!("Enrollment rejected: {}", e),
            Self::ImportError { file, line, .. } => {
                format!("Could not read record on line {} of {}", line, file)
            }
            Self::NotFound { entity, key } => format!("No {} matches '{}'", entity, key),
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Registry(RegistryError::InactiveStudent { .. }) => {
                "Reactivate the student before enrolling"
            }
            Self::Registry(RegistryError::DuplicateEnrollment { .. }) => {
                "The student already holds this course; drop it first to re-enroll"
            }
            Self::Registry(RegistryError::CreditLimitExceeded { .. }) => {
                "Drop a course in the same semester or raise registry.max_credits"
            }
            Self::Registry(RegistryError::InvalidArgument { .. }) => {
                "Check the student and course identifiers"
            }
            Self::ImportError { .. } | Self::CsvError(_) => {
                "Fix the offending CSV row and import again"
            }
            Self::ValidationError { .. } => "Correct the listed fields and retry",
            Self::NotFound { .. } => "List the available records and pick an existing key",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the TOML configuration file"
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Verify the data and backup directories exist and are writable"
            }
            Self::SerializationError(_) => "Report this output failure",
        }
    }
}

pub type Result<T> = std::result::Result<T, CampusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_errors_are_low_severity() {
        let err: CampusError = RegistryError::InactiveStudent {
            reg_no: "R1".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::BusinessRule);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.user_friendly_message().contains("R1"));
    }

    #[test]
    fn test_credit_limit_message_carries_totals() {
        let err = RegistryError::CreditLimitExceeded {
            current: 22,
            candidate: 3,
            limit: 24,
        };
        assert_eq!(
            err.to_string(),
            "Enrollment would exceed maximum credit limit. Current: 22, Course: 3, Limit: 24"
        );
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = CampusError::ConfigError {
            message: "bad".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
