use thiserror::Error;

/// Closed set of failure kinds the transport layer matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    StorageTimeout,
    StorageUnavailable,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("storage timeout: {0}")]
    Timeout(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            ServiceError::Timeout(_) => ErrorKind::StorageTimeout,
            ServiceError::Unavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 1001,
            ErrorKind::NotFound => 1002,
            ErrorKind::AlreadyExists => 1003,
            ErrorKind::StorageTimeout => 1101,
            ErrorKind::StorageUnavailable => 1102,
        }
    }

    /// Caller can fix the request; everything else is an infrastructure failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::NotFound | ErrorKind::AlreadyExists)
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_codes_are_stable() {
        assert_eq!(ServiceError::Validation("x".into()).code(), 1001);
        assert_eq!(ServiceError::not_found("subscription").kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::AlreadyExists("x".into()).code(), 1003);
        assert_eq!(ServiceError::Timeout("x".into()).kind(), ErrorKind::StorageTimeout);
        assert_eq!(ServiceError::Unavailable("x".into()).code(), 1102);
    }

    #[test]
    fn storage_failures_are_not_client_errors() {
        assert!(ServiceError::Validation("x".into()).is_client_error());
        assert!(ServiceError::not_found("subscription").is_client_error());
        assert!(!ServiceError::Timeout("x".into()).is_client_error());
        assert!(!ServiceError::Unavailable("x".into()).is_client_error());
    }

    #[test]
    fn model_validation_maps_to_validation() {
        let e: ServiceError = models::errors::ModelError::Validation("price must be positive".into()).into();
        assert_eq!(e.kind(), ErrorKind::Validation);
        assert!(e.to_string().contains("price"));
    }
}
