use sea_orm::error::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// `NotFound` for a record of the given kind, e.g. `not_found("Product", id)`.
    pub fn not_found(kind: &str, id: Uuid) -> Self {
        ServiceError::NotFound(format!("{} {} not found", kind, id))
    }

    /// A required field was missing or cleared in a change-set.
    pub fn missing_field(field: &str) -> Self {
        ServiceError::ValidationError(format!("{} is required", field))
    }
}
