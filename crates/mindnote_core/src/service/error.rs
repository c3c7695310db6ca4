//! Error taxonomy surfaced by services.

use crate::model::validation::ValidationError;
use crate::model::{EntityKind, RecordId};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

const INTERNAL_PUBLIC_MESSAGE: &str = "an unexpected error occurred";

/// Service error for note/task/taxonomy use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced record does not exist.
    NotFound { entity: EntityKind, id: RecordId },
    /// Caller input is missing a required value or carries an unusable one.
    Validation(ValidationError),
    /// Store failure not anticipated by the operation.
    Internal(RepoError),
    /// Write succeeded but the read-back did not match.
    InconsistentState(&'static str),
}

impl ServiceError {
    pub fn not_found(entity: EntityKind, id: RecordId) -> Self {
        Self::NotFound { entity, id }
    }

    /// Stable machine-readable code for logs and transport mapping.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Internal(_) | Self::InconsistentState(_) => "internal",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::InconsistentState(_))
    }

    /// Message safe to hand to an external caller.
    ///
    /// Internal failures collapse into one opaque message; the detailed
    /// `Display` output is meant for logs only.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_PUBLIC_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found with id {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Internal(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Internal(err) => Some(err),
            Self::NotFound { .. } | Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Internal(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn repo_not_found_keeps_entity_and_id() {
        let err = ServiceError::from(RepoError::NotFound {
            entity: EntityKind::Category,
            id: 12,
        });
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.public_message(), "category not found with id 12");
    }

    #[test]
    fn unexpected_repo_errors_are_opaque_to_callers() {
        let err = ServiceError::from(RepoError::InvalidData("bad row".to_string()));
        assert!(err.is_internal());
        assert!(!err.public_message().contains("bad row"));
        assert!(err.to_string().contains("bad row"));
    }
}
