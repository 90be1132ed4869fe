//! Domain errors

use thiserror::Error;

use crate::domain::MenuId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The manifest does not have the expected shape. `locator` points at the
    /// offending node, e.g. `menus[2].children[0]`.
    #[error("{locator}: {reason}")]
    StructuralError { locator: String, reason: String },

    #[error("Manifest content is empty")]
    EmptyManifest,

    #[error("Manifest is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Manifest exceeds the upload limit of {limit} bytes")]
    ManifestTooLarge { limit: usize },

    #[error("Menu name already exists under parent {parent_id}: {name}")]
    MenuNameAlreadyExists { parent_id: MenuId, name: String },

    #[error("Menu not found: {0}")]
    MenuNotFound(MenuId),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Transaction error: {0}")]
    TransactionError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn structural(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StructuralError {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Failures of the transactional envelope itself. These are never
    /// absorbed per node; they abort the import and roll everything back.
    pub fn is_transaction_failure(&self) -> bool {
        matches!(self, Self::TransactionError(_))
    }

    /// Errors raised while reading the manifest, before any store access.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::StructuralError { .. }
                | Self::EmptyManifest
                | Self::InvalidJson(_)
                | Self::ManifestTooLarge { .. }
        )
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_message_carries_locator() {
        let err = DomainError::structural("menus[1]", "menu is missing a name");
        assert_eq!(err.to_string(), "menus[1]: menu is missing a name");
        assert!(err.is_rejected_input());
        assert!(!err.is_transaction_failure());
    }

    #[test]
    fn test_only_transaction_errors_abort() {
        assert!(DomainError::TransactionError("connection reset".into()).is_transaction_failure());
        assert!(!DomainError::DatabaseError("deadlock".into()).is_transaction_failure());
        assert!(!DomainError::MenuNameAlreadyExists { parent_id: 0, name: "A".into() }
            .is_transaction_failure());
    }
}
