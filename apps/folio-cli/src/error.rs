//! # CLI Error Type
//!
//! Everything the terminal front end can report. Parse and input errors are
//! printed and the session continues; startup errors end the process.

use folio_core::CoreError;
use folio_sync::SyncError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unknown command `{0}` (type `help` for the list)")]
    UnknownCommand(String),

    /// Right command, wrong arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Input(#[from] CoreError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Errors the session loop reports and moves past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CliError::UnknownCommand(_) | CliError::Usage(_) | CliError::Input(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ValidationError;

    #[test]
    fn test_recoverable_errors() {
        assert!(CliError::UnknownCommand("buy".into()).is_recoverable());
        assert!(CliError::Usage("remove <book-id>").is_recoverable());
        assert!(CliError::Input(CoreError::Validation(ValidationError::Required {
            field: "title".into()
        }))
        .is_recoverable());
        assert!(!CliError::Sync(SyncError::Timeout).is_recoverable());
    }

    #[test]
    fn test_usage_message() {
        assert_eq!(
            CliError::Usage("inc <book-id>").to_string(),
            "usage: inc <book-id>"
        );
    }
}
