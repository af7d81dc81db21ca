//! Type conversions for DispatchError

use super::types::DispatchError;

impl From<tokio::time::error::Elapsed> for DispatchError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        DispatchError::Timeout(err.to_string())
    }
}
