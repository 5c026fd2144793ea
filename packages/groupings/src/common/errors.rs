use thiserror::Error;

use super::auth::{AuthError, INSUFFICIENT_PRIVILEGES};

/// Errors that abort a whole membership operation.
///
/// Per-person problems (unknown people, ineligible self-opts, absent members)
/// never show up here; they are reported inside result records.
#[derive(Error, Debug)]
pub enum GroupingsError {
    #[error("{}", INSUFFICIENT_PRIVILEGES)]
    AccessDenied,

    #[error("Invalid group path: {0}")]
    InvalidPath(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl GroupingsError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, GroupingsError::AccessDenied)
    }
}

impl From<AuthError> for GroupingsError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPrivileges => GroupingsError::AccessDenied,
            AuthError::InternalError(e) => GroupingsError::Store(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_uses_fixed_message() {
        let err: GroupingsError = AuthError::InsufficientPrivileges.into();
        assert!(err.is_access_denied());
        assert_eq!(err.to_string(), INSUFFICIENT_PRIVILEGES);
    }

    #[test]
    fn test_internal_auth_error_becomes_store_error() {
        let err: GroupingsError = AuthError::InternalError(anyhow::anyhow!("timeout")).into();
        assert!(matches!(err, GroupingsError::Store(_)));
    }
}
