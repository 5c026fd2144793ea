use thiserror::Error;

/// Fixed, caller-visible message for every privilege failure.
pub const INSUFFICIENT_PRIVILEGES: &str = "Insufficient Privileges";

/// Authorization errors for groupings operations
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{}", INSUFFICIENT_PRIVILEGES)]
    InsufficientPrivileges,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
