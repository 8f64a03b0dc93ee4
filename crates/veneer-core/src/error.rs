use thiserror::Error;

pub type Result<T> = std::result::Result<T, VeneerError>;

/// Errors raised at the call boundary of the veneer crates.
///
/// Everything below the boundary (accessor installation, depth expansion)
/// is infallible; a rejected call leaves no side effect behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VeneerError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl VeneerError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether this is an [`VeneerError::InvalidArgument`].
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
