use thiserror::Error;

/// Local, pre-network rejection of a proposed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    Empty,
    #[error("name is already used in this list")]
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("remote write failed: {0}")]
    RemoteWriteFailed(String),
    #[error("load failed: {0}")]
    LoadFailed(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl ListError {
    pub(crate) fn remote_write(err: &anyhow::Error) -> Self {
        Self::RemoteWriteFailed(format!("{err:#}"))
    }

    pub(crate) fn load(err: &anyhow::Error) -> Self {
        Self::LoadFailed(format!("{err:#}"))
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Short message suitable for showing next to the list.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::Empty) => "Please enter a name.".to_string(),
            Self::Validation(ValidationError::Duplicate) => {
                "That name is already in the list.".to_string()
            }
            Self::RemoteWriteFailed(_) => "Could not save the change; please retry.".to_string(),
            Self::LoadFailed(_) => "Could not load the list; reload to try again.".to_string(),
            Self::InvalidOperation(_) => {
                "That item is no longer in the list; the view was refreshed.".to_string()
            }
        }
    }
}
