pub type RetouchResult<T> = Result<T, RetouchError>;

#[derive(thiserror::Error, Debug)]
pub enum RetouchError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported backend: {0}")]
    UnsupportedBackend(String),

    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("render execution error: {0}")]
    RenderExecution(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetouchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported_backend(msg: impl Into<String>) -> Self {
        Self::UnsupportedBackend(msg.into())
    }

    pub fn unknown_identifier(msg: impl Into<String>) -> Self {
        Self::UnknownIdentifier(msg.into())
    }

    pub fn render_execution(msg: impl Into<String>) -> Self {
        Self::RenderExecution(msg.into())
    }

    /// Errors raised before the renderer was touched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownIdentifier(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
