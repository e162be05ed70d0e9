/// Convenience result type used across mediagraph.
pub type FlowResult<T> = Result<T, FlowError>;

/// Top-level error taxonomy used by workflow-building APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// A conversion was asked to do something its input cannot support: wrong data kind, missing
    /// encoder, incompatible model family, or an unsupported combination.
    #[error("workflow generation misuse: {0}")]
    Misuse(String),

    /// Invalid configuration values or configuration documents.
    #[error("configuration error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowError {
    /// Build a [`FlowError::Misuse`] value.
    pub fn misuse(msg: impl Into<String>) -> Self {
        Self::Misuse(msg.into())
    }

    /// Build a [`FlowError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FlowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for the misuse category.
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse(_))
    }
}

/// Fail with [`FlowError::Misuse`] unless `cond` holds. `msg` runs only on failure.
pub(crate) fn misuse_unless(cond: bool, msg: impl FnOnce() -> String) -> FlowResult<()> {
    if cond {
        return Ok(());
    }
    let msg = msg();
    tracing::debug!(reason = %msg, "workflow generation assertion failed");
    Err(FlowError::Misuse(msg))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
