/// Result alias used across the crate.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors produced while configuring or running a filter.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// Invalid parameters, rectangle, or engine options. Raised before any buffer is touched.
    #[error("validation error: {0}")]
    Validation(String),

    /// A scratch or shadow allocation could not be satisfied.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// A row-range worker failed; nothing was published.
    #[error("worker error: {0}")]
    Worker(String),

    /// Options could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilterError {
    /// Build a [`FilterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FilterError::ResourceExhausted`].
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Build a [`FilterError::Worker`].
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Build a [`FilterError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
