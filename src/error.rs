/// Errors raised while setting up a scene or addressing its bodies.
///
/// Nothing on the per-frame path returns these; they only come out of
/// construction and out of focus requests naming a body that doesn't exist.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// A construction parameter was rejected (non-positive radius, NaN, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A body id outside `[0, count)`.
    #[error("body {id} is out of range (scene has {count} satellites)")]
    OutOfRange { id: usize, count: usize },
}

/// Errors that can occur when loading, saving, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),

    #[error(transparent)]
    Invalid(#[from] SceneError),
}

/// Shorthand for checking construction parameters.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), SceneError> {
    if condition {
        Ok(())
    } else {
        Err(SceneError::Configuration(message()))
    }
}
