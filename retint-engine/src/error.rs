//! Engine errors

use alloc::string::String;

use retint_dom::DomError;

/// Errors raised by the recoloring engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A document operation failed
    #[error(transparent)]
    Dom(#[from] DomError),
    /// A `preset-N` attribute that could not be used
    #[error("invalid preset in `{slot}`: {reason}")]
    InvalidPreset { slot: String, reason: String },
    /// A host attribute with an unusable value
    #[error("invalid value `{value}` for attribute `{name}`")]
    InvalidAttribute { name: String, value: String },
    /// No preset with this name is configured
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
    /// The engine has not been started, or was stopped
    #[error("engine is not started")]
    NotStarted,
}
