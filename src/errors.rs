//! Error types for capability composition.
//!
//! The taxonomy is split along the three call boundaries: composing bundles
//! onto a target (`ComposeError`), dispatching an operation on a target
//! (`InvokeError`), and loading declarative manifests (`ManifestError`).

use thiserror::Error;

/// Errors raised while composing bundles onto a target.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The target cannot accept new operation bindings.
    ///
    /// Raised before any bundle is applied; the target is left unmodified.
    #[error("invalid composition target: {reason}")]
    InvalidTarget { reason: String },

    /// A bundle id could not be resolved by the registry.
    #[error("unknown bundle: {id}")]
    UnknownBundle { id: String },
}

/// Errors raised while dispatching an operation on a target.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No operation with this name is bound on the target.
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    /// The operation required an argument that was not supplied.
    #[error("operation {operation} missing argument at position {index}")]
    MissingArgument { operation: String, index: usize },

    /// An argument slot held the wrong kind of payload.
    #[error("operation {operation} expected {expected}")]
    TypeMismatch { operation: String, expected: String },

    /// The operation body failed.
    #[error("operation failed: {message}")]
    Failed { message: String },
}

/// Errors raised while loading or enforcing bundle manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Reading a manifest file or directory failed.
    #[error("failed to read manifest at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The manifest YAML could not be parsed.
    #[error(transparent)]
    Parse(#[from] serde_yaml::Error),

    /// A registered bundle does not provide every operation its manifest declares.
    #[error("bundle {id} does not satisfy its manifest (missing: {})", .missing.join(", "))]
    Unsatisfied { id: String, missing: Vec<String> },
}
