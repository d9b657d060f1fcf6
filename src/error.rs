// ============================================================================
// spark-mvvm - Errors
// The single error type shared by the reactive graph and the compiler
// ============================================================================

use thiserror::Error;

/// Everything that can go wrong while binding data to a template.
///
/// None of these are recovered internally: a failure while resolving a
/// binding path means the template and the data disagree, and it surfaces
/// to whoever triggered the evaluation (construction, a write, or an input
/// event).
#[derive(Error, Debug)]
pub enum BindError {
    #[error("cannot resolve `{segment}` in binding path `{path}`")]
    PathResolution { path: String, segment: String },

    #[error("invalid binding path `{path}`")]
    InvalidPath { path: String },

    #[error("unknown directive `v-{name}`")]
    UnknownDirective { name: String },

    #[error("property `{key}` is not proxied by this view model")]
    UnknownProperty { key: String },

    #[error("view model data must be an object, found {found}")]
    InvalidData { found: &'static str },

    #[error("invalid mount configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T, E = BindError> = std::result::Result<T, E>;
