//! Error taxonomy shared by every crate in the workspace.
//!
//! Each failure in the access layer keeps its kind from the point where it
//! was raised all the way up to the caller; components enrich the detail
//! text with the resource that triggered the failure but never downgrade or
//! reclassify an error.

use thiserror::Error;

/// Errors surfaced by the Open Supply Hub access layer.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable credential could be found in any of the attempted sources.
    ///
    /// The message names the sources that were tried, never their values.
    #[error("no valid credential found; attempted {sources}")]
    Authentication {
        /// Human-readable list of the sources attempted.
        sources: String,
    },

    /// A resource descriptor was malformed or registered twice.
    #[error("registry configuration error: {detail}")]
    Configuration {
        /// What was wrong with the registration.
        detail: String,
    },

    /// A caller referenced a resource name that was never registered.
    #[error("unknown resource '{name}'")]
    UnknownResource {
        /// The name the caller asked for.
        name: String,
    },

    /// An input parameter violated the resource's declared schema.
    #[error("invalid parameter '{field}': {detail}")]
    Validation {
        /// The offending parameter name.
        field: String,
        /// Every constraint the value violated, spelled out.
        detail: String,
    },

    /// A response payload could not be interpreted under any known context.
    #[error("cannot map response: {detail}")]
    Mapping {
        /// Why the payload was rejected.
        detail: String,
    },

    /// The upstream API reported a transport or HTTP-level failure.
    ///
    /// Passed through with the original status and detail, never masked as
    /// a mapping or validation failure.
    #[error("upstream API error (HTTP {status}): {detail}")]
    Upstream {
        /// The HTTP status code returned by the API.
        status: u16,
        /// Response detail as reported upstream.
        detail: String,
    },
}

impl Error {
    /// Enrich the error detail with the resource that triggered it.
    ///
    /// The error kind is preserved; only the human-readable detail gains the
    /// resource name.
    pub fn in_resource(self, resource: &str) -> Self {
        match self {
            Self::Validation { field, detail } => Self::Validation {
                field,
                detail: format!("resource '{resource}': {detail}"),
            },
            Self::Mapping { detail } => Self::Mapping {
                detail: format!("resource '{resource}': {detail}"),
            },
            Self::Upstream { status, detail } => Self::Upstream {
                status,
                detail: format!("resource '{resource}': {detail}"),
            },
            other => other,
        }
    }
}
