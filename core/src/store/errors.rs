use std::path::PathBuf;

use thiserror::Error;

use super::format::Format;

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

/// Failure inside a format's parse or serialize call.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    /// `.inf`, `-.inf` and `.nan` have no place in the document tree.
    #[error("non-finite number {value} at '{key}' is not supported")]
    NonFinite { key: String, value: String },
    /// A sequence or mapping used as a mapping key.
    #[error("mapping under '{key}' has a non-scalar key")]
    ComplexKey { key: String },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Error type for configuration file operations.
///
/// Path lookups never produce one of these; only file access, the codec,
/// and typed reads through [`Configuration::get_as`] do.
///
/// [`Configuration::get_as`]: super::Configuration::get_as
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be stat'ed when the store was opened.
    #[error("couldn't open config file {path}: is the path correct? does the file exist?")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the file failed.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not a valid document in the bound format.
    #[error("failed to parse {format} config at {path}: {source}")]
    Parse {
        path: PathBuf,
        format: Format,
        #[source]
        source: CodecError,
    },

    /// The tree could not be encoded in the bound format.
    #[error("failed to serialize config as {format}: {source}")]
    Serialize {
        format: Format,
        #[source]
        source: CodecError,
    },

    /// A present value did not have the shape the caller asked for.
    #[error("value at '{key}' has unexpected shape: {source}")]
    Convert {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
