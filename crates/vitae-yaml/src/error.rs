//! Loader errors, each pointing at the offending spot in the source.

use std::path::PathBuf;
use thiserror::Error;
use vitae_source_map::SourceInfo;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning YAML text into a [`SourceNode`](crate::SourceNode) tree.
///
/// All of them are fatal for the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The YAML scanner or parser rejected the text
    #[error("{message}")]
    Syntax {
        message: String,
        location: SourceInfo,
    },

    /// A mapping declares the same key twice; `location` is the second occurrence
    #[error("duplicate key '{key}'")]
    DuplicateKey {
        key: String,
        location: SourceInfo,
        first: SourceInfo,
    },

    /// A mapping key is a sequence or mapping
    #[error("mapping keys must be scalars")]
    NonScalarKey { location: SourceInfo },

    /// `*alias` references are not resolved
    #[error("aliases are not supported")]
    UnsupportedAlias { location: SourceInfo },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Where the problem is, when the error came from parsing text.
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::Syntax { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::NonScalarKey { location }
            | Error::UnsupportedAlias { location } => Some(location),
            Error::Io { .. } => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Syntax { .. } => "V-1-1",
            Error::DuplicateKey { .. } => "V-1-2",
            Error::NonScalarKey { .. } => "V-1-3",
            Error::UnsupportedAlias { .. } => "V-1-4",
            Error::Io { .. } => "V-1-5",
        }
    }
}
