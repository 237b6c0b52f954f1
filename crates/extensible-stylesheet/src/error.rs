//! Error types for loading style descriptions.
//!
//! Building a [`StyleSheet`](crate::StyleSheet) never fails on its own: the only
//! error it can return is whatever the registrar raises, passed through as-is.
//! The types here cover the convenience constructors that read YAML or JSON
//! before handing the result to a registrar.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when a style description cannot be read or parsed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("failed to read stylesheet {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid YAML or JSON.
    #[error("failed to parse stylesheet{}: {message}", location(path))]
    Parse {
        /// Source file, if the content came from disk.
        path: Option<PathBuf>,
        /// Message from the underlying parser.
        message: String,
    },

    /// The document parsed, but its top level is not a mapping.
    #[error("stylesheet{} must be a mapping at the top level, found {found}", location(path))]
    NotAMapping {
        path: Option<PathBuf>,
        found: &'static str,
    },

    /// The file extension is not one of [`STYLESHEET_EXTENSIONS`](crate::STYLESHEET_EXTENSIONS).
    #[error("unsupported stylesheet extension: {}", path.display())]
    UnsupportedExtension { path: PathBuf },
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

/// Error returned by constructors that load a description before registering it.
///
/// The registrar's error is carried unchanged in [`SourceError::Register`].
#[derive(Debug, Error)]
pub enum SourceError<E> {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("style registration failed: {0}")]
    Register(E),
}

impl<E> SourceError<E> {
    /// Returns the registrar's error, if that is what failed.
    pub fn into_register_error(self) -> Option<E> {
        match self {
            SourceError::Register(err) => Some(err),
            SourceError::Load(_) => None,
        }
    }
}
