use thiserror::Error;

/// Errors that can occur while constructing or resolving an [`crate::path::AbsolutePathBuf`].
#[derive(Debug, Error)]
pub enum PathError {
    #[error("path `{0}` is not absolute")]
    NotAbsolute(String),
    #[error("path `{0}` is not valid UTF-8")]
    NotUtf8(String),
}

/// The three-tier error design of the discovery engine: user input errors
/// (shown to the end user), an internal control-flow error that never
/// escapes `find_files`, and system errors passed through unchanged.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// One user pattern produced nothing, and nothing that would have
    /// matched was ignored either.
    #[error("No files matching the pattern \"{pattern}\" were found{}", no_files_hint(*glob_enabled))]
    NoFilesFound { pattern: String, glob_enabled: bool },

    /// One user pattern produced matches, but every one of them was ignored
    /// by the configuration provider.
    #[error("All files matching the pattern \"{pattern}\" are ignored")]
    AllFilesIgnored { pattern: String },

    #[error("bad glob pattern `{pattern}`: {reason}")]
    BadPattern { pattern: String, reason: String },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("I/O error at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn no_files_hint(glob_enabled: bool) -> &'static str {
    if glob_enabled {
        ""
    } else {
        " (glob matching of input paths is disabled)"
    }
}

impl DiscoveryError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        DiscoveryError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn provider<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        DiscoveryError::Provider(Box::new(err))
    }

    pub(crate) fn bad_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        DiscoveryError::BadPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
