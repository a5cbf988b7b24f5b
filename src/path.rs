use std::path::PathBuf;

use camino::Utf8PathBuf;
use path_clean::PathClean;
use path_slash::PathExt as _;

use crate::error::PathError;

/// An absolute, cleaned (no `.`/`..` segments) UTF-8 path.
///
/// This is a deliberately small stand-in for the absolute-path newtype a
/// larger codebase would reach for (e.g. `turbopath::AbsoluteSystemPathBuf`):
/// we only need "absolute" and "clean" as invariants, never a borrowed/owned
/// split, so a single owned type keeps the budget proportionate to this
/// crate's scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbsolutePathBuf(Utf8PathBuf);

impl AbsolutePathBuf {
    /// Builds an absolute path from an already-absolute string, cleaning
    /// `.`/`..` segments along the way. Does not touch the filesystem.
    pub fn new(path: impl AsRef<str>) -> Result<Self, PathError> {
        let raw = path.as_ref();
        let cleaned: PathBuf = PathBuf::from(raw).clean();
        if !cleaned.is_absolute() {
            return Err(PathError::NotAbsolute(raw.to_string()));
        }
        let utf8 = Utf8PathBuf::try_from(cleaned)
            .map_err(|e| PathError::NotUtf8(e.to_string()))?;
        Ok(Self(utf8))
    }

    /// Resolves `relative` against `self`, cleaning the result. `relative`
    /// may itself contain `..` segments (e.g. a pattern's static prefix
    /// resolved against `cwd`); the result is still required to be absolute.
    pub fn join(&self, relative: &str) -> Result<Self, PathError> {
        if relative.is_empty() {
            return Ok(self.clone());
        }
        Self::new(format!("{}/{relative}", self.0))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The path re-expressed with forward-slash separators, for feeding
    /// into the glob matcher regardless of the host platform's native
    /// separator.
    pub fn to_slash_string(&self) -> String {
        self.0
            .as_std_path()
            .to_slash_lossy()
            .into_owned()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name()
    }
}

impl std::fmt::Display for AbsolutePathBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AbsolutePathBuf {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
