use std::path::Path;

use crate::{error::PathError, path::AbsolutePathBuf};

/// The classification of one user-supplied pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedPattern {
    LiteralFile {
        absolute: AbsolutePathBuf,
        raw: String,
    },
    LiteralDirectory {
        absolute: AbsolutePathBuf,
        raw: String,
    },
    /// `normalized` is the absolute, forward-slash form of the pattern.
    Glob { normalized: String, raw: String },
    Missing(String),
}

/// Characters that, outside of an escaping backslash, mark a path segment as
/// glob-forming under the shell-style dialect this crate supports: `**`
/// (recursive), `*` (within-segment wildcard), `?` (single character),
/// `[...]` (character class), `{a,b}` (alternation), and a leading `!`
/// (segment negation).
const GLOB_METACHARS: [char; 6] = ['*', '?', '[', '{', '!', '('];

/// True if `segment` contains an unescaped glob metacharacter.
pub(crate) fn contains_glob_metachar(segment: &str) -> bool {
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if GLOB_METACHARS.contains(&c) {
            return true;
        }
    }
    false
}

fn is_glob(normalized: &str) -> bool {
    normalized.split('/').any(contains_glob_metachar)
}

/// Forward-slash normalization used only to decide whether a pattern is a
/// glob; the path kept for filesystem stats stays in the host's native form.
///
/// A backslash immediately followed by a glob metacharacter is an escape,
/// not a path separator, and must survive normalization so
/// `contains_glob_metachar`'s own escape handling has something to skip —
/// otherwise `a\*b` (a literal, escaped `*`) would have its backslash
/// silently converted away and get misread as the glob `a/*b`.
fn normalize_to_forward_slash(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek().copied() {
                Some(next) if next == '\\' || GLOB_METACHARS.contains(&next) => {
                    out.push('\\');
                    out.push(next);
                    chars.next();
                }
                _ => out.push('/'),
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Resolves `raw` against `cwd`: absolute inputs are used as-is (after
/// cleaning), relative ones are joined onto `cwd`.
fn resolve_against(cwd: &AbsolutePathBuf, raw: &str) -> Result<AbsolutePathBuf, PathError> {
    if Path::new(raw).is_absolute() {
        AbsolutePathBuf::new(raw)
    } else {
        cwd.join(raw)
    }
}

/// Classifies a single raw pattern against `cwd`.
pub async fn classify(
    raw: &str,
    cwd: &AbsolutePathBuf,
    glob_input_paths: bool,
) -> Result<ClassifiedPattern, PathError> {
    let normalized = normalize_to_forward_slash(raw);
    let candidate = resolve_against(cwd, raw)?;

    match tokio::fs::metadata(candidate.as_str()).await {
        Ok(meta) if meta.is_file() => Ok(ClassifiedPattern::LiteralFile {
            absolute: candidate,
            raw: raw.to_string(),
        }),
        Ok(meta) if meta.is_dir() => Ok(ClassifiedPattern::LiteralDirectory {
            absolute: candidate,
            raw: raw.to_string(),
        }),
        Ok(_) => Ok(ClassifiedPattern::Missing(raw.to_string())),
        Err(_not_found_or_otherwise) => {
            if glob_input_paths && is_glob(&normalized) {
                let absolute_normalized = resolve_against(cwd, &normalized)?;
                Ok(ClassifiedPattern::Glob {
                    normalized: absolute_normalized.to_slash_string(),
                    raw: raw.to_string(),
                })
            } else {
                Ok(ClassifiedPattern::Missing(raw.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case::test_case("*.js" => true ; "star")]
    #[test_case::test_case("a?b" => true ; "question mark")]
    #[test_case::test_case("[abc]" => true ; "character class")]
    #[test_case::test_case("{a,b}" => true ; "alternation")]
    #[test_case::test_case("!foo" => true ; "negation")]
    #[test_case::test_case("plain" => false ; "no metachars")]
    #[test_case::test_case("a\\*b" => false ; "escaped star is not a metachar")]
    fn detects_glob_metachars(segment: &str) -> bool {
        contains_glob_metachar(segment)
    }

    #[tokio::test]
    async fn missing_path_without_metachars_is_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let cwd = AbsolutePathBuf::new(tmp.path().to_str().unwrap()).unwrap();
        let result = classify("does/not/exist", &cwd, true).await.unwrap();
        assert!(matches!(result, ClassifiedPattern::Missing(_)));
    }

    #[tokio::test]
    async fn missing_path_with_metachars_is_glob_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let cwd = AbsolutePathBuf::new(tmp.path().to_str().unwrap()).unwrap();
        let result = classify("**/*.js", &cwd, true).await.unwrap();
        assert!(matches!(result, ClassifiedPattern::Glob { .. }));
    }

    #[tokio::test]
    async fn glob_pattern_is_missing_when_glob_input_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let cwd = AbsolutePathBuf::new(tmp.path().to_str().unwrap()).unwrap();
        let result = classify("**/*.js", &cwd, false).await.unwrap();
        assert!(matches!(result, ClassifiedPattern::Missing(_)));
    }

    #[tokio::test]
    async fn existing_file_is_literal() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "hi").unwrap();
        let cwd = AbsolutePathBuf::new(tmp.path().to_str().unwrap()).unwrap();
        let result = classify("a.txt", &cwd, true).await.unwrap();
        assert!(matches!(result, ClassifiedPattern::LiteralFile { .. }));
    }

    #[tokio::test]
    async fn escaped_metachar_is_not_classified_as_glob() {
        let tmp = tempfile::tempdir().unwrap();
        let cwd = AbsolutePathBuf::new(tmp.path().to_str().unwrap()).unwrap();
        // "a\*b" names (an escaped, literal) "a*b", which doesn't exist on
        // disk; it must fall through to `missing`, not get picked up as the
        // glob `a/*b` because normalization ate the escaping backslash.
        let result = classify("a\\*b", &cwd, true).await.unwrap();
        assert!(matches!(result, ClassifiedPattern::Missing(_)));
    }

    #[tokio::test]
    async fn existing_directory_is_literal() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        let cwd = AbsolutePathBuf::new(tmp.path().to_str().unwrap()).unwrap();
        let result = classify("sub", &cwd, true).await.unwrap();
        assert!(matches!(result, ClassifiedPattern::LiteralDirectory { .. }));
    }
}
