use crate::{error::DiscoveryError, path::AbsolutePathBuf};

/// One segment of a compiled pattern, used only for the prefix/partial match
/// that drives directory-descent pruning. `**` is treated specially since it
/// can consume any remaining depth.
enum Segment {
    DoubleStar,
    One(wax::Glob<'static>),
}

/// A compiled, reusable representation of one relative glob pattern.
/// Supports full-path matching and a conservative
/// "could this directory be an ancestor of a match" check used to prune
/// descent.
pub struct CompiledMatcher {
    relative: String,
    glob: wax::Glob<'static>,
    segments: Vec<Segment>,
}

impl CompiledMatcher {
    /// Compiles `relative` (forward-slash, no leading `/`, no `..`
    /// segments) with dot-files enabled so explicit patterns can reach
    /// hidden files.
    pub fn compile(relative: &str) -> Result<Self, DiscoveryError> {
        let glob = wax::Glob::new(relative)
            .map(|g| g.into_owned())
            .map_err(|e| DiscoveryError::bad_pattern(relative, e))?;

        let segments = relative
            .split('/')
            .map(|seg| {
                if seg == "**" {
                    Ok(Segment::DoubleStar)
                } else {
                    wax::Glob::new(seg)
                        .map(|g| Segment::One(g.into_owned()))
                        .map_err(|e| DiscoveryError::bad_pattern(relative, e))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            relative: relative.to_string(),
            glob,
            segments,
        })
    }

    pub fn relative_pattern(&self) -> &str {
        &self.relative
    }

    /// Full match against a relative (forward-slash) path.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.glob.is_match(relative_path)
    }

    /// True if `relative_dir` could be an ancestor of some path this
    /// pattern matches. Deliberately conservative: once a `**` segment is
    /// reached the directory is always accepted, since `**` can consume any
    /// remaining depth. Over-accepting only costs an extra directory read;
    /// it never drops a real match, which is the direction pruning should
    /// err on.
    pub fn matches_prefix(&self, relative_dir: &str) -> bool {
        if relative_dir.is_empty() {
            return true;
        }
        for (i, dir_segment) in relative_dir.split('/').enumerate() {
            match self.segments.get(i) {
                None => return false,
                Some(Segment::DoubleStar) => return true,
                Some(Segment::One(glob)) => {
                    if !glob.is_match(dir_segment) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Strips `base_path` off the front of an absolute, forward-slash pattern,
/// yielding the relative pattern the matcher factory compiles.
pub(crate) fn relative_to_base(absolute_pattern: &str, base_path: &AbsolutePathBuf) -> String {
    let base = base_path.to_slash_string();
    absolute_pattern
        .strip_prefix(base.as_str())
        .unwrap_or(absolute_pattern)
        .trim_start_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_match() {
        let m = CompiledMatcher::compile("a/*.js").unwrap();
        assert!(m.matches("a/x.js"));
        assert!(!m.matches("a/b/x.js"));
    }

    #[test]
    fn double_star_full_match() {
        let m = CompiledMatcher::compile("**/*.js").unwrap();
        assert!(m.matches("x.js"));
        assert!(m.matches("a/b/x.js"));
        assert!(!m.matches("x.ts"));
    }

    #[test_case::test_case("a/**", "a" => true ; "directory itself is a prefix")]
    #[test_case::test_case("a/**", "a/b" => true ; "double star accepts any depth")]
    #[test_case::test_case("a/**", "b" => false ; "unrelated top level directory is pruned")]
    #[test_case::test_case("**/*.js", "anything" => true ; "leading double star accepts everything")]
    #[test_case::test_case("a/b/*.js", "a" => true ; "partial literal prefix matches")]
    #[test_case::test_case("a/b/*.js", "a/c" => false ; "literal segment mismatch is pruned")]
    #[test_case::test_case("a/b/*.js", "a/b/c" => false ; "deeper than the pattern can specify")]
    fn prefix_match(pattern: &str, dir: &str) -> bool {
        let m = CompiledMatcher::compile(pattern).unwrap();
        m.matches_prefix(dir)
    }

    #[test]
    fn strips_base_path_prefix() {
        let base = AbsolutePathBuf::new("/r/a").unwrap();
        assert_eq!(relative_to_base("/r/a/**/*.js", &base), "**/*.js");
        assert_eq!(relative_to_base("/r/a/**", &base), "**");
    }
}
