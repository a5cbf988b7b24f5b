use std::collections::HashMap;

use crate::{
    classify::{contains_glob_metachar, ClassifiedPattern},
    error::PathError,
    path::AbsolutePathBuf,
};

/// A set of patterns sharing a base path, walked as a unit.
#[derive(Debug, Clone)]
pub struct SearchGroup {
    pub base_path: AbsolutePathBuf,
    /// Absolute, forward-slash form. Parallel to `raw_patterns`.
    pub normalized_patterns: Vec<String>,
    /// As the user typed it. Parallel to `normalized_patterns`.
    pub raw_patterns: Vec<String>,
}

pub struct GroupingResult {
    pub groups: Vec<SearchGroup>,
    pub literal_files: Vec<AbsolutePathBuf>,
    pub missing_patterns: Vec<String>,
}

/// The longest leading path of `absolute_pattern` (forward-slash, absolute)
/// composed of segments with no glob metacharacters, and the remaining
/// relative pattern.
pub(crate) fn static_prefix_and_relative(absolute_pattern: &str) -> (String, String) {
    let segments: Vec<&str> = absolute_pattern.split('/').collect();
    let split_at = segments
        .iter()
        .position(|seg| contains_glob_metachar(seg))
        .unwrap_or(segments.len());

    let base = segments[..split_at].join("/");
    let relative = segments[split_at..].join("/");
    (base, relative)
}

/// Buckets classified patterns into search groups by static prefix. Seeds
/// an (initially empty) group at `cwd` so that globs whose base is `cwd`
/// share a single walk.
pub fn group_patterns(
    classified: Vec<ClassifiedPattern>,
    cwd: &AbsolutePathBuf,
) -> Result<GroupingResult, PathError> {
    let mut order: Vec<AbsolutePathBuf> = vec![cwd.clone()];
    let mut groups: HashMap<AbsolutePathBuf, SearchGroup> = HashMap::new();
    groups.insert(
        cwd.clone(),
        SearchGroup {
            base_path: cwd.clone(),
            normalized_patterns: Vec::new(),
            raw_patterns: Vec::new(),
        },
    );

    let mut literal_files = Vec::new();
    let mut missing_patterns = Vec::new();

    for pattern in classified {
        match pattern {
            ClassifiedPattern::LiteralFile { absolute, .. } => literal_files.push(absolute),
            ClassifiedPattern::LiteralDirectory { absolute, raw } => {
                // The user explicitly chose this directory, so no
                // ancestor's configuration may block descent into it. The
                // relative pattern is "**" so every file underneath it is a
                // candidate, subject only to the directory's own config.
                push_into_group(&mut groups, &mut order, absolute.clone(), |entry| {
                    entry
                        .normalized_patterns
                        .push(format!("{}/**", absolute.to_slash_string()));
                    entry.raw_patterns.push(raw);
                });
            }
            ClassifiedPattern::Glob { normalized, raw } => {
                let (base, _relative) = static_prefix_and_relative(&normalized);
                let base_path = AbsolutePathBuf::new(&base)?;
                push_into_group(&mut groups, &mut order, base_path, |entry| {
                    entry.normalized_patterns.push(normalized);
                    entry.raw_patterns.push(raw);
                });
            }
            ClassifiedPattern::Missing(raw) => missing_patterns.push(raw),
        }
    }

    let groups = order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .filter(|g| !g.normalized_patterns.is_empty())
        .collect();

    Ok(GroupingResult {
        groups,
        literal_files,
        missing_patterns,
    })
}

fn push_into_group(
    groups: &mut HashMap<AbsolutePathBuf, SearchGroup>,
    order: &mut Vec<AbsolutePathBuf>,
    base_path: AbsolutePathBuf,
    fill: impl FnOnce(&mut SearchGroup),
) {
    let entry = groups.entry(base_path.clone()).or_insert_with(|| {
        order.push(base_path.clone());
        SearchGroup {
            base_path,
            normalized_patterns: Vec::new(),
            raw_patterns: Vec::new(),
        }
    });
    fill(entry);
}
