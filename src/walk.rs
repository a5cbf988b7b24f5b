use std::collections::HashSet;

use async_recursion::async_recursion;
use tracing::{debug, trace};

use crate::{
    error::DiscoveryError,
    group::SearchGroup,
    matcher::CompiledMatcher,
    path::AbsolutePathBuf,
    provider::{ConfigAwareFilter, ConfigProvider},
};

/// The result of walking one search group.
pub struct GroupWalkResult {
    pub files: Vec<AbsolutePathBuf>,
    /// Indices into the group's pattern lists that never matched an
    /// accepted file. Empty means every pattern in the group was satisfied.
    pub unmatched: Vec<usize>,
}

/// Walks `group.base_path`, pruning directories the configuration provider
/// rejects and filtering files by both pattern match and configuration
/// presence. `matchers` is parallel to `group.normalized_patterns`/
/// `group.raw_patterns`.
pub async fn walk_group<P: ConfigProvider>(
    group: &SearchGroup,
    matchers: &[CompiledMatcher],
    provider: &P,
) -> Result<GroupWalkResult, DiscoveryError> {
    debug!(base = %group.base_path, patterns = matchers.len(), "starting group walk");
    let filter = ConfigAwareFilter::new(provider);
    filter.load_directory(&group.base_path).await?;

    let mut unmatched: HashSet<usize> = (0..matchers.len()).collect();
    let mut files = Vec::new();

    walk_dir(&group.base_path, String::new(), matchers, &filter, &mut unmatched, &mut files).await?;

    Ok(GroupWalkResult {
        files,
        unmatched: unmatched.into_iter().collect(),
    })
}

#[async_recursion]
async fn walk_dir<'p, P: ConfigProvider>(
    base: &AbsolutePathBuf,
    relative_dir: String,
    matchers: &[CompiledMatcher],
    filter: &ConfigAwareFilter<'p, P>,
    unmatched: &mut HashSet<usize>,
    out: &mut Vec<AbsolutePathBuf>,
) -> Result<(), DiscoveryError> {
    let absolute_dir = base.join(&relative_dir)?;
    let mut entries = tokio::fs::read_dir(absolute_dir.as_str())
        .await
        .map_err(|e| DiscoveryError::io(absolute_dir.to_string(), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DiscoveryError::io(absolute_dir.to_string(), e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| DiscoveryError::io(absolute_dir.to_string(), e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            // non-UTF-8 entry names can't be expressed as AbsolutePathBuf; skip them.
            continue;
        };
        let child_relative = if relative_dir.is_empty() {
            name.to_string()
        } else {
            format!("{relative_dir}/{name}")
        };
        let child_absolute = base.join(&child_relative)?;
        let (is_dir, is_file) = resolve_kind(&child_absolute, file_type).await;

        if is_dir {
            // Prune if no matcher's prefix check accepts this directory.
            if !matchers.iter().any(|m| m.matches_prefix(&child_relative)) {
                trace!(dir = %child_relative, "pruned: no matcher prefix");
                continue;
            }
            // The root (relative_dir == "") is handled by never being
            // evaluated here — this branch only runs for children, so the
            // group's own base_path is never pruned by its own ancestors'
            // configuration.
            if filter.directory_ignored(&child_absolute).await? {
                trace!(dir = %child_relative, "pruned: ignored by provider");
                continue;
            }
            walk_dir(base, child_relative, matchers, filter, unmatched, out).await?;
        } else if is_file {
            let config = filter.file_config(&child_absolute).await?;

            let matched = if !unmatched.is_empty() {
                let mut hit = false;
                for (i, m) in matchers.iter().enumerate() {
                    if m.matches(&child_relative) && config.is_some() {
                        unmatched.remove(&i);
                        hit = true;
                    }
                }
                hit
            } else {
                matchers.iter().any(|m| m.matches(&child_relative))
            };

            if matched && config.is_some() {
                out.push(child_absolute);
            }
        }
        // other file types (sockets, fifos, broken symlinks, ...) are
        // neither files nor directories and are simply skipped.
    }

    Ok(())
}

/// `DirEntry::file_type` is an `lstat`: a symlink reports neither
/// `is_dir()` nor `is_file()`. Follow it with `tokio::fs::metadata` to
/// decide how to treat it, the way `turborepo-globwalk` follows symlinks
/// rather than silently dropping them from the walk. A broken symlink
/// resolves to `(false, false)` and is skipped like any other dead entry.
async fn resolve_kind(path: &AbsolutePathBuf, file_type: std::fs::FileType) -> (bool, bool) {
    if file_type.is_symlink() {
        match tokio::fs::metadata(path.as_str()).await {
            Ok(meta) => (meta.is_dir(), meta.is_file()),
            Err(_) => (false, false),
        }
    } else {
        (file_type.is_dir(), file_type.is_file())
    }
}
