use async_recursion::async_recursion;
use tracing::debug;

use crate::{error::DiscoveryError, group::SearchGroup, matcher::CompiledMatcher, path::AbsolutePathBuf};

/// Component F: when a group finishes with unmatched patterns and
/// `error_on_unmatched_pattern` is set, re-walks the group for the *first*
/// unmatched pattern only, with configuration disabled entirely (no
/// `is_directory_ignored`, no `get_config`), to tell apart "nothing at all
/// matched" from "everything that matched was ignored".
///
/// This is a deliberately separate walk rather than a reuse of the first
/// pass's state: the first pass stops maintaining `unmatched` as soon as it
/// empties, which would otherwise have already discarded the evidence this
/// second pass needs.
pub async fn reconcile(
    group: &SearchGroup,
    matcher: &CompiledMatcher,
    raw_pattern: &str,
    glob_enabled: bool,
) -> Result<DiscoveryError, DiscoveryError> {
    debug!(
        base = %group.base_path,
        pattern = matcher.relative_pattern(),
        "reconciling unmatched pattern"
    );

    let any_ignored_match = any_file_matches(&group.base_path, String::new(), matcher).await?;

    Ok(if any_ignored_match {
        DiscoveryError::AllFilesIgnored {
            pattern: raw_pattern.to_string(),
        }
    } else {
        DiscoveryError::NoFilesFound {
            pattern: raw_pattern.to_string(),
            glob_enabled,
        }
    })
}

#[async_recursion]
async fn any_file_matches(
    base: &AbsolutePathBuf,
    relative_dir: String,
    matcher: &CompiledMatcher,
) -> Result<bool, DiscoveryError> {
    let absolute_dir = base.join(&relative_dir)?;
    let mut entries = match tokio::fs::read_dir(absolute_dir.as_str()).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(DiscoveryError::io(absolute_dir.to_string(), e)),
    };

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
            continue;
        };
        let child_relative = if relative_dir.is_empty() {
            name.to_string()
        } else {
            format!("{relative_dir}/{name}")
        };

        let (is_dir, is_file) = if file_type.is_symlink() {
            let child_absolute = base.join(&child_relative)?;
            match tokio::fs::metadata(child_absolute.as_str()).await {
                Ok(meta) => (meta.is_dir(), meta.is_file()),
                Err(_) => (false, false),
            }
        } else {
            (file_type.is_dir(), file_type.is_file())
        };

        if is_dir {
            if !matcher.matches_prefix(&child_relative) {
                continue;
            }
            if any_file_matches(base, child_relative, matcher).await? {
                return Ok(true);
            }
        } else if is_file && matcher.matches(&child_relative) {
            return Ok(true);
        }
    }

    Ok(false)
}
