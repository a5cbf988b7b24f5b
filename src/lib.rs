//! Configuration-aware file discovery for a lint driver.
//!
//! Given user path patterns (literal files, literal directories, or globs)
//! and a working directory, [`find_files`] resolves them to a deduplicated
//! set of absolute file paths, consulting a pluggable [`ConfigProvider`] to
//! decide which files and directories to skip.

mod classify;
mod error;
mod group;
mod matcher;
mod path;
mod provider;
mod reconcile;
mod walk;

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{info, warn};

pub use crate::{
    error::{DiscoveryError, PathError, Result},
    path::AbsolutePathBuf,
    provider::ConfigProvider,
};

/// Discovery-relevant options.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub cwd: AbsolutePathBuf,
    pub glob_input_paths: bool,
    pub error_on_unmatched_pattern: bool,
}

/// Resolves `patterns` to a deduplicated set of absolute file paths. Runs
/// one async walk per search group concurrently; the first group (in
/// seeding/insertion order) whose unmatched patterns trigger a
/// reconciliation failure determines the user-facing error.
pub async fn find_files<P: ConfigProvider>(
    patterns: &[String],
    options: &DiscoveryOptions,
    provider: &P,
) -> Result<Vec<AbsolutePathBuf>> {
    if patterns.is_empty() {
        return Ok(Vec::new());
    }

    let mut classified = Vec::with_capacity(patterns.len());
    for raw in patterns {
        classified.push(classify::classify(raw, &options.cwd, options.glob_input_paths).await?);
    }

    let grouping = group::group_patterns(classified, &options.cwd)?;

    if options.error_on_unmatched_pattern {
        if let Some(first_missing) = grouping.missing_patterns.first() {
            return Err(DiscoveryError::NoFilesFound {
                pattern: first_missing.clone(),
                glob_enabled: options.glob_input_paths,
            });
        }
    }

    let matcher_sets = grouping
        .groups
        .iter()
        .map(|group| {
            group
                .normalized_patterns
                .iter()
                .map(|absolute_pattern| {
                    let relative = matcher::relative_to_base(absolute_pattern, &group.base_path);
                    matcher::CompiledMatcher::compile(&relative)
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    info!(groups = grouping.groups.len(), "walking search groups");

    let walk_results = join_all(
        grouping
            .groups
            .iter()
            .zip(matcher_sets.iter())
            .map(|(group, matchers)| walk::walk_group(group, matchers, provider)),
    )
    .await;

    let mut all_files = grouping.literal_files;
    let mut raised: Option<DiscoveryError> = None;

    for ((group, matchers), result) in grouping
        .groups
        .iter()
        .zip(matcher_sets.iter())
        .zip(walk_results)
    {
        match result {
            Ok(outcome) => {
                all_files.extend(outcome.files);
                if !outcome.unmatched.is_empty()
                    && options.error_on_unmatched_pattern
                    && raised.is_none()
                {
                    let first_unmatched = *outcome.unmatched.iter().min().expect("non-empty");
                    let err = reconcile::reconcile(
                        group,
                        &matchers[first_unmatched],
                        &group.raw_patterns[first_unmatched],
                        options.glob_input_paths,
                    )
                    .await?;
                    raised = Some(err);
                }
            }
            Err(e) => {
                warn!(base = %group.base_path, error = %e, "group walk failed");
                if raised.is_none() {
                    raised = Some(e);
                }
            }
        }
    }

    if let Some(err) = raised {
        return Err(err);
    }

    let mut seen = HashSet::new();
    all_files.retain(|f| seen.insert(f.clone()));

    Ok(all_files)
}
