//! Recursive search over a shared-drive folder tree.

use std::collections::HashSet;

use futures::future::BoxFuture;
use tracing::warn;

use crate::drive::DriveClient;
use crate::error::SearchError;
use crate::models::DriveItem;

/// Defensive bound on recursion depth. Shared drives are acyclic by
/// construction, but a tree this deep means something is wrong.
pub const MAX_DEPTH: usize = 32;

/// Recursively search a folder tree for items whose name contains `term`,
/// case-insensitively, excluding names ending in one of `excluded_exts`.
///
/// Results come back in pre-order discovery order: a matching folder before
/// its own matching children, siblings in listing order. A listing failure
/// anywhere in the traversal aborts the whole search; results collected up to
/// that point are discarded with the error.
pub async fn search(
    client: &DriveClient,
    root_folder_id: &str,
    term: &str,
    excluded_exts: &[String],
) -> Result<Vec<DriveItem>, SearchError> {
    let needle = term.to_lowercase();
    let mut results = Vec::new();
    let mut visited = HashSet::new();
    visit(
        client,
        root_folder_id.to_string(),
        &needle,
        excluded_exts,
        &mut results,
        &mut visited,
        0,
    )
    .await?;
    Ok(results)
}

fn visit<'a>(
    client: &'a DriveClient,
    folder_id: String,
    needle: &'a str,
    excluded_exts: &'a [String],
    results: &'a mut Vec<DriveItem>,
    visited: &'a mut HashSet<String>,
    depth: usize,
) -> BoxFuture<'a, Result<(), SearchError>> {
    Box::pin(async move {
        if depth > MAX_DEPTH {
            return Err(SearchError::DepthExceeded(MAX_DEPTH));
        }
        if !visited.insert(folder_id.clone()) {
            // A folder reachable twice violates the acyclic-tree assumption.
            warn!(%folder_id, "folder already visited, skipping");
            return Ok(());
        }

        let children = client.list_children(&folder_id).await?;

        for item in children {
            let lower = item.name.to_lowercase();
            let is_folder = item.is_folder();
            let child_id = item.id.clone();

            if lower.contains(needle) && !is_excluded(&lower, excluded_exts) {
                results.push(item);
            }

            if is_folder {
                visit(
                    client,
                    child_id,
                    needle,
                    excluded_exts,
                    results,
                    visited,
                    depth + 1,
                )
                .await?;
            }
        }

        Ok(())
    })
}

fn is_excluded(lower_name: &str, excluded_exts: &[String]) -> bool {
    excluded_exts.iter().any(|ext| lower_name.ends_with(ext))
}
