// src/traverse/walk.rs
// =============================================================================
// This module finds the Markdown documents under the content root.
//
// How it works:
// 1. Start with the content root in a queue
// 2. Read the directory, sorted by name so runs are reproducible
// 3. Queue subdirectories, collect `.md` files, log everything else
// 4. Repeat until the queue is empty
//
// Hidden entries (names starting with '.') are ignored.
//
// Rust concepts:
// - VecDeque: Double-ended queue for breadth-first walking
// =============================================================================

use anyhow::{bail, Context, Result};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What the walk found.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Markdown files, breadth-first, sorted within each directory
    pub documents: Vec<PathBuf>,
    /// Files that are not Markdown; noted but never scanned
    pub other_files: Vec<PathBuf>,
}

/// Walks `root` breadth-first and collects Markdown documents.
///
/// Fails only if `root` itself is not a readable directory; unreadable
/// subdirectories are logged and skipped.
pub fn discover_documents(root: &Path) -> Result<Discovery> {
    if !root.is_dir() {
        bail!("Content root is not a directory: {}", root.display());
    }

    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    let mut discovery = Discovery::default();
    let mut first = true;

    while let Some(dir) = queue.pop_front() {
        let entries = match read_sorted(&dir) {
            Ok(entries) => entries,
            Err(e) if first => return Err(e),
            Err(e) => {
                warn!("Skipping unreadable directory {}: {:#}", dir.display(), e);
                continue;
            }
        };
        first = false;

        for (path, is_dir) in entries {
            if is_dir {
                queue.push_back(path);
            } else if path.extension().is_some_and(|ext| ext == "md") {
                discovery.documents.push(path);
            } else {
                debug!("Skipping non-Markdown file: {}", path.display());
                discovery.other_files.push(path);
            }
        }
    }

    Ok(discovery)
}

// Lists a directory's visible entries sorted by file name
fn read_sorted(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(Result::ok)
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .map(|e| {
            let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
            (e.path(), is_dir)
        })
        .collect();
    entries.sort();
    Ok(entries)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a VecDeque and not recursion?
//    - push_back + pop_front gives breadth-first order: all of a
//      directory's files come before anything in its subdirectories
//    - Deep trees cannot overflow the stack
//
// 2. What does `Err(e) if first => return Err(e)` do?
//    - A match guard: the arm only applies while we are on the root
//    - An unreadable root is fatal, an unreadable subdirectory is not
//
// 3. Why sort the entries?
//    - read_dir order depends on the filesystem; sorting makes two runs
//      over the same tree report the same things in the same order
// -----------------------------------------------------------------------------
