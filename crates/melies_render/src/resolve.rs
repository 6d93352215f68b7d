//! Locating render output files.
//!
//! The render tool nests its output under a quality- and resolution-
//! dependent directory tree, so the produced file is found by name with a
//! recursive walk instead of by predicting the layout.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Find the first file named `file_name` under `root`.
///
/// Unreadable directories and dangling entries are skipped rather than
/// treated as failures; a missing file is simply `None`.
pub fn find_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
}
