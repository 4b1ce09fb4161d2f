// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path normalization and root-relative path helpers.
//!
//! Local paths are compared byte-for-byte after normalization, so every
//! caller that persists or looks up a `local_folder` / `local_root` must
//! route it through [`normalize_local_path`] first.

use std::path::{Component, Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
pub fn expand_user(path: &Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(stripped),
        None => path.to_path_buf(),
    }
}

/// Resolves `path` to an absolute, lexically-normalized form.
///
/// This does not touch the filesystem: `.` and `..` components are
/// collapsed syntactically, matching the byte-for-byte comparison the
/// binding registry relies on rather than a symlink-resolving realpath.
pub fn normalize_local_path(path: &Path) -> PathBuf {
    let expanded = expand_user(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().unwrap_or_default().join(expanded)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Returns `true` if `descendant` is a strict path-prefix descendant of `ancestor`.
pub fn is_strict_descendant(ancestor: &Path, descendant: &Path) -> bool {
    descendant != ancestor && descendant.starts_with(ancestor)
}

/// Converts an OS-separated path, relative to `root`, into the canonical
/// `/`-separated, leading-slash root-relative form used in `path` /
/// `remote_path` fields.
pub fn to_root_relative(root: &Path, absolute: &Path) -> Option<String> {
    let rel = absolute.strip_prefix(root).ok()?;
    Some(to_root_relative_str(rel))
}

fn to_root_relative_str(rel: &Path) -> String {
    if rel.as_os_str().is_empty() {
        return "/".to_string();
    }
    let mut out = String::from("/");
    let parts: Vec<_> = rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
    out.push_str(&parts.join("/"));
    out
}

/// Sanitizes a remote document name into a filesystem-safe local name by
/// replacing characters that are illegal (or awkward) on common filesystems.
pub fn safe_filename(name: &str) -> String {
    const ILLEGAL: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    let trimmed = name.trim();
    let sanitized: String = trimmed
        .chars()
        .map(|c| if ILLEGAL.contains(&c) { '-' } else { c })
        .collect();
    if sanitized.is_empty() {
        "-".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
#[path = "path_util_tests.rs"]
mod tests;
