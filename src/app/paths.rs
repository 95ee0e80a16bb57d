//! Translation of source-rooted paths into target-rooted paths.
//!
//! Paths are handled as strings with `/` as the only separator so that the
//! prefix substitution behaves the same on every platform.

use crate::app::error::{MinifyError, Result};
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

pub const SEPARATOR: char = '/';

/// Rewrites platform separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    if MAIN_SEPARATOR != SEPARATOR {
        path.replace(MAIN_SEPARATOR, "/")
    } else {
        path.to_string()
    }
}

/// Normalizes separators and guarantees exactly one trailing `/`.
///
/// An empty root is the current directory.
pub fn normalize_root(root: &str) -> String {
    if root.is_empty() {
        return "./".to_string();
    }
    let mut out = normalize_separators(root);
    while out.len() > 1 && out.ends_with("//") {
        out.pop();
    }
    if !out.ends_with(SEPARATOR) {
        out.push(SEPARATOR);
    }
    out
}

pub fn path_to_string(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Like [`path_to_string`], but refuses names that are not valid UTF-8.
pub fn utf8_path_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(normalize_separators)
        .ok_or_else(|| MinifyError::NonUtf8Path(path.to_path_buf()))
}

/// Resolves `.` and `..` components without touching the filesystem.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Maps `source_path` below `source_root` onto `target_root`.
///
/// Falls back to the normalized `source_path` when it does not start with the root.
pub fn to_target_path(source_path: &str, source_root: &str, target_root: &str) -> String {
    let path = normalize_separators(source_path);
    let source_root = normalize_root(source_root);
    let target_root = normalize_root(target_root);

    match path.strip_prefix(&source_root) {
        Some(rest) => format!("{target_root}{rest}"),
        None => path,
    }
}

/// Holds both roots pre-normalized for repeated mapping during a run.
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_root: String,
    target_root: String,
}

impl PathMapper {
    pub fn new(source_root: &Path, target_root: &Path) -> Self {
        Self {
            source_root: normalize_root(&source_root.to_string_lossy()),
            target_root: normalize_root(&target_root.to_string_lossy()),
        }
    }

    pub fn map(&self, source_path: &str) -> String {
        to_target_path(source_path, &self.source_root, &self.target_root)
    }

    /// Target directory materialized for the directory at `dir`.
    ///
    /// The directory is mapped as `<dir>/.` and the trailing self-reference is dropped,
    /// so the source root itself maps onto the target root.
    pub fn map_directory(&self, dir: &str) -> String {
        let marker = format!("{}/.", normalize_separators(dir).trim_end_matches(SEPARATOR));
        let mapped = self.map(&marker);
        parent_of(&mapped)
    }
}

/// Lexical parent of a `/`-separated path; `"."` when there is none.
pub fn parent_of(path: &str) -> String {
    let trimmed = if path.len() > 1 {
        path.trim_end_matches(SEPARATOR)
    } else {
        path
    };
    match trimmed.rfind(SEPARATOR) {
        Some(0) => "/".to_string(),
        Some(pos) => trimmed[..pos].to_string(),
        None => ".".to_string(),
    }
}
