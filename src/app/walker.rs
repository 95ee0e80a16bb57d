use crate::app::error::Result;
use crate::app::models::{EntryKind, FsEntry};
use crate::app::paths::lexical_normalize;
use ignore::WalkBuilder;
use std::path::{self, Path, PathBuf};

/// Child-first walk over a source tree.
///
/// For every directory the walker emits a [`EntryKind::DirectoryMarker`] before
/// its children and a [`EntryKind::Directory`] once all descendants are done.
/// Sibling order is whatever the filesystem enumerates.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    skip_names: Vec<String>,
    prune: Option<PathBuf>,
    respect_ignore_files: bool,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skip_names: Vec::new(),
            prune: None,
            respect_ignore_files: false,
        }
    }

    /// Base names that are never visited; directories are not descended into.
    pub fn skip_names(mut self, names: Vec<String>) -> Self {
        self.skip_names = names;
        self
    }

    /// A subtree excluded from the walk, e.g. a target root nested in the source.
    pub fn prune(mut self, path: Option<PathBuf>) -> Self {
        self.prune = path
            .and_then(|p| path::absolute(p).ok())
            .map(|p| lexical_normalize(&p));
        self
    }

    pub fn respect_ignore_files(mut self, enabled: bool) -> Self {
        self.respect_ignore_files = enabled;
        self
    }

    /// Visits every entry; the first error from the walk or from `visit` stops it.
    ///
    /// Unparsable ignore files only produce a warning. Their valid lines still apply.
    pub fn walk<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&FsEntry) -> Result<()>,
    {
        let mut builder = WalkBuilder::new(&self.root);
        builder.standard_filters(false).hidden(false);
        if self.respect_ignore_files {
            builder
                .git_ignore(true)
                .git_exclude(true)
                .ignore(true)
                .require_git(false);
        }

        let skip_names = self.skip_names.clone();
        let prune = self.prune.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if skip_names.iter().any(|skip| *skip == name) {
                return false;
            }
            match &prune {
                Some(prune) => !is_same_path(entry.path(), prune),
                None => true,
            }
        });

        // Directories whose marker was emitted but whose subtree is still open.
        let mut open: Vec<(PathBuf, usize)> = Vec::new();

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) if is_ignore_file_error(&err) => {
                    log::warn!("Ignoring unusable ignore file: {err}");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if let Some(err) = entry.error() {
                log::warn!("Ignoring unusable ignore file: {err}");
            }
            let depth = entry.depth();
            close_finished(&mut open, depth, &mut visit)?;

            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir {
                visit(&FsEntry::new(entry.path(), EntryKind::DirectoryMarker))?;
                open.push((entry.into_path(), depth));
            } else if entry.path().is_file() {
                visit(&FsEntry::new(entry.path(), EntryKind::File))?;
            } else {
                log::debug!("Passing over special entry {}", entry.path().display());
            }
        }

        close_finished(&mut open, 0, &mut visit)
    }
}

/// Emits the resolved entry for every open directory at `depth` or deeper.
fn close_finished<F>(open: &mut Vec<(PathBuf, usize)>, depth: usize, visit: &mut F) -> Result<()>
where
    F: FnMut(&FsEntry) -> Result<()>,
{
    while let Some((_, open_depth)) = open.last() {
        if *open_depth < depth {
            break;
        }
        if let Some((dir, _)) = open.pop() {
            visit(&FsEntry::new(&dir, EntryKind::Directory))?;
        }
    }
    Ok(())
}

fn is_same_path(path: &Path, other: &Path) -> bool {
    path::absolute(path).is_ok_and(|p| lexical_normalize(&p) == other)
        || same_file::is_same_file(path, other).unwrap_or(false)
}

/// Whether a walk error came from parsing ignore files rather than from reading the tree.
fn is_ignore_file_error(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithLineNumber { err, .. }
        | ignore::Error::WithDepth { err, .. } => is_ignore_file_error(err),
        ignore::Error::Partial(errs) => !errs.is_empty() && errs.iter().all(is_ignore_file_error),
        ignore::Error::Glob { .. }
        | ignore::Error::UnrecognizedFileType(_)
        | ignore::Error::InvalidDefinition => true,
        ignore::Error::Io(_) | ignore::Error::Loop { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn collect(walker: &TreeWalker) -> Vec<(EntryKind, PathBuf)> {
        let mut seen = Vec::new();
        walker
            .walk(|entry| {
                seen.push((entry.kind, entry.path.clone()));
                Ok(())
            })
            .unwrap();
        seen
    }

    fn position(seen: &[(EntryKind, PathBuf)], kind: EntryKind, path: &Path) -> usize {
        seen.iter()
            .position(|(k, p)| *k == kind && p == path)
            .unwrap_or_else(|| panic!("{kind:?} {} not visited", path.display()))
    }

    #[test]
    fn markers_precede_children_and_directories_follow_them() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub/deep")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub/b.txt"), "b").unwrap();
        fs::write(root.join("sub/deep/c.txt"), "c").unwrap();

        let seen = collect(&TreeWalker::new(root));

        let sub = root.join("sub");
        let deep = sub.join("deep");
        let sub_marker = position(&seen, EntryKind::DirectoryMarker, &sub);
        let deep_marker = position(&seen, EntryKind::DirectoryMarker, &deep);
        let c = position(&seen, EntryKind::File, &deep.join("c.txt"));
        let b = position(&seen, EntryKind::File, &sub.join("b.txt"));
        let deep_done = position(&seen, EntryKind::Directory, &deep);
        let sub_done = position(&seen, EntryKind::Directory, &sub);

        assert_eq!(seen[0], (EntryKind::DirectoryMarker, root.to_path_buf()));
        assert!(sub_marker < deep_marker && deep_marker < c && c < deep_done);
        assert!(sub_marker < b && b < sub_done && deep_done < sub_done);
        assert_eq!(seen.last().unwrap(), &(EntryKind::Directory, root.to_path_buf()));
        position(&seen, EntryKind::File, &root.join("a.txt"));
    }

    #[test]
    fn skipped_names_and_pruned_subtrees_are_not_visited() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join(".DS_Store"), "meta").unwrap();
        fs::write(root.join("dist/old.txt"), "old").unwrap();
        fs::write(root.join("keep.txt"), "keep").unwrap();

        let walker = TreeWalker::new(root)
            .skip_names(vec![".DS_Store".to_string()])
            .prune(Some(root.join("dist")));
        let seen = collect(&walker);

        let paths: Vec<_> = seen.iter().map(|(_, p)| p.clone()).collect();
        assert!(paths.contains(&root.join("keep.txt")));
        assert!(!paths.contains(&root.join(".DS_Store")));
        assert!(!paths.iter().any(|p| p.starts_with(root.join("dist"))));
    }

    #[test]
    fn prune_path_with_parent_components_is_matched() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("proj");
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/old.txt"), "old").unwrap();
        fs::write(root.join("keep.txt"), "keep").unwrap();

        let walker = TreeWalker::new(&root).prune(Some(tmp.path().join("proj/../proj/dist")));
        let seen = collect(&walker);

        assert!(seen.iter().any(|(_, p)| *p == root.join("keep.txt")));
        assert!(!seen.iter().any(|(_, p)| p.starts_with(root.join("dist"))));
    }

    #[test]
    fn ignore_files_are_honoured_only_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join(".gitignore"), "secret.txt\n").unwrap();
        fs::write(root.join("secret.txt"), "s").unwrap();
        fs::write(root.join("public.txt"), "p").unwrap();

        let visited = |walker: &TreeWalker| -> Vec<PathBuf> {
            collect(walker).into_iter().map(|(_, p)| p).collect()
        };

        let honoured = visited(&TreeWalker::new(root).respect_ignore_files(true));
        assert!(!honoured.contains(&root.join("secret.txt")));
        assert!(honoured.contains(&root.join("public.txt")));

        let plain = visited(&TreeWalker::new(root));
        assert!(plain.contains(&root.join("secret.txt")));
    }

    #[test]
    fn malformed_ignore_file_does_not_stop_the_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join(".gitignore"), "a[\nsecret.txt\n").unwrap();
        fs::write(root.join("sub/.gitignore"), "{\n").unwrap();
        fs::write(root.join("secret.txt"), "s").unwrap();
        fs::write(root.join("sub/b.txt"), "b").unwrap();

        let seen = collect(&TreeWalker::new(root).respect_ignore_files(true));
        let paths: Vec<_> = seen.into_iter().map(|(_, p)| p).collect();
        assert!(paths.contains(&root.join("sub/b.txt")));
        assert!(!paths.contains(&root.join("secret.txt")));
    }

    #[test]
    fn ignore_file_errors_are_told_apart_from_io_errors() {
        let glob = ignore::Error::Glob {
            glob: Some("a[".to_string()),
            err: "unclosed character class".to_string(),
        };
        let io = ignore::Error::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));

        assert!(is_ignore_file_error(&glob));
        assert!(is_ignore_file_error(&ignore::Error::Partial(vec![glob.clone()])));
        assert!(!is_ignore_file_error(&io));
        assert!(!is_ignore_file_error(&ignore::Error::Partial(vec![glob, io])));
    }

    #[test]
    fn visitor_error_stops_the_walk() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();

        let mut calls = 0;
        let result = TreeWalker::new(tmp.path()).walk(|_| {
            calls += 1;
            Err(crate::app::error::MinifyError::runtime("mkdir('x')", None))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
