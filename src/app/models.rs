use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Represents the final configuration after merging presets and CLI args.
///
/// Built once per run and never mutated while the tree is being walked.
#[derive(Debug, Clone)]
pub struct MinifyConfig {
    pub source_root: PathBuf,
    pub target_root: PathBuf,
    /// Inserted after the opening marker of every minified file. Empty disables it.
    pub banner: String,
    pub minify_extensions: BTreeSet<String>,
    pub excluded_extensions: BTreeSet<String>,
    /// Globs matched against the path relative to `source_root`.
    pub ignore_patterns: Vec<String>,
    pub respect_ignore_files: bool,
    /// Base names that are never handed to the dispatcher.
    pub skip_names: Vec<String>,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("./"),
            target_root: PathBuf::from("./dist/"),
            banner: String::new(),
            minify_extensions: ["inc", "php", "phtml"].map(String::from).into(),
            excluded_extensions: ["md"].map(String::from).into(),
            ignore_patterns: Vec::new(),
            respect_ignore_files: false,
            skip_names: vec!["..".to_string(), ".DS_Store".to_string()],
        }
    }
}

impl MinifyConfig {
    pub fn builder() -> MinifyConfigBuilder {
        MinifyConfigBuilder::default()
    }
}

/// Fluent construction of a [`MinifyConfig`]; extension lists are lowercased here.
#[derive(Debug, Default)]
pub struct MinifyConfigBuilder {
    config: MinifyConfig,
}

impl MinifyConfigBuilder {
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.config.source_root = source.into();
        self
    }

    pub fn target(mut self, target: impl Into<PathBuf>) -> Self {
        self.config.target_root = target.into();
        self
    }

    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.config.banner = banner.into();
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.minify_extensions = normalize_extensions(extensions);
        self
    }

    pub fn exclusions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.excluded_extensions = normalize_extensions(extensions);
        self
    }

    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.config.ignore_patterns = patterns;
        self
    }

    pub fn respect_ignore_files(mut self, enabled: bool) -> Self {
        self.config.respect_ignore_files = enabled;
        self
    }

    pub fn build(self) -> MinifyConfig {
        self.config
    }
}

/// Trims, strips quotes and a leading dot, lowercases, drops empties.
pub fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| {
            ext.as_ref()
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim_start_matches('.')
                .to_lowercase()
        })
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// "This directory": emitted before any child of the directory.
    DirectoryMarker,
    /// The directory itself, emitted once all of its descendants were visited.
    Directory,
    File,
}

/// A single node discovered during the walk.
#[derive(Debug, Clone)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    /// Lowercase, without the dot. Empty for directories and extensionless files.
    pub extension: String,
}

impl FsEntry {
    pub fn new(path: &Path, kind: EntryKind) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = match kind {
            EntryKind::File => path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default(),
            _ => String::new(),
        };
        Self {
            path: path.to_path_buf(),
            name,
            kind,
            extension,
        }
    }
}

/// What the dispatcher did with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreatedDir,
    /// The marker's target directory was already present.
    ExistingDir,
    Minified,
    Copied,
    Skipped,
    PassedOver,
}

/// Source path to target path, in the order entries were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a mapping, replacing the value if the source was seen before.
    pub fn insert(&mut self, source: String, target: String) {
        match self.index.get(&source) {
            Some(&pos) => self.entries[pos].1 = target,
            None => {
                self.index.insert(source.clone(), self.entries.len());
                self.entries.push((source, target));
            }
        }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.index
            .get(source)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.get(source).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (source, target) in &self.entries {
            map.serialize_entry(source, target)?;
        }
        map.end()
    }
}

/// Per-action counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub directories: usize,
    pub minified: usize,
    pub copied: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, action: Action) {
        match action {
            Action::CreatedDir | Action::ExistingDir => self.directories += 1,
            Action::Minified => self.minified += 1,
            Action::Copied => self.copied += 1,
            Action::Skipped => self.skipped += 1,
            Action::PassedOver => {}
        }
    }
}
