use crate::app::capture::ErrorCapture;
use crate::app::error::{MinifyError, Result};
use crate::app::minify::{inject_banner, Minify};
use crate::app::models::{Action, EntryKind, FsEntry, Manifest, MinifyConfig};
use crate::app::paths::{utf8_path_string, PathMapper};
use crate::app::rules::ClassificationRules;
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Performs exactly one action per walked entry and records it in the manifest.
pub struct ActionDispatcher<'a> {
    source_root: PathBuf,
    banner: &'a str,
    mapper: PathMapper,
    rules: ClassificationRules,
    minifier: &'a dyn Minify,
    capture: ErrorCapture,
    manifest: Manifest,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(config: &'a MinifyConfig, minifier: &'a dyn Minify) -> Result<Self> {
        // Roots are swapped as strings, so both must be representable.
        utf8_path_string(&config.source_root)?;
        utf8_path_string(&config.target_root)?;
        Ok(Self {
            source_root: config.source_root.clone(),
            banner: &config.banner,
            mapper: PathMapper::new(&config.source_root, &config.target_root),
            rules: ClassificationRules::new(config)?,
            minifier,
            capture: ErrorCapture::new(),
            manifest: Manifest::new(),
        })
    }

    pub fn dispatch(&mut self, entry: &FsEntry) -> Result<Action> {
        match entry.kind {
            EntryKind::DirectoryMarker => self.create_directory(entry),
            EntryKind::Directory => Ok(Action::PassedOver),
            EntryKind::File if self.is_skipped(entry) => {
                log::debug!("Skipping {}", entry.path.display());
                Ok(Action::Skipped)
            }
            EntryKind::File if self.rules.should_minify(&entry.extension) => self.minify_file(entry),
            EntryKind::File => self.copy_file(entry),
        }
    }

    /// Hands the manifest over once the walk has finished.
    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn is_skipped(&self, entry: &FsEntry) -> bool {
        if self.rules.should_exclude(&entry.extension) {
            return true;
        }
        diff_paths(&entry.path, &self.source_root)
            .is_some_and(|relative| self.rules.is_ignored(&relative))
    }

    fn create_directory(&mut self, entry: &FsEntry) -> Result<Action> {
        let source_dir = utf8_path_string(&entry.path)?;
        let target_dir = self.mapper.map_directory(&source_dir);
        let target_path = Path::new(&target_dir);

        let action = if target_path.is_dir() {
            Action::ExistingDir
        } else {
            let created = self
                .capture
                .capture(target_path, || fs::create_dir_all(target_path));
            if created.is_none() {
                return Err(self.failure(format!("mkdir('{target_dir}')")));
            }
            log::debug!("Created {}", target_dir);
            Action::CreatedDir
        };

        let key = source_dir.trim_end_matches('/');
        let key = if key.is_empty() { "/" } else { key };
        self.manifest.insert(key.to_string(), target_dir);
        Ok(action)
    }

    fn minify_file(&mut self, entry: &FsEntry) -> Result<Action> {
        let source = utf8_path_string(&entry.path)?;
        let target = self.mapper.map(&source);

        let bytes = fs::read(&entry.path).map_err(|e| MinifyError::Read(entry.path.clone(), e))?;
        let text =
            String::from_utf8(bytes).map_err(|_| MinifyError::InvalidUtf8(entry.path.clone()))?;
        let minified = self.minifier.minify(&text);
        let content = inject_banner(&minified, self.minifier.opening_marker(), self.banner);

        let target_path = Path::new(&target);
        let written = self
            .capture
            .capture(target_path, || fs::write(target_path, content.as_bytes()));
        if written.is_none() {
            return Err(self.failure(format!("write('{target}', '...')")));
        }

        log::debug!(
            "Minified {} -> {} ({} -> {} bytes)",
            source,
            target,
            text.len(),
            content.len()
        );
        self.manifest.insert(source, target);
        Ok(Action::Minified)
    }

    fn copy_file(&mut self, entry: &FsEntry) -> Result<Action> {
        let source = utf8_path_string(&entry.path)?;
        let target = self.mapper.map(&source);

        let target_path = Path::new(&target);
        let copied = self
            .capture
            .capture(target_path, || fs::copy(&entry.path, target_path));
        if copied.is_none() {
            return Err(self.failure(format!("copy('{source}', '{target}')")));
        }

        log::debug!("Copied {} -> {}", source, target);
        self.manifest.insert(source, target);
        Ok(Action::Copied)
    }

    fn failure(&mut self, operation: String) -> MinifyError {
        MinifyError::runtime(operation, self.capture.take_last_error())
    }
}
