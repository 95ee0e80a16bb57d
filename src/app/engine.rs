use crate::app::dispatcher::ActionDispatcher;
use crate::app::error::{MinifyError, Result};
use crate::app::minify::Minify;
use crate::app::models::{Manifest, MinifyConfig, RunSummary};
use crate::app::paths::lexical_normalize;
use crate::app::walker::TreeWalker;
use std::path::{self, PathBuf};

/// Mirrors one source tree into one target tree.
pub struct Engine {
    config: MinifyConfig,
    minifier: Box<dyn Minify>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub manifest: Manifest,
    pub summary: RunSummary,
}

impl Engine {
    pub fn new(config: MinifyConfig, minifier: Box<dyn Minify>) -> Self {
        Self { config, minifier }
    }

    pub fn config(&self) -> &MinifyConfig {
        &self.config
    }

    /// Runs the whole traversal and returns the manifest.
    ///
    /// The first failing action aborts the run; nothing after it is visited.
    pub fn run(&self) -> Result<Manifest> {
        self.run_with_summary().map(|report| report.manifest)
    }

    pub fn run_with_summary(&self) -> Result<RunReport> {
        let source = &self.config.source_root;
        if !source.is_dir() {
            return Err(MinifyError::SourceNotDirectory(source.clone()));
        }

        log::info!(
            "Mirroring {} into {}",
            source.display(),
            self.config.target_root.display()
        );

        let mut dispatcher = ActionDispatcher::new(&self.config, self.minifier.as_ref())?;
        let mut summary = RunSummary::default();

        let walker = TreeWalker::new(source)
            .skip_names(self.config.skip_names.clone())
            .prune(self.nested_target())
            .respect_ignore_files(self.config.respect_ignore_files);

        walker.walk(|entry| {
            let action = dispatcher.dispatch(entry)?;
            summary.record(action);
            Ok(())
        })?;

        Ok(RunReport {
            manifest: dispatcher.into_manifest(),
            summary,
        })
    }

    /// The target root, when it lies inside the source root.
    ///
    /// `..` components are resolved first, so `proj/../proj/dist` is still nested in `proj`.
    fn nested_target(&self) -> Option<PathBuf> {
        let source = lexical_normalize(&path::absolute(&self.config.source_root).ok()?);
        let target = lexical_normalize(&path::absolute(&self.config.target_root).ok()?);
        if target != source && target.starts_with(&source) {
            log::debug!("Excluding nested target {} from the walk", target.display());
            Some(target)
        } else {
            None
        }
    }
}
