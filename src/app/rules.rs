use crate::app::error::Result;
use crate::app::models::MinifyConfig;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::Path;

/// Decides what happens to a file based on its extension and relative path.
#[derive(Debug, Clone)]
pub struct ClassificationRules {
    minify: BTreeSet<String>,
    exclude: BTreeSet<String>,
    ignore_set: GlobSet,
}

impl ClassificationRules {
    pub fn new(config: &MinifyConfig) -> Result<Self> {
        Ok(Self {
            minify: lowercase_set(&config.minify_extensions),
            exclude: lowercase_set(&config.excluded_extensions),
            ignore_set: build_globset(&config.ignore_patterns)?,
        })
    }

    pub fn should_exclude(&self, extension: &str) -> bool {
        self.exclude.contains(&extension.to_lowercase())
    }

    pub fn should_minify(&self, extension: &str) -> bool {
        self.minify.contains(&extension.to_lowercase())
    }

    /// `relative` is the path below the source root.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.ignore_set.is_match(relative)
    }
}

fn lowercase_set(extensions: &BTreeSet<String>) -> BTreeSet<String> {
    extensions.iter().map(|e| e.to_lowercase()).collect()
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(minify: &[&str], exclude: &[&str], ignore: &[&str]) -> ClassificationRules {
        let config = MinifyConfig::builder()
            .extensions(minify)
            .exclusions(exclude)
            .ignore_patterns(ignore.iter().map(|s| s.to_string()).collect())
            .build();
        ClassificationRules::new(&config).unwrap()
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = rules(&["PHP"], &["Md"], &[]);
        assert!(rules.should_minify("php"));
        assert!(rules.should_minify("PhP"));
        assert!(rules.should_exclude("MD"));
        assert!(!rules.should_minify("md"));
        assert!(!rules.should_exclude(""));
    }

    #[test]
    fn extension_may_be_in_both_sets() {
        let rules = rules(&["php", "md"], &["md"], &[]);
        assert!(rules.should_exclude("md"));
        assert!(rules.should_minify("md"));
    }

    #[test]
    fn ignore_patterns_match_relative_paths() {
        let rules = rules(&["php"], &[], &["tests/**", "*.lock"]);
        assert!(rules.is_ignored(Path::new("tests/unit/a.php")));
        assert!(rules.is_ignored(Path::new("composer.lock")));
        assert!(!rules.is_ignored(Path::new("src/a.php")));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let config = MinifyConfig::builder()
            .ignore_patterns(vec!["a[".to_string()])
            .build();
        assert!(ClassificationRules::new(&config).is_err());
    }
}
