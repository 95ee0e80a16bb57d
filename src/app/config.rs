use crate::app::cli::Cli;
use crate::app::models::{normalize_extensions, MinifyConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PresetConfig {
    pub source: Option<String>,
    pub target: Option<String>,
    pub banner: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub excludes: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    pub gitignore: Option<bool>,
}

pub fn presets_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".config")
            .join("code_minify")
            .join("presets.toml")
    })
}

pub fn load_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content =
        fs::read_to_string(path).context(format!("Failed to read config at {:?}", path))?;

    parse_presets(&content).context(format!("Failed to parse {}", path.display()))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// `--banner=Text` becomes `/*Text*/`; double quotes are dropped.
pub fn wrap_banner(text: &str) -> String {
    let text = text.replace('"', "");
    if text.is_empty() {
        String::new()
    } else {
        format!("/*{text}*/")
    }
}

/// Defaults < preset < CLI. Ignore patterns from the preset and the CLI are combined.
pub fn resolve_config(
    cli: Cli,
    presets: &HashMap<String, PresetConfig>,
    project_name: Option<&str>,
) -> MinifyConfig {
    // Determine preset to use: CLI flag > Auto-detect > None
    let preset_key = cli.preset.as_deref().or(project_name);
    let preset = preset_key
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();
    if let Some(key) = preset_key.filter(|k| presets.contains_key(*k)) {
        log::info!("Using preset '{}'", key);
    } else if let Some(key) = cli.preset.as_deref() {
        log::warn!("Preset '{}' not found, using defaults", key);
    }

    let mut config = MinifyConfig::default();
    if let Some(source) = cli.source.or(preset.source) {
        config.source_root = PathBuf::from(source);
    }
    if let Some(target) = cli.target.or(preset.target) {
        config.target_root = PathBuf::from(target);
    }
    if let Some(banner) = cli.banner.as_deref() {
        config.banner = wrap_banner(banner);
    } else if let Some(banner) = preset.banner {
        config.banner = banner;
    }
    if let Some(extensions) = cli.extensions.or(preset.extensions) {
        config.minify_extensions = normalize_extensions(extensions);
    }
    if let Some(excludes) = cli.excludes.or(preset.excludes) {
        config.excluded_extensions = normalize_extensions(excludes);
    }
    config.ignore_patterns = merge_vecs(preset.ignore, cli.ignore);
    config.respect_ignore_files = cli.gitignore || preset.gitignore.unwrap_or(false);

    config
}
