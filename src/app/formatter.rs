use crate::app::models::{Manifest, RunSummary};
use anyhow::Result;

pub struct OutputGenerator;

impl OutputGenerator {
    /// One `source -> target` line per manifest entry, in processing order.
    pub fn generate_listing(manifest: &Manifest) -> String {
        let mut output = String::new();

        for (source, target) in manifest.iter() {
            output.push_str(&format!("{} -> {}\n", source, target));
        }

        output.trim_end().to_string()
    }

    pub fn generate_json(manifest: &Manifest) -> Result<String> {
        Ok(serde_json::to_string_pretty(manifest)?)
    }

    pub fn format_summary(summary: &RunSummary) -> String {
        format!(
            "{} directories, {} minified, {} copied, {} skipped",
            summary.directories, summary.minified, summary.copied, summary.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.insert("src".into(), "dist".into());
        manifest.insert("src/a.php".into(), "dist/a.php".into());
        manifest
    }

    #[test]
    fn listing_has_one_line_per_entry() {
        assert_eq!(
            OutputGenerator::generate_listing(&manifest()),
            "src -> dist\nsrc/a.php -> dist/a.php"
        );
    }

    #[test]
    fn json_is_an_object() {
        let json = OutputGenerator::generate_json(&manifest()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["src/a.php"], "dist/a.php");
    }

    #[test]
    fn summary_line() {
        let summary = RunSummary {
            directories: 2,
            minified: 3,
            copied: 1,
            skipped: 0,
        };
        assert_eq!(
            OutputGenerator::format_summary(&summary),
            "2 directories, 3 minified, 1 copied, 0 skipped"
        );
    }
}
