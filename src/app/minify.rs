/// Source-text transformation applied to eligible files.
pub trait Minify {
    /// Strips insignificant whitespace and comments without changing semantics.
    fn minify(&self, source: &str) -> String;

    /// Leading token after which a banner is inserted, e.g. `<?php`.
    fn opening_marker(&self) -> Option<&str> {
        None
    }
}

/// Returns `<marker> <banner><rest>` when `content` starts with `marker`.
///
/// Content without the marker, or an empty banner, is returned unchanged.
pub fn inject_banner(content: &str, marker: Option<&str>, banner: &str) -> String {
    if banner.is_empty() {
        return content.to_string();
    }
    match marker.and_then(|m| content.strip_prefix(m).map(|rest| (m, rest))) {
        Some((marker, rest)) => format!("{marker} {banner}{rest}"),
        None => content.to_string(),
    }
}

/// Leaves content untouched; useful for languages without a stripper.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Minify for Passthrough {
    fn minify(&self, source: &str) -> String {
        source.to_string()
    }
}
