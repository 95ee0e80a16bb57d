use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Mirror a source tree, minifying PHP files and copying everything else",
    after_help = "EXAMPLE:\n    code_minify --source=./ --target=./out/ --banner=\"This is My Minified Source Code\"\n\nOnly PHP code is minified; HTML, CSS or JS embedded in PHP files is left as is."
)]
pub struct Cli {
    /// Source directory (default: ./)
    #[arg(long)]
    pub source: Option<String>,

    /// Target directory (default: ./dist/)
    #[arg(long)]
    pub target: Option<String>,

    /// Comment text prepended to each minified file
    #[arg(long)]
    pub banner: Option<String>,

    /// Comma-separated extensions to minify (default: inc,php,phtml)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Comma-separated extensions to leave out entirely (default: md)
    #[arg(long, value_delimiter = ',')]
    pub excludes: Option<Vec<String>>,

    /// Glob patterns, relative to the source, for files to leave out
    #[arg(long, num_args = 1..)]
    pub ignore: Option<Vec<String>>,

    /// Honour .gitignore and .ignore files in the source tree
    #[arg(long)]
    pub gitignore: bool,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Print the manifest as JSON instead of one mapping per line
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_equals_and_comma_lists() {
        let cli = Cli::try_parse_from([
            "code_minify",
            "--source=./app/",
            "--target=./out/",
            "--extensions=php,inc",
            "--excludes=md,yaml",
            "--banner=Mine",
        ])
        .unwrap();
        assert_eq!(cli.source.as_deref(), Some("./app/"));
        assert_eq!(cli.target.as_deref(), Some("./out/"));
        assert_eq!(cli.extensions, Some(vec!["php".to_string(), "inc".to_string()]));
        assert_eq!(cli.excludes, Some(vec!["md".to_string(), "yaml".to_string()]));
        assert_eq!(cli.banner.as_deref(), Some("Mine"));
        assert!(!cli.json);
    }

    #[test]
    fn help_is_a_display_error() {
        let err = Cli::try_parse_from(["code_minify", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
