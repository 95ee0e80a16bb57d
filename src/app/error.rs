use std::fmt;
use std::io;
use std::panic::Location;
use std::path::PathBuf;
use thiserror::Error;

/// Diagnostic record of a failed mutating filesystem call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsError {
    /// Raw OS error code, when the platform reported one.
    pub code: Option<i32>,
    pub message: String,
    /// Path the failing operation acted on.
    pub file: PathBuf,
    /// Source line of the call that performed the operation.
    pub line: u32,
}

impl OsError {
    pub fn from_io(err: &io::Error, file: impl Into<PathBuf>, location: &Location<'_>) -> Self {
        Self {
            code: err.raw_os_error(),
            message: err.to_string(),
            file: file.into(),
            line: location.line(),
        }
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (os error {code})", self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        write!(f, " at {}:{}", self.file.display(), self.line)
    }
}

impl std::error::Error for OsError {}

#[derive(Debug, Error)]
pub enum MinifyError {
    /// A mutating call reported failure; `source` is the last captured OS error.
    #[error("{operation} failed")]
    Runtime {
        operation: String,
        #[source]
        source: Option<OsError>,
    },
    #[error("Source directory {0} does not exist or is not a directory")]
    SourceNotDirectory(PathBuf),
    #[error("File system walk error: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Failed to read file {0}: {1}")]
    Read(PathBuf, #[source] io::Error),
    #[error("File content for {0} is not valid UTF-8")]
    InvalidUtf8(PathBuf),
    #[error("Path {} is not valid UTF-8 and cannot be mapped", .0.display())]
    NonUtf8Path(PathBuf),
    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] globset::Error),
}

impl MinifyError {
    pub fn runtime(operation: impl Into<String>, source: Option<OsError>) -> Self {
        Self::Runtime {
            operation: operation.into(),
            source,
        }
    }

    /// The captured OS error behind a [`MinifyError::Runtime`], if any.
    pub fn os_error(&self) -> Option<&OsError> {
        match self {
            Self::Runtime { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinifyError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn runtime_error_exposes_cause() {
        let io_err = io::Error::from_raw_os_error(13);
        let os = OsError::from_io(&io_err, "dist/a.php", Location::caller());
        let err = MinifyError::runtime("write('dist/a.php')", Some(os.clone()));

        assert_eq!(err.to_string(), "write('dist/a.php') failed");
        assert_eq!(err.os_error(), Some(&os));
        assert!(err.source().is_some());
        assert_eq!(os.code, Some(13));
        assert!(os.to_string().contains("dist/a.php"));
    }
}
