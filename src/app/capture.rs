//! Scoped capture of OS errors around a single mutating filesystem call.

use crate::app::error::OsError;
use std::io;
use std::panic::Location;
use std::path::Path;

/// Holds the most recent [`OsError`] captured by a guarded call.
///
/// Each capture starts by clearing the previous one, so only the error of the
/// latest call is ever retained.
#[derive(Debug, Default)]
pub struct ErrorCapture {
    last: Option<OsError>,
}

impl ErrorCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the interceptor. It stays active until the guard is dropped.
    pub fn install(&mut self) -> CaptureGuard<'_> {
        self.last = None;
        log::trace!("error capture installed");
        CaptureGuard {
            slot: &mut self.last,
        }
    }

    /// Runs `op` with the interceptor installed and returns its value on success.
    ///
    /// On failure `None` is returned and the error is available from
    /// [`ErrorCapture::last_error`], tagged with `file` and the caller's line.
    #[track_caller]
    pub fn capture<T, F>(&mut self, file: &Path, op: F) -> Option<T>
    where
        F: FnOnce() -> io::Result<T>,
    {
        let location = Location::caller();
        let mut guard = self.install();
        guard.intercept(file, location, op)
    }

    pub fn last_error(&self) -> Option<&OsError> {
        self.last.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<OsError> {
        self.last.take()
    }
}

/// Active interceptor; dropping it removes the interception whatever the outcome.
pub struct CaptureGuard<'a> {
    slot: &'a mut Option<OsError>,
}

impl CaptureGuard<'_> {
    pub fn intercept<T, F>(&mut self, file: &Path, location: &Location<'_>, op: F) -> Option<T>
    where
        F: FnOnce() -> io::Result<T>,
    {
        match op() {
            Ok(value) => Some(value),
            Err(err) => {
                let captured = OsError::from_io(&err, file, location);
                log::debug!("captured os error: {}", captured);
                *self.slot = Some(captured);
                None
            }
        }
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        log::trace!("error capture released");
    }
}

/// One-shot form of [`ErrorCapture::capture`] returning the value and the captured error.
#[track_caller]
pub fn with_capture<T, F>(file: &Path, op: F) -> (Option<T>, Option<OsError>)
where
    F: FnOnce() -> io::Result<T>,
{
    let mut capture = ErrorCapture::new();
    let value = capture.capture(file, op);
    (value, capture.take_last_error())
}
