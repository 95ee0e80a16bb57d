//! Mirror a source tree into a target tree, minifying eligible source files.

pub mod app;

pub use app::engine::{Engine, RunReport};
pub use app::error::{MinifyError, OsError};
pub use app::minify::{inject_banner, Minify};
pub use app::models::{Manifest, MinifyConfig};
pub use app::php::PhpMinifier;
