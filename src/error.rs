use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures that abort a generation run.
///
/// Per-frame conditions (an import with no mesh geometry, an object outside
/// the camera frustum) are not errors: the generator logs them and retries
/// with a fresh random draw.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("model list is empty")]
    NoModels,

    #[error("no background images found in {dir:?}")]
    NoBackgrounds { dir: PathBuf },

    #[error("unsupported model format: {path:?}")]
    UnsupportedModelFormat { path: PathBuf },

    #[error("invalid config: {name} ({reason})")]
    InvalidConfig {
        name: &'static str,
        reason: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rendering host error: {0}")]
    Host(#[from] anyhow::Error),
}
