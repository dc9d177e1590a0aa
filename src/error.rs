use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a scene file or its material library.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read scene resource {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scene file at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("usemtl references unknown material {0:?}")]
    MissingMaterial(String),

    #[error("referenced resource not found: {0}")]
    MissingResource(PathBuf),
}

/// Top-level error returned by [`crate::render`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("unrecognized render mode {0:?}")]
    BadMode(String),
}
