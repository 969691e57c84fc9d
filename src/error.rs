// src/error.rs

//! Error type for the fallible parts of the screen API.
//!
//! Geometry problems (non-positive sizes, zero radii, off-screen shapes) are
//! never errors: they are silent no-ops. Only collaborator failures surface
//! here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// The text-shaping delegate failed to render a line.
    #[error("Failed to render text {text:?}: {source:#}")]
    RenderFailure {
        text: String,
        #[source]
        source: anyhow::Error,
    },

    /// The operation needs a running presentation loop.
    #[error("Screen is powered off")]
    PoweredOff,

    /// `power_on` was called while a presenter is already running.
    #[error("Screen is already powered on")]
    AlreadyOn,

    /// The display surface rejected a request.
    #[error("Display surface failure: {0:#}")]
    SurfaceFailure(#[source] anyhow::Error),

    /// Exporting the current frame failed.
    #[error("Failed to export frame to {path}: {source:#}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The presentation thread could not be started or has gone away.
    #[error("Presenter unavailable: {0}")]
    PresenterUnavailable(String),
}

pub type Result<T, E = ScreenError> = std::result::Result<T, E>;
