//! Error taxonomy for marker controllers and settings loading.

use thiserror::Error;

use crate::ids::MarkerId;

/// Errors produced by marker controllers and settings parsing.
///
/// `MissingStep`/`MissingSceneReferences` are fatal: the controller that
/// returned them has disabled itself. `MissingTextLayer` is a soft
/// misconfiguration; the marker keeps animating.
#[derive(Debug, Error)]
pub enum GraphicError {
    #[error("marker {0} initialized without a tutorial step")]
    MissingStep(MarkerId),
    #[error("marker {0} initialized without scene references")]
    MissingSceneReferences(MarkerId),
    #[error("marker {0} is disabled after a failed initialization")]
    Disabled(MarkerId),
    #[error("marker {0} has already released its scene node")]
    Released(MarkerId),
    #[error("marker {0} received text but has no text layer")]
    MissingTextLayer(MarkerId),
    #[error("invalid graphic settings: {0}")]
    InvalidSettings(String),
    #[error("graphic settings json parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
