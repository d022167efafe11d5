use thiserror::Error;

use crate::document::DocumentError;
use crate::input::GestureKind;
use crate::tools::BrushError;

/// Protocol faults raised by the gesture tracks.
///
/// These are never fatal: the track has already applied its recovery by the
/// time the fault is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureFault {
    /// `begin` on a track that was already active. The previous gesture was
    /// ended and a fresh snapshot taken.
    #[error("{0} gesture started twice")]
    AlreadyActive(GestureKind),
    /// `update` or `end` on an idle track. The call was ignored.
    #[error("{kind} gesture {action} without begin")]
    NotActive {
        kind: GestureKind,
        action: &'static str,
    },
}

/// Protocol faults raised by the stroke session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrokeFault {
    /// Stylus down while a stroke was already in progress. The stale stroke was
    /// closed and the new one started.
    #[error("stylus down while a stroke is already active")]
    AlreadyActive,
}

/// Everything the canvas controller can report back to its host
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Gesture(#[from] GestureFault),

    #[error(transparent)]
    Stroke(#[from] StrokeFault),

    #[error("Brush tool failed: {0}")]
    Brush(#[from] BrushError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
}

impl CanvasError {
    /// True for input protocol faults (re-entrant gestures, double stylus down).
    /// False for collaborator or host failures.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Gesture(_) | Self::Stroke(_))
    }
}

pub type CanvasResult<T> = Result<T, CanvasError>;
