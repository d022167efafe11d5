use egui::{Pos2, Vec2};

mod gestures;
mod handler;
mod router;

pub use gestures::{GestureCoordinator, GestureKind, GestureTrack};
pub use handler::InputHandler;
pub use router::route_event;

/// Canvas input in the shape the controller consumes, independent of the
/// windowing toolkit. Positions are device pixels relative to the canvas
/// area's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Stylus (or primary pointer) touched the canvas
    StylusDown {
        position: Pos2,
        /// In `[0, 1]`
        pressure: f32,
    },
    /// Stylus moved while in contact
    StylusMove {
        position: Pos2,
        pressure: f32,
    },
    /// Stylus lifted
    StylusUp {
        position: Pos2,
    },
    GestureBegin(GestureKind),
    /// Cumulative drag offset in pixels since the pan began
    PanUpdate {
        offset: Vec2,
    },
    /// Cumulative scale factor since the zoom began
    ZoomUpdate {
        scale: f32,
    },
    /// Cumulative rotation in radians since the gesture began, clockwise positive
    RotateUpdate {
        clockwise_delta: f32,
    },
    GestureEnd(GestureKind),
    /// The canvas area changed size
    Resize {
        size: Vec2,
    },
}

impl InputEvent {
    /// Helper to check whether this event belongs to the stylus stream
    pub fn is_stylus(&self) -> bool {
        matches!(
            self,
            Self::StylusDown { .. } | Self::StylusMove { .. } | Self::StylusUp { .. }
        )
    }
}
