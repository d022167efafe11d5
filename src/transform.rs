use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Smallest zoom the view will ever hold. Anything below this (or NaN) is
/// clamped here so the inverse mapping stays defined.
pub const ZOOM_EPSILON: f32 = 1e-4;

/// Largest zoom the view will ever hold, including overflow to infinity.
pub const ZOOM_MAX: f32 = 1e4;

/// The pan/zoom/rotation applied to the canvas when it is placed in the viewport.
///
/// Maps a logical canvas point `p` to normalized viewport space as
/// `translation + R(angle) * (zoom * p)`. Angles are counter-clockwise positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CanvasTransform {
    /// Uniform scale factor (1.0 = canvas fills the viewport height)
    zoom: f32,
    /// Rotation in radians, counter-clockwise positive
    angle: f32,
    /// Offset in normalized viewport units, applied after scale and rotation
    translation: Vec2,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        const IDENTITY: CanvasTransform = CanvasTransform {
            zoom: 1.0,
            angle: 0.0,
            translation: Vec2::ZERO,
        };
        IDENTITY
    }
}

impl CanvasTransform {
    /// Creates a transform, clamping a non-positive zoom to [`ZOOM_EPSILON`]
    pub fn new(zoom: f32, angle: f32, translation: Vec2) -> Self {
        Self {
            zoom: sanitize_zoom(zoom),
            angle,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn with_zoom(self, zoom: f32) -> Self {
        Self::new(zoom, self.angle, self.translation)
    }

    pub fn with_angle(self, angle: f32) -> Self {
        Self { angle, ..self }
    }

    pub fn with_translation(self, translation: Vec2) -> Self {
        Self { translation, ..self }
    }

    /// Logical canvas point -> normalized viewport point
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.translation + rotate(point * self.zoom, self.angle)
    }

    /// Normalized viewport point -> logical canvas point.
    /// Undoes translation, then rotation, then scale.
    pub fn apply_inverse(&self, point: Vec2) -> Vec2 {
        rotate(point - self.translation, -self.angle) / self.zoom
    }
}

/// Clamps zoom into `[ZOOM_EPSILON, ZOOM_MAX]`, warning when composition produced garbage.
/// NaN and non-positive values go to the low end, overflow goes to the high end.
pub fn sanitize_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() || zoom < ZOOM_EPSILON {
        log::warn!(target: "canvas", "Invalid zoom {zoom}, clamping to {ZOOM_EPSILON}");
        ZOOM_EPSILON
    } else if zoom > ZOOM_MAX {
        log::warn!(target: "canvas", "Zoom {zoom} out of range, clamping to {ZOOM_MAX}");
        ZOOM_MAX
    } else {
        zoom
    }
}

/// Counter-clockwise rotation in a y-up frame.
fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}
