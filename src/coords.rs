//! Conversion between device pixels and logical canvas coordinates.
//!
//! Device space has its origin at the top-left of the canvas area with y
//! growing downward. Normalized space spans `[-1, 1]` vertically with y
//! growing upward and is stretched horizontally by the aspect ratio so that
//! geometry stays isotropic. Logical space is normalized space with the
//! [`CanvasTransform`] removed.
//!
//! This is the only place where the aspect correction is applied. The
//! renderer uses [`to_device`] so that both directions always agree.

use egui::{Pos2, Vec2};

use crate::error::{CanvasError, CanvasResult};
use crate::transform::CanvasTransform;

/// Size in pixels of the area the canvas is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> CanvasResult<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(CanvasError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn from_size(size: Vec2) -> CanvasResult<Self> {
        Self::new(size.x, size.y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Device pixel -> aspect-corrected normalized point
    pub fn normalize(&self, device: Pos2) -> Vec2 {
        let nx = 2.0 * device.x / self.width - 1.0;
        let ny = -2.0 * device.y / self.height + 1.0;
        Vec2::new(nx * self.aspect(), ny)
    }

    /// Aspect-corrected normalized point -> device pixel
    pub fn denormalize(&self, normalized: Vec2) -> Pos2 {
        let nx = normalized.x / self.aspect();
        Pos2::new(
            (nx + 1.0) * self.width / 2.0,
            (1.0 - normalized.y) * self.height / 2.0,
        )
    }

    /// Pixel offset -> normalized offset, with the same scaling as [`Self::normalize`].
    /// Both axes end up divided by the height, so a drag moves the canvas by
    /// the same number of pixels it was dragged.
    pub fn normalize_delta(&self, delta: Vec2) -> Vec2 {
        Vec2::new(2.0 * delta.x / self.height, -2.0 * delta.y / self.height)
    }

    /// Logical length -> pixel length at the given zoom
    pub fn logical_to_pixels(&self, length: f32, zoom: f32) -> f32 {
        length * zoom * self.height / 2.0
    }
}

/// Device pixel -> logical canvas point.
pub fn to_logical(device: Pos2, viewport: Viewport, transform: &CanvasTransform) -> Pos2 {
    transform.apply_inverse(viewport.normalize(device)).to_pos2()
}

/// Logical canvas point -> device pixel. Exact inverse of [`to_logical`].
pub fn to_device(logical: Pos2, viewport: Viewport, transform: &CanvasTransform) -> Pos2 {
    viewport.denormalize(transform.apply(logical.to_vec2()))
}

/// The view frozen at the moment an event is processed
#[derive(Debug, Clone, Copy)]
pub struct ViewMapping<'a> {
    pub viewport: Viewport,
    pub transform: &'a CanvasTransform,
}

impl<'a> ViewMapping<'a> {
    pub fn new(viewport: Viewport, transform: &'a CanvasTransform) -> Self {
        Self { viewport, transform }
    }

    #[inline]
    pub fn to_logical(&self, device: Pos2) -> Pos2 {
        to_logical(device, self.viewport, self.transform)
    }

    #[inline]
    pub fn to_device(&self, logical: Pos2) -> Pos2 {
        to_device(logical, self.viewport, self.transform)
    }
}
