use std::fmt;

use egui::Vec2;

use crate::coords::Viewport;
use crate::error::GestureFault;
use crate::transform::{sanitize_zoom, CanvasTransform};

/// The three continuous gestures that drive the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Pan,
    Zoom,
    Rotate,
}

impl GestureKind {
    pub const ALL: [GestureKind; 3] = [GestureKind::Pan, GestureKind::Zoom, GestureKind::Rotate];
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pan => write!(f, "Pan"),
            Self::Zoom => write!(f, "Zoom"),
            Self::Rotate => write!(f, "Rotate"),
        }
    }
}

/// One gesture track. `S` is the transform field captured when the gesture began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureTrack<S> {
    Idle,
    Active { snapshot: S },
}

impl<S> Default for GestureTrack<S> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<S: Copy> GestureTrack<S> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn snapshot(&self) -> Option<S> {
        match self {
            Self::Active { snapshot } => Some(*snapshot),
            Self::Idle => None,
        }
    }

    /// Starts the gesture from `snapshot`. A second begin restarts the gesture
    /// from the new snapshot and reports the fault.
    fn begin(&mut self, kind: GestureKind, snapshot: S) -> Result<(), GestureFault> {
        let was_active = self.is_active();
        *self = Self::Active { snapshot };
        if was_active {
            Err(GestureFault::AlreadyActive(kind))
        } else {
            Ok(())
        }
    }

    fn active_snapshot(&self, kind: GestureKind) -> Result<S, GestureFault> {
        self.snapshot().ok_or(GestureFault::NotActive {
            kind,
            action: "updated",
        })
    }

    fn end(&mut self, kind: GestureKind) -> Result<(), GestureFault> {
        match self {
            Self::Active { .. } => {
                *self = Self::Idle;
                Ok(())
            }
            Self::Idle => Err(GestureFault::NotActive {
                kind,
                action: "ended",
            }),
        }
    }
}

/// Tracks pan, zoom and rotate independently.
///
/// Every update is computed from the value captured at begin plus the
/// cumulative delta reported by the input source, never from the previous
/// update, so repeated updates cannot drift. Each track only writes its own
/// field; the others are taken from the live transform, which makes
/// simultaneous gestures order independent.
#[derive(Debug, Clone, Default)]
pub struct GestureCoordinator {
    pan: GestureTrack<Vec2>,
    zoom: GestureTrack<f32>,
    rotate: GestureTrack<f32>,
}

impl GestureCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pan => self.pan.is_active(),
            GestureKind::Zoom => self.zoom.is_active(),
            GestureKind::Rotate => self.rotate.is_active(),
        }
    }

    pub fn any_active(&self) -> bool {
        GestureKind::ALL.iter().any(|kind| self.is_active(*kind))
    }

    pub fn begin(&mut self, kind: GestureKind, current: &CanvasTransform) -> Result<(), GestureFault> {
        log::debug!(target: "gesture", "{kind} gesture started");
        match kind {
            GestureKind::Pan => self.pan.begin(kind, current.translation()),
            GestureKind::Zoom => self.zoom.begin(kind, current.zoom()),
            GestureKind::Rotate => self.rotate.begin(kind, current.angle()),
        }
    }

    pub fn end(&mut self, kind: GestureKind) -> Result<(), GestureFault> {
        log::debug!(target: "gesture", "{kind} gesture ended");
        match kind {
            GestureKind::Pan => self.pan.end(kind),
            GestureKind::Zoom => self.zoom.end(kind),
            GestureKind::Rotate => self.rotate.end(kind),
        }
    }

    /// Drops every track back to idle without reporting anything
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `offset` is the pointer offset in pixels since the pan began.
    pub fn update_pan(
        &self,
        offset: Vec2,
        viewport: Viewport,
        current: &CanvasTransform,
    ) -> Result<CanvasTransform, GestureFault> {
        let snapshot = self.pan.active_snapshot(GestureKind::Pan)?;
        Ok(current.with_translation(snapshot + viewport.normalize_delta(offset)))
    }

    /// `scale` is the ratio of the current finger spread to the spread at begin.
    pub fn update_zoom(&self, scale: f32, current: &CanvasTransform) -> Result<CanvasTransform, GestureFault> {
        let snapshot = self.zoom.active_snapshot(GestureKind::Zoom)?;
        Ok(current.with_zoom(sanitize_zoom(snapshot * scale)))
    }

    /// `clockwise_delta` is the rotation since begin as reported by the input
    /// source, clockwise positive. The canvas angle is counter-clockwise
    /// positive, hence the negation.
    pub fn update_rotate(
        &self,
        clockwise_delta: f32,
        current: &CanvasTransform,
    ) -> Result<CanvasTransform, GestureFault> {
        let snapshot = self.rotate.active_snapshot(GestureKind::Rotate)?;
        Ok(current.with_angle(snapshot - clockwise_delta))
    }
}
