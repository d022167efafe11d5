use egui::Pos2;

use crate::coords::ViewMapping;
use crate::document::Document;
use crate::error::{CanvasResult, StrokeFault};
use crate::tools::{BrushId, BrushTool};

/// One stylus sample in logical canvas space, as handed to the brush tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Pos2,
    /// In `[0, 1]`
    pub pressure: f32,
    /// Seconds since the stroke started
    pub elapsed: f32,
}

/// Bookkeeping for the stroke between stylus down and stylus up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    pub start_time: f64,
    pub brush_id: Option<BrushId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    NoStroke,
    Active(StrokeSession),
}

/// Turns stylus down/move/up into start/continue/end calls on a brush tool.
///
/// Only one session exists at a time. Motion without a session is dropped
/// silently since event sources routinely deliver motion around the edges
/// of a stroke.
#[derive(Debug, Clone, Default)]
pub struct StrokeSessionManager {
    state: StrokeState,
}

impl StrokeSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&StrokeSession> {
        match &self.state {
            StrokeState::Active(session) => Some(session),
            StrokeState::NoStroke => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active(_))
    }

    /// Starts a stroke at `device`, mapped with the view as it is right now.
    ///
    /// A down during an active stroke closes the stale stroke first and then
    /// reports [`StrokeFault::AlreadyActive`]; the new stroke is running
    /// either way. If the brush refuses to start, no session is recorded.
    pub fn down<B: BrushTool + ?Sized>(
        &mut self,
        mapping: &ViewMapping<'_>,
        device: Pos2,
        pressure: f32,
        now: f64,
        brush: &mut B,
        document: &mut Document,
    ) -> CanvasResult<()> {
        let fault = if self.is_active() {
            self.state = StrokeState::NoStroke;
            if let Err(err) = brush.end_stroke() {
                log::warn!(target: "stroke", "Closing stale stroke failed: {err}");
            }
            Some(StrokeFault::AlreadyActive)
        } else {
            None
        };

        let position = mapping.to_logical(device);
        brush.start_stroke(document, position, clamp_pressure(pressure))?;
        self.state = StrokeState::Active(StrokeSession {
            start_time: now,
            brush_id: brush.brush_id(),
        });
        log::debug!(target: "stroke", "Stroke started at {position:?}");

        match fault {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }

    /// Continues the active stroke. Returns the forwarded sample, or `None`
    /// when there is no stroke to continue.
    pub fn motion<B: BrushTool + ?Sized>(
        &mut self,
        mapping: &ViewMapping<'_>,
        device: Pos2,
        pressure: f32,
        now: f64,
        brush: &mut B,
        document: &mut Document,
    ) -> CanvasResult<Option<Sample>> {
        let StrokeState::Active(session) = self.state else {
            return Ok(None);
        };

        let sample = Sample {
            position: mapping.to_logical(device),
            pressure: clamp_pressure(pressure),
            elapsed: (now - session.start_time).max(0.0) as f32,
        };
        brush.continue_stroke(document, &sample)?;
        Ok(Some(sample))
    }

    /// Ends the stroke. The brush is told to finish even when no session is
    /// recorded, and the session is cleared even when the brush fails.
    pub fn up<B: BrushTool + ?Sized>(&mut self, brush: &mut B) -> CanvasResult<()> {
        if let StrokeState::Active(session) = self.state {
            log::debug!(target: "stroke", "Stroke ended (brush {:?})", session.brush_id);
        }
        self.state = StrokeState::NoStroke;
        brush.end_stroke()?;
        Ok(())
    }
}

fn clamp_pressure(pressure: f32) -> f32 {
    if pressure.is_nan() {
        1.0
    } else {
        pressure.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_is_clamped() {
        assert_eq!(clamp_pressure(1.7), 1.0);
        assert_eq!(clamp_pressure(-0.2), 0.0);
        assert_eq!(clamp_pressure(f32::NAN), 1.0);
        assert_eq!(clamp_pressure(0.4), 0.4);
    }
}
