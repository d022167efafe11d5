use egui::Pos2;
use thiserror::Error;

use crate::document::{Document, StrokeId};
use crate::stroke::Sample;

mod brush;
pub use brush::{Brush, BrushId, PressureSettings, StrokeBrush};

/// Errors a brush tool can hand back to the canvas
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrushError {
    #[error("no stroke to draw into")]
    NoActiveStroke,

    #[error("stroke {0} is not in the document")]
    MissingStroke(StrokeId),

    #[error("{0}")]
    Rejected(String),
}

/// The tool that turns stroke samples into document geometry.
///
/// Positions are in logical canvas coordinates, pressure is in `[0, 1]` and
/// elapsed time is in seconds since the stroke started.
pub trait BrushTool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// The brush strokes are currently painted with, if any
    fn brush_id(&self) -> Option<BrushId>;

    /// Begin a stroke at the first sample
    fn start_stroke(&mut self, document: &mut Document, position: Pos2, pressure: f32) -> Result<(), BrushError>;

    /// Append a sample to the stroke in progress
    fn continue_stroke(&mut self, document: &mut Document, sample: &Sample) -> Result<(), BrushError>;

    /// Finish the stroke in progress. Must be safe to call when no stroke is active.
    fn end_stroke(&mut self) -> Result<(), BrushError>;
}
