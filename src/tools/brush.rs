use std::fmt;

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BrushError, BrushTool};
use crate::document::{Document, StrokeData, StrokeId};
use crate::stroke::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrushId(pub Uuid);

impl BrushId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BrushId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BrushId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Linear response of a brush property to stylus pressure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureSettings {
    pub min_value: f32,
    pub max_value: f32,
}

impl PressureSettings {
    pub const fn new(min_value: f32, max_value: f32) -> Self {
        Self { min_value, max_value }
    }

    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn evaluate(&self, pressure: f32) -> f32 {
        self.min_value + pressure * (self.max_value - self.min_value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub id: BrushId,
    pub name: String,
    /// Diameter in logical canvas units
    pub size: PressureSettings,
    /// Opacity per dab
    pub flow: PressureSettings,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            id: BrushId::new(),
            name: "Round".to_string(),
            size: PressureSettings::new(0.002, 0.02),
            flow: PressureSettings::new(0.2, 1.0),
        }
    }
}

/// Records pressure-tagged samples into [`StrokeData`] entries of the document
#[derive(Debug, Clone)]
pub struct StrokeBrush {
    brush: Brush,
    color: Color32,
    current_stroke: Option<StrokeId>,
}

impl Default for StrokeBrush {
    fn default() -> Self {
        Self::new(Brush::default(), Color32::from_rgb(0, 0, 255))
    }
}

impl StrokeBrush {
    pub fn new(brush: Brush, color: Color32) -> Self {
        Self {
            brush,
            color,
            current_stroke: None,
        }
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn current_stroke(&self) -> Option<StrokeId> {
        self.current_stroke
    }
}

impl BrushTool for StrokeBrush {
    fn name(&self) -> &'static str {
        "StrokeBrush"
    }

    fn brush_id(&self) -> Option<BrushId> {
        Some(self.brush.id)
    }

    fn start_stroke(&mut self, document: &mut Document, position: Pos2, pressure: f32) -> Result<(), BrushError> {
        if let Some(stale) = self.current_stroke {
            log::warn!(target: "brush_tool", "Starting stroke while stroke {stale} is still open");
        }

        let id = document.insert_stroke(StrokeData::new(self.brush.id, self.color));
        self.current_stroke = Some(id);
        self.continue_stroke(
            document,
            &Sample {
                position,
                pressure,
                elapsed: 0.0,
            },
        )
    }

    fn continue_stroke(&mut self, document: &mut Document, sample: &Sample) -> Result<(), BrushError> {
        let id = self.current_stroke.ok_or(BrushError::NoActiveStroke)?;
        let stroke = document.stroke_mut(id).ok_or(BrushError::MissingStroke(id))?;

        stroke.positions.push(sample.position);
        stroke.pressures.push(sample.pressure);
        stroke.sizes.push(self.brush.size.evaluate(sample.pressure));
        stroke.alphas.push(self.brush.flow.evaluate(sample.pressure));
        stroke.times.push(sample.elapsed);
        Ok(())
    }

    fn end_stroke(&mut self) -> Result<(), BrushError> {
        if let Some(id) = self.current_stroke.take() {
            log::debug!(target: "brush_tool", "Stroke {id} finished");
        }
        Ok(())
    }
}
