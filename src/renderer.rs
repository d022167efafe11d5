use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};

use crate::coords::{ViewMapping, Viewport};
use crate::document::{Document, StrokeData};
use crate::transform::CanvasTransform;

/// Logical corners of the page, counter-clockwise from bottom-left
const PAGE_CORNERS: [Pos2; 4] = [
    Pos2::new(-1.0, -1.0),
    Pos2::new(1.0, -1.0),
    Pos2::new(1.0, 1.0),
    Pos2::new(-1.0, 1.0),
];

/// Paints the document into the canvas area with egui shapes.
///
/// Logical positions are placed through [`ViewMapping::to_device`], the same
/// mapping the input side inverts, so what is under the pointer is what gets
/// painted on.
#[derive(Debug, Clone)]
pub struct CanvasRenderer {
    background: Color32,
    page: Color32,
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self {
            background: Color32::from_gray(48),
            page: Color32::WHITE,
        }
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the current frame
    pub fn render(&self, painter: &Painter, rect: Rect, transform: &CanvasTransform, document: &Document) {
        let Ok(viewport) = Viewport::from_size(rect.size()) else {
            return;
        };
        let mapping = ViewMapping::new(viewport, transform);
        let to_screen = |logical: Pos2| mapping.to_device(logical) + rect.min.to_vec2();

        painter.rect_filled(rect, 0.0, self.background);

        let page = PAGE_CORNERS.iter().map(|corner| to_screen(*corner)).collect();
        painter.add(Shape::convex_polygon(page, self.page, Stroke::NONE));

        for stroke in document.strokes() {
            self.render_stroke(painter, stroke, &to_screen, viewport, transform.zoom());
        }
    }

    fn render_stroke(
        &self,
        painter: &Painter,
        stroke: &StrokeData,
        to_screen: &impl Fn(Pos2) -> Pos2,
        viewport: Viewport,
        zoom: f32,
    ) {
        let color_at = |i: usize| {
            let alpha = stroke.alphas.get(i).copied().unwrap_or(1.0).clamp(0.0, 1.0);
            stroke.color.gamma_multiply(alpha)
        };
        let width_at = |i: usize| {
            let size = stroke.sizes.get(i).copied().unwrap_or(0.0);
            viewport.logical_to_pixels(size, zoom).max(1.0)
        };

        match stroke.positions.as_slice() {
            [] => {}
            [single] => {
                painter.circle_filled(to_screen(*single), width_at(0) / 2.0, color_at(0));
            }
            positions => {
                for (i, pair) in positions.windows(2).enumerate() {
                    let segment = [to_screen(pair[0]), to_screen(pair[1])];
                    painter.line_segment(segment, (width_at(i + 1), color_at(i + 1)));
                }
            }
        }
    }
}
