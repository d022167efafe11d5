use std::path::Path;

use egui::{Pos2, Vec2};

use crate::coords::{ViewMapping, Viewport};
use crate::document::{self, Document};
use crate::error::CanvasResult;
use crate::input::{GestureCoordinator, GestureKind};
use crate::stroke::{Sample, StrokeSessionManager};
use crate::tools::BrushTool;
use crate::transform::CanvasTransform;
use crate::util::time::{Clock, SystemClock};

/// Owns the view transform and all input state for one canvas.
///
/// Every transform change goes through [`Self::manipulate`]. Every state
/// change raises the redraw flag, which the host drains once per frame with
/// [`Self::take_redraw_request`]; several requests before a frame collapse
/// into one.
pub struct CanvasController<B, C = SystemClock> {
    transform: CanvasTransform,
    viewport: Viewport,
    gestures: GestureCoordinator,
    strokes: StrokeSessionManager,
    document: Document,
    brush: B,
    clock: C,
    redraw_requested: bool,
}

impl<B: BrushTool> CanvasController<B, SystemClock> {
    pub fn new(brush: B, viewport: Viewport) -> Self {
        Self::with_clock(brush, viewport, SystemClock)
    }
}

impl<B: BrushTool, C: Clock> CanvasController<B, C> {
    pub fn with_clock(brush: B, viewport: Viewport, clock: C) -> Self {
        Self {
            transform: CanvasTransform::identity(),
            viewport,
            gestures: GestureCoordinator::new(),
            strokes: StrokeSessionManager::new(),
            document: Document::new(),
            brush,
            clock,
            redraw_requested: true,
        }
    }

    pub fn transform(&self) -> &CanvasTransform {
        &self.transform
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn gestures(&self) -> &GestureCoordinator {
        &self.gestures
    }

    pub fn strokes(&self) -> &StrokeSessionManager {
        &self.strokes
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn brush(&self) -> &B {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut B {
        &mut self.brush
    }

    /// Replaces the whole transform at once. Zoom is clamped to stay positive.
    pub fn manipulate(&mut self, zoom: f32, angle: f32, translation: Vec2) {
        self.transform = CanvasTransform::new(zoom, angle, translation);
        self.request_redraw();
    }

    fn apply_transform(&mut self, transform: CanvasTransform) {
        self.manipulate(transform.zoom(), transform.angle(), transform.translation());
    }

    pub fn reset_view(&mut self) {
        self.apply_transform(CanvasTransform::identity());
    }

    /// Resizes the viewport. A degenerate size keeps the previous viewport.
    pub fn resize(&mut self, size: Vec2) -> CanvasResult<()> {
        let viewport = Viewport::from_size(size)?;
        if viewport != self.viewport {
            self.viewport = viewport;
            self.request_redraw();
        }
        Ok(())
    }

    /// Device pixel -> logical canvas point under the current view
    pub fn to_logical(&self, device: Pos2) -> Pos2 {
        self.mapping().to_logical(device)
    }

    pub fn mapping(&self) -> ViewMapping<'_> {
        ViewMapping::new(self.viewport, &self.transform)
    }

    pub fn begin_gesture(&mut self, kind: GestureKind) -> CanvasResult<()> {
        let result = self.gestures.begin(kind, &self.transform);
        self.request_redraw();
        Ok(result?)
    }

    pub fn end_gesture(&mut self, kind: GestureKind) -> CanvasResult<()> {
        let result = self.gestures.end(kind);
        self.request_redraw();
        Ok(result?)
    }

    /// `offset` is the drag offset in pixels since the pan began
    pub fn update_pan(&mut self, offset: Vec2) -> CanvasResult<()> {
        let next = self.gestures.update_pan(offset, self.viewport, &self.transform)?;
        self.apply_transform(next);
        Ok(())
    }

    /// `scale` is the cumulative scale factor since the zoom began
    pub fn update_zoom(&mut self, scale: f32) -> CanvasResult<()> {
        let next = self.gestures.update_zoom(scale, &self.transform)?;
        self.apply_transform(next);
        Ok(())
    }

    /// `clockwise_delta` is the cumulative clockwise rotation since the gesture began
    pub fn update_rotate(&mut self, clockwise_delta: f32) -> CanvasResult<()> {
        let next = self.gestures.update_rotate(clockwise_delta, &self.transform)?;
        self.apply_transform(next);
        Ok(())
    }

    pub fn stylus_down(&mut self, device: Pos2, pressure: f32) -> CanvasResult<()> {
        let now = self.clock.now();
        let mapping = ViewMapping::new(self.viewport, &self.transform);
        let result = self.strokes.down(
            &mapping,
            device,
            pressure,
            now,
            &mut self.brush,
            &mut self.document,
        );
        self.request_redraw();
        result
    }

    pub fn stylus_move(&mut self, device: Pos2, pressure: f32) -> CanvasResult<Option<Sample>> {
        if !self.strokes.is_active() {
            return Ok(None);
        }
        let now = self.clock.now();
        let mapping = ViewMapping::new(self.viewport, &self.transform);
        let result = self.strokes.motion(
            &mapping,
            device,
            pressure,
            now,
            &mut self.brush,
            &mut self.document,
        );
        self.request_redraw();
        result
    }

    pub fn stylus_up(&mut self, device: Pos2) -> CanvasResult<()> {
        if self.strokes.is_active() {
            log::debug!(target: "stroke", "Stylus up at {:?}", self.to_logical(device));
        }
        let result = self.strokes.up(&mut self.brush);
        self.request_redraw();
        result
    }

    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Returns whether a redraw was requested since the last call and clears the flag
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Starts over with an empty document and the identity view.
    /// Any stroke or gesture in progress is dropped.
    pub fn new_document(&mut self) {
        self.drop_input_state();
        self.document.clear();
        self.reset_view();
        log::info!(target: "canvas", "New document");
    }

    fn drop_input_state(&mut self) {
        if let Err(err) = self.strokes.up(&mut self.brush) {
            log::warn!(target: "canvas", "Closing stroke failed: {err}");
        }
        self.gestures.reset();
    }

    /// Writes the document and the current view to `path` as JSON
    pub fn save(&self, path: &Path) -> CanvasResult<()> {
        document::save_document(path, &self.document, &self.transform)?;
        Ok(())
    }

    /// Replaces the document and view with the contents of `path`.
    /// Any stroke or gesture in progress is dropped.
    pub fn load(&mut self, path: &Path) -> CanvasResult<()> {
        let file = document::load_document(path)?;
        self.drop_input_state();
        self.document = file.document;
        self.apply_transform(file.view);
        Ok(())
    }
}
