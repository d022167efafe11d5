use crate::canvas::CanvasController;
use crate::error::CanvasResult;
use crate::tools::BrushTool;
use crate::util::time::Clock;

use super::InputEvent;

/// Routes one input event to the matching controller operation.
///
/// Faults are logged here as warnings and handed back to the caller, who is
/// free to ignore them: the controller has already recovered.
pub fn route_event<B: BrushTool, C: Clock>(
    event: &InputEvent,
    controller: &mut CanvasController<B, C>,
) -> CanvasResult<()> {
    let result = match event {
        InputEvent::StylusDown { position, pressure } => controller.stylus_down(*position, *pressure),
        InputEvent::StylusMove { position, pressure } => controller.stylus_move(*position, *pressure).map(|_| ()),
        InputEvent::StylusUp { position } => controller.stylus_up(*position),
        InputEvent::GestureBegin(kind) => controller.begin_gesture(*kind),
        InputEvent::PanUpdate { offset } => controller.update_pan(*offset),
        InputEvent::ZoomUpdate { scale } => controller.update_zoom(*scale),
        InputEvent::RotateUpdate { clockwise_delta } => controller.update_rotate(*clockwise_delta),
        InputEvent::GestureEnd(kind) => controller.end_gesture(*kind),
        InputEvent::Resize { size } => controller.resize(*size),
    };

    if let Err(err) = &result {
        if err.is_fault() {
            log::warn!(target: "canvas", "Input fault: {err}");
        } else {
            log::error!(target: "canvas", "{err}");
        }
    }
    result
}
