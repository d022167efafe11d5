use egui::{Pos2, Rect, Vec2};

use super::{GestureKind, InputEvent};

/// Per-frame multi-touch deltas as reported by egui (relative to the previous frame)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchDeltas {
    pub translation: Vec2,
    pub zoom: f32,
    /// Clockwise positive (screen y grows downward)
    pub rotation: f32,
}

/// The slice of one egui frame's input the canvas cares about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub canvas_rect: Rect,
    pub pointer_pos: Option<Pos2>,
    pub primary_pressed: bool,
    pub primary_down: bool,
    pub primary_released: bool,
    /// Latest pen/touch force seen this frame
    pub force: Option<f32>,
    pub multi_touch: Option<TouchDeltas>,
}

impl FrameInput {
    pub fn from_egui(ctx: &egui::Context, canvas_rect: Rect) -> Self {
        ctx.input(|i| {
            let force = i.events.iter().rev().find_map(|event| match event {
                egui::Event::Touch { force, .. } => *force,
                _ => None,
            });
            let multi_touch = i.multi_touch().map(|touch| TouchDeltas {
                translation: touch.translation_delta,
                zoom: touch.zoom_delta,
                rotation: touch.rotation_delta,
            });

            Self {
                canvas_rect,
                pointer_pos: i.pointer.interact_pos(),
                primary_pressed: i.pointer.primary_pressed(),
                primary_down: i.pointer.primary_down(),
                primary_released: i.pointer.primary_released(),
                force,
                multi_touch,
            }
        })
    }
}

/// Running totals of a multi-touch gesture since it began
#[derive(Debug, Clone, Copy)]
struct TouchGesture {
    offset: Vec2,
    scale: f32,
    rotation: f32,
}

impl Default for TouchGesture {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

/// Handles converting raw egui input into canvas [`InputEvent`]s.
///
/// egui reports multi-touch as per-frame deltas; the gesture tracks want the
/// total since the gesture began, so the totals are kept here.
#[derive(Debug)]
pub struct InputHandler {
    default_pressure: f32,
    last_size: Option<Vec2>,
    last_force: Option<f32>,
    /// Canvas-local position of the stylus while a stroke is in progress
    stylus_position: Option<Pos2>,
    touch: Option<TouchGesture>,
}

impl InputHandler {
    pub fn new(default_pressure: f32) -> Self {
        Self {
            default_pressure,
            last_size: None,
            last_force: None,
            stylus_position: None,
            touch: None,
        }
    }

    /// Process this frame's egui input and generate canvas events
    pub fn process_input(&mut self, ctx: &egui::Context, canvas_rect: Rect) -> Vec<InputEvent> {
        self.process_frame(&FrameInput::from_egui(ctx, canvas_rect))
    }

    pub fn process_frame(&mut self, frame: &FrameInput) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let size = frame.canvas_rect.size();
        if size.x > 0.0 && size.y > 0.0 && self.last_size != Some(size) {
            self.last_size = Some(size);
            events.push(InputEvent::Resize { size });
        }

        if let Some(force) = frame.force {
            self.last_force = Some(force);
        }

        if let Some(deltas) = frame.multi_touch {
            self.handle_multi_touch(deltas, &mut events);
            // Fingers on the glass are steering the view, not painting
            return events;
        }
        if self.touch.take().is_some() {
            events.extend(GestureKind::ALL.map(InputEvent::GestureEnd));
        }

        self.handle_stylus(frame, &mut events);
        events
    }

    fn handle_multi_touch(&mut self, deltas: TouchDeltas, events: &mut Vec<InputEvent>) {
        if self.touch.is_none() {
            // A second finger landing mid-stroke ends the stroke
            if let Some(position) = self.stylus_position.take() {
                events.push(InputEvent::StylusUp { position });
            }
            events.extend(GestureKind::ALL.map(InputEvent::GestureBegin));
        }

        let touch = self.touch.get_or_insert_with(TouchGesture::default);
        touch.offset += deltas.translation;
        touch.scale *= deltas.zoom;
        touch.rotation += deltas.rotation;

        events.push(InputEvent::PanUpdate { offset: touch.offset });
        events.push(InputEvent::ZoomUpdate { scale: touch.scale });
        events.push(InputEvent::RotateUpdate {
            clockwise_delta: touch.rotation,
        });
    }

    fn handle_stylus(&mut self, frame: &FrameInput, events: &mut Vec<InputEvent>) {
        let origin = frame.canvas_rect.min;
        let to_local = |pos: Pos2| (pos - origin).to_pos2();
        let pressure = self.last_force.unwrap_or(self.default_pressure);

        if frame.primary_pressed && self.stylus_position.is_none() {
            if let Some(pos) = frame.pointer_pos.filter(|pos| frame.canvas_rect.contains(*pos)) {
                let position = to_local(pos);
                self.stylus_position = Some(position);
                events.push(InputEvent::StylusDown { position, pressure });
            }
        }

        if let (Some(last), Some(pos)) = (self.stylus_position, frame.pointer_pos) {
            let position = to_local(pos);
            if position != last {
                self.stylus_position = Some(position);
                events.push(InputEvent::StylusMove { position, pressure });
            }
        }

        // Released, or the button is simply no longer held (focus lost, pointer gone)
        if let Some(position) = self.stylus_position {
            if frame.primary_released || !frame.primary_down {
                self.stylus_position = None;
                self.last_force = None;
                events.push(InputEvent::StylusUp { position });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn frame(pointer: Option<Pos2>, pressed: bool, down: bool, released: bool) -> FrameInput {
        FrameInput {
            canvas_rect: Rect::from_min_size(pos2(100.0, 50.0), Vec2::new(800.0, 600.0)),
            pointer_pos: pointer,
            primary_pressed: pressed,
            primary_down: down,
            primary_released: released,
            force: None,
            multi_touch: None,
        }
    }

    fn stylus_only(events: Vec<InputEvent>) -> Vec<InputEvent> {
        events.into_iter().filter(InputEvent::is_stylus).collect()
    }

    #[test]
    fn test_first_frame_reports_size() {
        let mut handler = InputHandler::new(1.0);
        let events = handler.process_frame(&frame(None, false, false, false));
        assert_eq!(
            events,
            vec![InputEvent::Resize {
                size: Vec2::new(800.0, 600.0)
            }]
        );
        assert!(handler.process_frame(&frame(None, false, false, false)).is_empty());
    }

    #[test]
    fn test_press_drag_release_becomes_a_stroke() {
        let mut handler = InputHandler::new(0.75);
        let down = handler.process_frame(&frame(Some(pos2(150.0, 60.0)), true, true, false));
        assert_eq!(
            stylus_only(down),
            vec![InputEvent::StylusDown {
                position: pos2(50.0, 10.0),
                pressure: 0.75
            }]
        );

        let moved = handler.process_frame(&frame(Some(pos2(160.0, 70.0)), false, true, false));
        assert_eq!(
            moved,
            vec![InputEvent::StylusMove {
                position: pos2(60.0, 20.0),
                pressure: 0.75
            }]
        );

        let up = handler.process_frame(&frame(Some(pos2(160.0, 70.0)), false, false, true));
        assert_eq!(
            up,
            vec![InputEvent::StylusUp {
                position: pos2(60.0, 20.0)
            }]
        );
    }

    #[test]
    fn test_button_no_longer_held_ends_stroke() {
        let mut handler = InputHandler::new(1.0);
        handler.process_frame(&frame(Some(pos2(150.0, 60.0)), true, true, false));
        handler.process_frame(&frame(Some(pos2(170.0, 80.0)), false, true, false));

        // Focus lost: no release event, the button just reads as up
        let events = handler.process_frame(&frame(Some(pos2(170.0, 80.0)), false, false, false));
        assert_eq!(
            events,
            vec![InputEvent::StylusUp {
                position: pos2(70.0, 30.0)
            }]
        );
        assert!(handler.process_frame(&frame(Some(pos2(180.0, 90.0)), false, false, false)).is_empty());
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut handler = InputHandler::new(1.0);
        let events = handler.process_frame(&frame(Some(pos2(10.0, 10.0)), true, true, false));
        assert!(stylus_only(events).is_empty());
    }

    #[test]
    fn test_touch_force_sets_pressure() {
        let mut handler = InputHandler::new(1.0);
        let mut input = frame(Some(pos2(200.0, 200.0)), true, true, false);
        input.force = Some(0.3);
        let events = stylus_only(handler.process_frame(&input));
        assert_eq!(
            events,
            vec![InputEvent::StylusDown {
                position: pos2(100.0, 150.0),
                pressure: 0.3
            }]
        );
    }

    #[test]
    fn test_multi_touch_deltas_accumulate_and_close_stroke() {
        let mut handler = InputHandler::new(1.0);
        handler.process_frame(&frame(Some(pos2(150.0, 60.0)), true, true, false));

        let mut touch = frame(Some(pos2(150.0, 60.0)), false, true, false);
        touch.multi_touch = Some(TouchDeltas {
            translation: Vec2::new(4.0, 0.0),
            zoom: 2.0,
            rotation: 0.1,
        });
        let first = handler.process_frame(&touch);
        assert_eq!(first[0], InputEvent::StylusUp { position: pos2(50.0, 10.0) });
        assert!(first.contains(&InputEvent::GestureBegin(GestureKind::Zoom)));

        let second = handler.process_frame(&touch);
        assert!(second.contains(&InputEvent::PanUpdate {
            offset: Vec2::new(8.0, 0.0)
        }));
        assert!(second.contains(&InputEvent::ZoomUpdate { scale: 4.0 }));
        assert!(!second.contains(&InputEvent::GestureBegin(GestureKind::Pan)));

        let lifted = handler.process_frame(&frame(None, false, false, false));
        assert_eq!(lifted, GestureKind::ALL.map(InputEvent::GestureEnd).to_vec());
    }
}
