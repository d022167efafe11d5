use std::path::PathBuf;

use egui::{Key, Modifiers};

use crate::canvas::CanvasController;
use crate::config::CanvasConfig;
use crate::coords::Viewport;
use crate::input::{route_event, InputHandler};
use crate::renderer::CanvasRenderer;
use crate::tools::StrokeBrush;
use crate::transform::CanvasTransform;

/// Storage key for the view transform
const VIEW_KEY: &str = "painter_canvas_view";

/// Save/Open target when the config names no document
const DEFAULT_DOCUMENT_FILE: &str = "painting.json";

/// Hosts one canvas in an eframe window
pub struct PaintApp {
    controller: CanvasController<StrokeBrush>,
    input: InputHandler,
    renderer: CanvasRenderer,
    config: CanvasConfig,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: CanvasConfig) -> Self {
        let mut app = Self::from_config(config);

        if let Some(path) = app.config.document_path.clone() {
            if path.exists() {
                if let Err(err) = app.controller.load(&path) {
                    log::error!("Could not open {}: {err}", path.display());
                }
            }
        }

        // A view stored by eframe wins over the one saved with the document
        if let Some(view) = cc
            .storage
            .and_then(|storage| eframe::get_value::<CanvasTransform>(storage, VIEW_KEY))
        {
            app.controller
                .manipulate(view.zoom(), view.angle(), view.translation());
        }

        app
    }

    pub fn from_config(config: CanvasConfig) -> Self {
        let brush = StrokeBrush::new(config.brush.to_brush(), config.brush.color());
        let [width, height] = config.window_size;
        let viewport = Viewport::new(width, height)
            .inspect_err(|err| log::warn!("{err}; using the default window size"))
            .unwrap_or_default();

        Self {
            controller: CanvasController::new(brush, viewport),
            input: InputHandler::new(config.default_pressure),
            renderer: CanvasRenderer::new(),
            config,
        }
    }

    /// Where Save and Open read and write. Falls back to a file in the
    /// working directory when no path is configured.
    fn document_path(&self) -> PathBuf {
        self.config
            .document_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_FILE))
    }

    fn save_document(&mut self) {
        let path = self.document_path();
        match self.controller.save(&path) {
            // Later saves, including the one on shutdown, go to the same file
            Ok(()) => self.config.document_path = Some(path),
            Err(err) => log::error!("Could not save {}: {err}", path.display()),
        }
    }

    fn open_document(&mut self) {
        let path = self.document_path();
        if let Err(err) = self.controller.load(&path) {
            log::error!("Could not open {}: {err}", path.display());
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let [new, save, open, reset] = ctx.input_mut(|i| {
            [Key::N, Key::S, Key::O, Key::Num0].map(|key| i.consume_key(Modifiers::COMMAND, key))
        });

        if new {
            self.controller.new_document();
        }
        if save {
            self.save_document();
        }
        if open {
            self.open_document();
        }
        if reset {
            self.controller.reset_view();
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, VIEW_KEY, self.controller.transform());

        if let Some(path) = &self.config.document_path {
            if let Err(err) = self.controller.save(path) {
                log::error!("Could not save {}: {err}", path.display());
            }
        }
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;

                for event in self.input.process_input(ctx, rect) {
                    // Faults are logged by the router and already recovered from
                    let _ = route_event(&event, &mut self.controller);
                }

                self.renderer.render(
                    &painter,
                    rect,
                    self.controller.transform(),
                    self.controller.document(),
                );
            });

        if self.controller.take_redraw_request() {
            ctx.request_repaint();
        }
    }
}
