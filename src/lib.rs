#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod coords;
pub mod document;
pub mod error;
pub mod input;
pub mod renderer;
pub mod stroke;
pub mod tools;
pub mod transform;
pub mod util;

pub use app::PaintApp;
pub use canvas::CanvasController;
pub use config::CanvasConfig;
pub use coords::{to_device, to_logical, ViewMapping, Viewport};
pub use document::Document;
pub use error::{CanvasError, CanvasResult, GestureFault, StrokeFault};
pub use input::{route_event, GestureKind, InputEvent, InputHandler};
pub use renderer::CanvasRenderer;
pub use stroke::{Sample, StrokeSessionManager};
pub use tools::{BrushTool, StrokeBrush};
pub use transform::CanvasTransform;
