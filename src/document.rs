use std::fmt;
use std::fs;
use std::path::Path;

use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::tools::BrushId;
use crate::transform::CanvasTransform;

/// Errors that can occur while saving or loading a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to serialize document: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write document: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read document file {path}: {reason}")]
    ReadError { path: String, reason: String },
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// A unique identifier for a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeId(pub Uuid);

impl StrokeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geometry accumulated by the brush tool for one stroke. All arrays are
/// parallel: entry `i` describes the `i`th sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeData {
    pub id: StrokeId,
    pub brush_id: BrushId,
    pub color: Color32,
    /// Logical canvas coordinates
    pub positions: Vec<Pos2>,
    pub pressures: Vec<f32>,
    /// Brush diameter in logical units
    pub sizes: Vec<f32>,
    /// Opacity per sample, from the brush flow setting
    pub alphas: Vec<f32>,
    /// Seconds since the stroke started
    pub times: Vec<f32>,
}

impl StrokeData {
    pub fn new(brush_id: BrushId, color: Color32) -> Self {
        Self {
            id: StrokeId::new(),
            brush_id,
            color,
            positions: Vec::new(),
            pressures: Vec::new(),
            sizes: Vec::new(),
            alphas: Vec::new(),
            times: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The strokes painted so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    strokes: Vec<StrokeData>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_stroke(&mut self, stroke: StrokeData) -> StrokeId {
        let id = stroke.id;
        self.strokes.push(stroke);
        id
    }

    pub fn stroke_mut(&mut self, id: StrokeId) -> Option<&mut StrokeData> {
        // The stroke being drawn is nearly always the last one
        self.strokes.iter_mut().rev().find(|stroke| stroke.id == id)
    }

    pub fn strokes(&self) -> &[StrokeData] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}

/// What gets written to disk: the document plus the view it was left in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    /// Version of the application that wrote the file
    pub version: String,
    pub view: CanvasTransform,
    pub document: Document,
}

impl DocumentFile {
    pub fn new(document: Document, view: CanvasTransform) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            view,
            document,
        }
    }
}

pub fn save_document(path: &Path, document: &Document, view: &CanvasTransform) -> DocumentResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = DocumentFile::new(document.clone(), *view);
    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json)?;

    log::info!("Saved {} strokes to {}", document.len(), path.display());
    Ok(())
}

pub fn load_document(path: &Path) -> DocumentResult<DocumentFile> {
    let json = fs::read_to_string(path).map_err(|e| DocumentError::ReadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut file: DocumentFile = serde_json::from_str(&json)?;

    if file.version != env!("CARGO_PKG_VERSION") {
        log::warn!(
            "Document version {} differs from current version {}",
            file.version,
            env!("CARGO_PKG_VERSION")
        );
    }
    // Route the stored zoom through the clamp in case the file was edited by hand
    file.view = CanvasTransform::new(file.view.zoom(), file.view.angle(), file.view.translation());

    log::info!("Loaded {} strokes from {}", file.document.len(), path.display());
    Ok(file)
}
