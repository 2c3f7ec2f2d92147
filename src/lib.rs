//! # Formflow
//!
//! A page-bounded layout engine for form documents.
//!
//! A document is a tree: pages, each a group of rows; a row holds panels
//! (nested groups) and questions side by side. Formflow walks that tree once,
//! top to bottom, and produces positioned rectangles that never straddle a
//! page boundary. Whenever a piece of content would cross the bottom margin
//! a physical page is added right there and the content continues at the
//! top of it, so the drawing calls issued along the way and the returned
//! geometry always agree.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    : Document tree: pages, panels, rows, questions
//!       ↓
//!   [layout]   : Document header, group flow, item placement
//!       ↓         (measures and draws through [backend])
//!   Vec<Vec<Block>>: logical pages of positioned blocks
//! ```
//!
//! The rendering side is a [`backend::Backend`]. The crate ships a
//! [`backend::RecordingBackend`] that measures with built-in Helvetica or
//! TrueType metrics and records every draw call.

pub mod backend;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod text;

pub use error::{FormflowError, Result};

use serde::Serialize;

use backend::{Backend, DrawOp, Metrics, RecordingBackend};
use layout::{Block, LayoutContext, LayoutEngine};
use model::Document;

/// The outcome of a render with the built-in recording backend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendered {
    /// Logical pages of top-level blocks.
    pub pages: Vec<Vec<Block>>,
    /// Physical pages the backend was asked to produce.
    pub physical_pages: usize,
    /// Everything the layout drew, in order.
    pub ops: Vec<DrawOp>,
}

/// Lay out `document`, measuring and drawing through `backend`.
pub fn layout_document(
    document: &Document,
    backend: &mut dyn Backend,
) -> Result<Vec<Vec<Block>>> {
    let mut ctx = LayoutContext::new(&document.page, document.font_size, backend)?;
    LayoutEngine::new().layout(document, &mut ctx)
}

/// Lay out `document` on a [`RecordingBackend`] using `metrics`.
pub fn render(document: &Document, metrics: Metrics) -> Result<Rendered> {
    let mut backend = RecordingBackend::new(metrics);
    let pages = layout_document(document, &mut backend)?;
    Ok(Rendered {
        pages,
        physical_pages: backend.page_count(),
        ops: backend.ops().to_vec(),
    })
}

/// Lay out a document described as JSON and return the result as JSON.
pub fn layout_json(json: &str, metrics: Metrics) -> Result<String> {
    let document: Document = serde_json::from_str(json)?;
    let rendered = render(&document, metrics)?;
    Ok(serde_json::to_string_pretty(&rendered)?)
}
