//! # Rendering Backend
//!
//! The layout engine never touches fonts, pixels or PDF objects. Everything
//! it needs from the outside world goes through [`Backend`]: measuring a
//! string, drawing it, placing an interactive form field or an image, and
//! starting a new physical page.
//!
//! Measurement must be deterministic for identical text and font, and must
//! not have side effects. The layout engine relies on that to measure the
//! same content twice (a dry pass, then a committing pass) and get the same
//! geometry both times.

pub mod metrics;
pub mod recording;

pub use metrics::{FontMetrics, Metrics};
pub use recording::{DrawOp, RecordingBackend};

use serde::Serialize;

use crate::error::BackendError;
use crate::geometry::{Point, Rect};

/// Measured extent of a single line of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// The font a piece of text is measured and drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Font {
    pub size: f64,
    pub weight: FontWeight,
}

impl Font {
    pub fn regular(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }
}

/// Horizontal anchor of a text origin. Layout only ever anchors left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    #[default]
    Left,
}

/// What kind of interactive form field a rectangle becomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    TextField { multiline: bool },
    CheckBox,
    RadioButton { group: String },
}

/// Metadata attached to an interactive field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    pub name: String,
    pub kind: FieldKind,
    pub read_only: bool,
    pub value: String,
}

/// The services a layout run consumes.
///
/// Only `measure_text` is called during dry passes. The drawing methods and
/// `add_page` are called exclusively while committing.
pub trait Backend {
    /// Measure a single line of text.
    fn measure_text(&self, text: &str, font: &Font) -> Result<TextSize, BackendError>;

    /// Draw a single line of text. `origin.y_top` is the vertical middle of
    /// the line.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &Font,
        align: TextAlign,
    ) -> Result<(), BackendError>;

    fn add_interactive_field(&mut self, rect: Rect, field: &FieldMeta) -> Result<(), BackendError>;

    fn draw_image(&mut self, rect: Rect, src: &str) -> Result<(), BackendError>;

    /// Start a new physical page.
    fn add_page(&mut self) -> Result<(), BackendError>;
}
