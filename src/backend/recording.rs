//! A backend that measures with [`Metrics`] and records every drawing
//! operation instead of producing a file.
//!
//! The CLI uses it to compute layouts; tests use it to observe exactly what
//! a layout run asked the renderer to do.

use serde::Serialize;

use super::{Backend, FieldMeta, Font, Metrics, TextAlign, TextSize};
use crate::error::BackendError;
use crate::geometry::{Point, Rect};

/// A recorded backend call, tagged with the physical page it landed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Text {
        page: usize,
        text: String,
        origin: Point,
        font: Font,
        align: TextAlign,
    },
    Field {
        page: usize,
        rect: Rect,
        field: FieldMeta,
    },
    Image {
        page: usize,
        rect: Rect,
        src: String,
    },
}

impl DrawOp {
    pub fn page(&self) -> usize {
        match self {
            DrawOp::Text { page, .. } | DrawOp::Field { page, .. } | DrawOp::Image { page, .. } => {
                *page
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    metrics: Metrics,
    page: usize,
    pages_added: usize,
    ops: Vec<DrawOp>,
}

impl RecordingBackend {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            metrics,
            ..Default::default()
        }
    }

    /// Number of `add_page` calls received.
    pub fn pages_added(&self) -> usize {
        self.pages_added
    }

    /// Physical pages touched so far (at least one).
    pub fn page_count(&self) -> usize {
        self.page + 1
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&Rect, &FieldMeta)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Field { rect, field, .. } => Some((rect, field)),
            _ => None,
        })
    }
}

impl Backend for RecordingBackend {
    fn measure_text(&self, text: &str, font: &Font) -> Result<TextSize, BackendError> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(BackendError::new(format!("invalid font size {}", font.size)));
        }
        Ok(self.metrics.measure(text, font))
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &Font,
        align: TextAlign,
    ) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Text {
            page: self.page,
            text: text.to_string(),
            origin,
            font: *font,
            align,
        });
        Ok(())
    }

    fn add_interactive_field(&mut self, rect: Rect, field: &FieldMeta) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Field {
            page: self.page,
            rect,
            field: field.clone(),
        });
        Ok(())
    }

    fn draw_image(&mut self, rect: Rect, src: &str) -> Result<(), BackendError> {
        self.ops.push(DrawOp::Image {
            page: self.page,
            rect,
            src: src.to_string(),
        });
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), BackendError> {
        self.page += 1;
        self.pages_added += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_remember_their_page() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let font = Font::regular(10.0);
        backend
            .draw_text("one", Point::new(0.0, 5.0), &font, TextAlign::Left)
            .unwrap();
        backend.add_page().unwrap();
        backend
            .draw_text("two", Point::new(0.0, 5.0), &font, TextAlign::Left)
            .unwrap();
        let pages: Vec<usize> = backend.ops().iter().map(DrawOp::page).collect();
        assert_eq!(pages, vec![0, 1]);
        assert_eq!(backend.pages_added(), 1);
        assert_eq!(backend.page_count(), 2);
        assert_eq!(backend.texts().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn text_ops_record_left_anchor() {
        let mut backend = RecordingBackend::default();
        backend
            .draw_text("hi", Point::new(3.0, 5.0), &Font::regular(10.0), TextAlign::Left)
            .unwrap();
        let json = serde_json::to_value(&backend.ops()[0]).unwrap();
        assert_eq!(json["align"], "Left");
        assert_eq!(json["text"], "hi");
    }

    #[test]
    fn zero_font_size_fails_measurement() {
        let backend = RecordingBackend::default();
        assert!(backend.measure_text("x", &Font::regular(0.0)).is_err());
    }
}
