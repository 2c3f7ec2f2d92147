//! # Layout Context
//!
//! Mutable state for one document render: paper geometry, the margin stack,
//! the physical page counter and the vertical cursor. It also fronts the
//! [`Backend`] so engine code has a single handle for measuring and drawing.
//!
//! A context belongs to exactly one render. Parallel renders need separate
//! contexts and separate backends.
//!
//! Margins are only ever adjusted inside a [`MarginScope`], which restores
//! the previous margins when dropped. Sibling slots in a row and nested
//! panel indents therefore cannot leak into each other, whatever path the
//! code leaves a scope by.

use std::ops::{Deref, DerefMut};

use log::debug;

use super::LayoutMode;
use crate::backend::{Backend, FieldMeta, Font, TextAlign, TextSize};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::model::PageConfig;

/// Offsets from the paper edges, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bot: f64,
}

/// Push/pop counters for the margin stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarginStats {
    pub pushed: usize,
    pub popped: usize,
}

pub struct LayoutContext<'b> {
    backend: &'b mut dyn Backend,
    paper_width: f64,
    paper_height: f64,
    margins: Margins,
    margin_stack: Vec<Margins>,
    stats: MarginStats,
    font_size: f64,
    unit_width: f64,
    unit_height: f64,
    page_index: usize,
    pages_added: usize,
    cursor: Point,
}

impl<'b> LayoutContext<'b> {
    /// Create a context for the given paper. Unit sizes are measured from
    /// the glyph "O" at `font_size`, so this already talks to the backend.
    pub fn new(config: &PageConfig, font_size: f64, backend: &'b mut dyn Backend) -> Result<Self> {
        let (paper_width, paper_height) = config.size.dimensions();
        let unit = backend.measure_text("O", &Font::regular(font_size))?;
        let margins = Margins {
            left: config.margin.left,
            right: config.margin.right,
            top: config.margin.top,
            bot: config.margin.bottom,
        };
        Ok(Self {
            backend,
            paper_width,
            paper_height,
            margins,
            margin_stack: Vec::new(),
            stats: MarginStats::default(),
            font_size,
            unit_width: unit.width,
            unit_height: unit.height,
            page_index: 0,
            pages_added: 0,
            cursor: Point::new(margins.left, margins.top),
        })
    }

    // ── Margins ────────────────────────────────────────────────

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn margins_mut(&mut self) -> &mut Margins {
        &mut self.margins
    }

    /// Snapshot the current margins. Prefer [`Self::scoped_margins`].
    pub fn push_margins(&mut self) {
        self.margin_stack.push(self.margins);
        self.stats.pushed += 1;
    }

    /// Restore the most recent snapshot.
    pub fn pop_margins(&mut self) {
        debug_assert!(!self.margin_stack.is_empty(), "unbalanced pop_margins");
        if let Some(saved) = self.margin_stack.pop() {
            self.margins = saved;
            self.stats.popped += 1;
        }
    }

    /// Push the margins and get a guard that pops them when dropped.
    pub fn scoped_margins(&mut self) -> MarginScope<'_, 'b> {
        self.push_margins();
        MarginScope { ctx: self }
    }

    pub fn margin_depth(&self) -> usize {
        self.margin_stack.len()
    }

    pub fn margin_stats(&self) -> MarginStats {
        self.stats
    }

    // ── Paper & units ──────────────────────────────────────────

    pub fn paper_width(&self) -> f64 {
        self.paper_width
    }

    pub fn paper_height(&self) -> f64 {
        self.paper_height
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Horizontal spacing unit: the width of "O" at the base font size.
    pub fn unit_width(&self) -> f64 {
        self.unit_width
    }

    /// Vertical spacing unit: the height of "O" at the base font size.
    pub fn unit_height(&self) -> f64 {
        self.unit_height
    }

    /// Width between the current left and right margins.
    pub fn available_width(&self) -> f64 {
        self.paper_width - self.margins.left - self.margins.right
    }

    /// Width from `x` to the right margin.
    pub fn available_width_from(&self, x: f64) -> f64 {
        (self.paper_width - self.margins.right - x).max(0.0)
    }

    pub fn left_top_point(&self) -> Point {
        Point::new(self.margins.left, self.margins.top)
    }

    // ── Pages ──────────────────────────────────────────────────

    /// Whether something ending at `y_bot` would cross the bottom margin.
    pub fn is_new_page_element(&self, y_bot: f64) -> bool {
        y_bot > self.paper_height - self.margins.bot
    }

    /// Start a new physical page and move the cursor to its top-left corner.
    pub fn add_page(&mut self) -> Result<()> {
        self.backend.add_page()?;
        self.page_index += 1;
        self.pages_added += 1;
        self.cursor = self.left_top_point();
        debug!("page break: now on physical page {}", self.page_index);
        Ok(())
    }

    /// Make sure `rect` fits on the current page.
    ///
    /// When committing and the rect would cross the bottom margin, a page is
    /// added and the rect moves to the new page's top margin. Rects already
    /// starting at the top margin are left alone. Measuring never breaks.
    pub fn fit_to_page(&mut self, rect: Rect, mode: LayoutMode) -> Result<Rect> {
        if !mode.commits()
            || !self.is_new_page_element(rect.y_bot)
            || rect.y_top <= self.margins.top
        {
            return Ok(rect);
        }
        self.add_page()?;
        Ok(rect.translate(0.0, self.margins.top - rect.y_top))
    }

    /// Zero-based index of the physical page being filled.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn pages_added(&self) -> usize {
        self.pages_added
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn set_cursor(&mut self, point: Point) {
        self.cursor = point;
    }

    // ── Backend ────────────────────────────────────────────────

    pub fn measure_text(&self, text: &str, font: &Font) -> Result<TextSize> {
        Ok(self.backend.measure_text(text, font)?)
    }

    /// Width of `n` unit glyphs, used for indents.
    pub fn measure_units(&self, n: u32) -> Result<f64> {
        if n == 0 {
            return Ok(0.0);
        }
        let unit = self.measure_text("O", &Font::regular(self.font_size))?.width;
        Ok(unit * f64::from(n))
    }

    pub fn draw_text(&mut self, text: &str, origin: Point, font: &Font) -> Result<()> {
        Ok(self.backend.draw_text(text, origin, font, TextAlign::Left)?)
    }

    pub fn add_interactive_field(&mut self, rect: Rect, field: &FieldMeta) -> Result<()> {
        Ok(self.backend.add_interactive_field(rect, field)?)
    }

    pub fn draw_image(&mut self, rect: Rect, src: &str) -> Result<()> {
        Ok(self.backend.draw_image(rect, src)?)
    }
}

/// Margin snapshot guard. Derefs to the context; restores the margins that
/// were active when it was created on drop.
pub struct MarginScope<'s, 'b> {
    ctx: &'s mut LayoutContext<'b>,
}

impl<'b> Deref for MarginScope<'_, 'b> {
    type Target = LayoutContext<'b>;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl<'b> DerefMut for MarginScope<'_, 'b> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for MarginScope<'_, '_> {
    fn drop(&mut self) {
        self.ctx.pop_margins();
    }
}
