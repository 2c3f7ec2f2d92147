//! # Page-Bounded Layout Engine
//!
//! Turns the document tree into a flat list of positioned blocks per page.
//!
//! The walk is a single depth-first pass over the document:
//!
//! 1. The [document assembler](document) produces the header (title,
//!    description, logo) and then walks every visible page.
//! 2. The [group flow engine](flow) lays out a page or panel: its header,
//!    then each row. A row carves the available width into one slot per
//!    visible element and lays the elements out side by side, recursing
//!    into nested panels.
//! 3. The [item engine](item) lays out one content item: title and
//!    description according to the item's title location, the body
//!    ([body]), and the optional comment field.
//!
//! Every leaf is checked against the page's bottom margin as it is placed.
//! When it doesn't fit, a physical page is added and the leaf moves to the
//! top margin of the new page. Nothing is ever sliced after the fact, so the
//! geometry coming out of the engine is exactly what the backend drew.
//!
//! All geometry flows through a shared [`LayoutContext`]. Sibling calls are
//! strictly sequential because each one depends on where the previous one
//! left the page.

pub mod block;
pub mod body;
pub mod context;
pub mod document;
pub mod flow;
pub mod item;
pub mod width;

pub use block::{Block, BlockKind, CompositeBlock, DividerBlock, LayoutBlock};
pub use context::{LayoutContext, MarginScope, MarginStats, Margins};

use crate::error::Result;
use crate::model::Group;

/// Vertical gap after each row, in unit heights.
pub const QUES_GAP_VERT_SCALE: f64 = 1.5;
/// Gap between a group header and its content, in unit heights.
pub const PANEL_CONT_GAP_SCALE: f64 = 1.0;
/// Gap between a title and its description, in unit widths.
pub const PANEL_DESC_GAP_SCALE: f64 = 0.25;
/// Nudge after a row divider so the next row never ties with it.
pub const EPSILON: f64 = 0.01;

pub const DESCRIPTION_FONT_SIZE_SCALE: f64 = 2.0 / 3.0;
pub const TITLE_GROUP_FONT_SIZE_SCALE: f64 = 1.3;
pub const TITLE_DOCUMENT_FONT_SIZE_SCALE: f64 = 1.7;

/// CSS pixels to points.
pub const PX_TO_PT: f64 = 72.0 / 96.0;

/// Whether a layout pass only measures or also draws.
///
/// A measuring pass has no side effects at all: no drawing, no fields, no
/// page breaks. Running the same content through both modes at the same
/// point yields the same geometry as long as no page break is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Measure,
    Commit,
}

impl LayoutMode {
    pub fn commits(self) -> bool {
        matches!(self, LayoutMode::Commit)
    }
}

/// Post-layout hooks. Each receives the blocks produced for a panel or a
/// page and returns the list the engine should keep, possibly with blocks
/// inserted, removed or reordered.
pub trait RenderHooks {
    /// Called after a nested panel's rows are laid out.
    fn on_render_group(
        &mut self,
        _ctx: &mut LayoutContext<'_>,
        _group: &Group,
        blocks: Vec<Block>,
    ) -> Result<Vec<Block>> {
        Ok(blocks)
    }

    /// Called after a page's rows are laid out, before trailing dividers
    /// are trimmed.
    fn on_render_page(
        &mut self,
        _ctx: &mut LayoutContext<'_>,
        _page: &Group,
        blocks: Vec<Block>,
    ) -> Result<Vec<Block>> {
        Ok(blocks)
    }
}

/// Hooks that keep every block as is.
pub struct NoHooks;

impl RenderHooks for NoHooks {}

impl<H: RenderHooks + ?Sized> RenderHooks for &mut H {
    fn on_render_group(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        group: &Group,
        blocks: Vec<Block>,
    ) -> Result<Vec<Block>> {
        (**self).on_render_group(ctx, group, blocks)
    }

    fn on_render_page(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        page: &Group,
        blocks: Vec<Block>,
    ) -> Result<Vec<Block>> {
        (**self).on_render_page(ctx, page, blocks)
    }
}

/// Options the engine reads from the document once per render.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub show_title: bool,
    pub show_page_titles: bool,
    pub show_question_numbers: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            show_title: true,
            show_page_titles: true,
            show_question_numbers: true,
        }
    }
}

/// The main layout engine.
pub struct LayoutEngine<'h> {
    hooks: Box<dyn RenderHooks + 'h>,
    options: EngineOptions,
}

impl Default for LayoutEngine<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'h> LayoutEngine<'h> {
    pub fn new() -> Self {
        Self {
            hooks: Box::new(NoHooks),
            options: EngineOptions::default(),
        }
    }

    /// Use custom post-layout hooks.
    pub fn with_hooks(hooks: impl RenderHooks + 'h) -> Self {
        Self {
            hooks: Box::new(hooks),
            options: EngineOptions::default(),
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }
}
