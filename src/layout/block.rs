//! Layout output: positioned blocks.
//!
//! A page is a list of top-level [`Block`]s. Leaves carry a rect, the
//! physical page it sits on, and what it is. Composites group blocks whose
//! bounds are the union of their children. Dividers mark row boundaries.

use serde::Serialize;

use crate::geometry::{merge_rects, Rect};

/// What a leaf block stands for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    /// Header text (document, page or panel title/description).
    Text { text: String },
    /// A content item, or one page's worth of it.
    Item { name: String },
    Image { src: String },
}

/// A leaf with fixed bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBlock {
    pub rect: Rect,
    /// Physical page the rect lives on.
    pub page: usize,
    pub kind: BlockKind,
}

impl LayoutBlock {
    pub fn new(rect: Rect, page: usize, kind: BlockKind) -> Self {
        Self { rect, page, kind }
    }
}

/// An ordered container of blocks.
///
/// Empty means "nothing was rendered", which is different from holding a
/// zero-size child. Check [`CompositeBlock::is_empty`] before appending a
/// composite to a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompositeBlock {
    children: Vec<Block>,
}

impl CompositeBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, block: impl Into<Block>) {
        self.children.push(block.into());
    }

    /// Insert at the front.
    pub fn unshift(&mut self, block: impl Into<Block>) {
        self.children.insert(0, block.into());
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// Union of the children's bounds, `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let rects: Vec<Rect> = self.children.iter().map(Block::rect).collect();
        merge_rects(&rects)
    }
}

/// Horizontal separator emitted after each row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividerBlock {
    pub rect: Rect,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "camelCase")]
pub enum Block {
    Leaf(LayoutBlock),
    Composite(CompositeBlock),
    Divider(DividerBlock),
}

impl Block {
    /// Bounds of the block. An empty composite reports a zero rect.
    pub fn rect(&self) -> Rect {
        match self {
            Block::Leaf(leaf) => leaf.rect,
            Block::Composite(composite) => composite.bounds().unwrap_or_default(),
            Block::Divider(divider) => divider.rect,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Block::Divider(_))
    }

    /// The last physical page any part of this block sits on.
    pub fn last_page(&self) -> usize {
        match self {
            Block::Leaf(leaf) => leaf.page,
            Block::Composite(composite) => composite
                .children
                .iter()
                .map(Block::last_page)
                .max()
                .unwrap_or(0),
            Block::Divider(divider) => divider.page,
        }
    }

    /// Lowest edge of the parts of this block placed on `page`.
    pub fn bottom_on_page(&self, page: usize) -> Option<f64> {
        match self {
            Block::Leaf(leaf) => (leaf.page == page).then_some(leaf.rect.y_bot),
            Block::Composite(composite) => composite
                .children
                .iter()
                .filter_map(|b| b.bottom_on_page(page))
                .reduce(f64::max),
            Block::Divider(divider) => (divider.page == page).then_some(divider.rect.y_bot),
        }
    }
}

impl From<LayoutBlock> for Block {
    fn from(leaf: LayoutBlock) -> Self {
        Block::Leaf(leaf)
    }
}

impl From<CompositeBlock> for Block {
    fn from(composite: CompositeBlock) -> Self {
        Block::Composite(composite)
    }
}

impl From<DividerBlock> for Block {
    fn from(divider: DividerBlock) -> Self {
        Block::Divider(divider)
    }
}

/// Where content following `blocks` continues: the lowest edge on the last
/// physical page they reach. `None` for an empty list.
pub fn flow_bottom(blocks: &[Block]) -> Option<f64> {
    let page = blocks.iter().map(Block::last_page).max()?;
    blocks
        .iter()
        .filter_map(|b| b.bottom_on_page(page))
        .reduce(f64::max)
}

/// Drop dividers from the end of a page.
pub fn trim_trailing_dividers(blocks: &mut Vec<Block>) {
    while blocks.last().is_some_and(Block::is_divider) {
        blocks.pop();
    }
}
