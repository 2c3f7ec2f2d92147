//! # Group Flow
//!
//! Lays out a page or nested panel: an optional header, then its rows from
//! top to bottom.
//!
//! A row is laid out inside a margin scope. The row's width is split into
//! one slot per visible element (see [`distribute_widths`]) with one unit
//! width between neighbours, and each element is laid out with the left and
//! right margins narrowed to its slot. Panels recurse back into this module;
//! questions go to the item engine.
//!
//! When a row is done the flow continues below the lowest edge the row
//! reached on the last physical page it touched, and a divider is emitted.

use log::debug;

use super::block::flow_bottom;
use super::item::layout_item;
use super::width::{distribute_widths, RenderWidth};
use super::{
    Block, BlockKind, CompositeBlock, DividerBlock, LayoutBlock, LayoutContext, LayoutEngine,
    LayoutMode, DESCRIPTION_FONT_SIZE_SCALE, EPSILON, PANEL_CONT_GAP_SCALE, PANEL_DESC_GAP_SCALE,
    QUES_GAP_VERT_SCALE, TITLE_GROUP_FONT_SIZE_SCALE,
};
use crate::backend::Font;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::model::{Element, Group, Row};
use crate::text::place_text;

/// Title and description as one composite, title first.
///
/// Empty texts are skipped, so the composite is empty when both are.
pub fn layout_header(
    ctx: &mut LayoutContext<'_>,
    title: &str,
    description: &str,
    point: Point,
    title_font: Font,
) -> Result<CompositeBlock> {
    let mut header = CompositeBlock::new();
    let mut desc_point = point;

    if !title.trim().is_empty() {
        let frag = place_text(ctx, point, title, title_font, LayoutMode::Commit)?;
        header.add(LayoutBlock::new(
            frag.rect,
            frag.page,
            BlockKind::Text {
                text: title.to_string(),
            },
        ));
        desc_point = frag.rect.bottom_left();
        if !description.trim().is_empty() {
            desc_point.y_top += ctx.unit_width() * PANEL_DESC_GAP_SCALE;
        }
    }

    if !description.trim().is_empty() {
        let font = Font::regular(ctx.font_size() * DESCRIPTION_FONT_SIZE_SCALE);
        let frag = place_text(ctx, desc_point, description, font, LayoutMode::Commit)?;
        header.add(LayoutBlock::new(
            frag.rect,
            frag.page,
            BlockKind::Text {
                text: description.to_string(),
            },
        ));
    }
    Ok(header)
}

impl LayoutEngine<'_> {
    /// Lay out a panel nested in a row and hand the result to the group
    /// hook.
    pub fn layout_panel(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        group: &Group,
        point: Point,
    ) -> Result<Vec<Block>> {
        let blocks = {
            let indent = ctx.measure_units(group.inner_indent)?;
            let mut scope = ctx.scoped_margins();
            scope.margins_mut().left += indent;
            let point = Point::new(point.x_left + indent, point.y_top);
            self.layout_group(&mut scope, group, point)?
        };
        self.hooks.on_render_group(ctx, group, blocks)
    }

    /// Lay out a page or panel with its top-left corner on `point`.
    ///
    /// The header sits on `point` and rows start below it at the same x.
    pub fn layout_group(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        group: &Group,
        point: Point,
    ) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        if !group.visible {
            return Ok(blocks);
        }
        let mut point = point;

        if self.options.show_page_titles {
            let font = Font::bold(ctx.font_size() * TITLE_GROUP_FONT_SIZE_SCALE);
            let header = layout_header(ctx, &group.title, &group.description, point, font)?;
            if !header.is_empty() {
                let header: Block = header.into();
                if let Some(bottom) = flow_bottom(std::slice::from_ref(&header)) {
                    point.y_top = bottom + ctx.unit_height() * PANEL_CONT_GAP_SCALE;
                }
                blocks.push(header);
            }
        }

        for row in group.rows.iter().filter(|r| r.visible) {
            let row_blocks = self.layout_row(ctx, row, point)?;
            let Some(bottom) = flow_bottom(&row_blocks) else {
                continue;
            };
            point.y_top = bottom + ctx.unit_height() * QUES_GAP_VERT_SCALE;
            point.x_left = ctx.margins().left;
            blocks.extend(row_blocks);

            let divider = DividerBlock {
                rect: Rect::new(
                    point.x_left,
                    ctx.paper_width() - ctx.margins().right,
                    point.y_top,
                    point.y_top,
                ),
                page: ctx.page_index(),
            };
            blocks.push(divider.into());
            point.y_top += EPSILON;
            ctx.set_cursor(point);
            debug!(
                "group {:?}: next row at y={:.2} on page {}",
                group.name,
                point.y_top,
                ctx.page_index()
            );
        }
        Ok(blocks)
    }

    /// Lay out the visible elements of `row` side by side.
    fn layout_row(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        row: &Row,
        point: Point,
    ) -> Result<Vec<Block>> {
        let elements = row.visible_elements();
        let mut blocks = Vec::new();
        if elements.is_empty() {
            return Ok(blocks);
        }

        let mut scope = ctx.scoped_margins();
        let specs: Vec<RenderWidth> = elements
            .iter()
            .map(|e| RenderWidth::parse(e.render_width()))
            .collect();
        let gap = scope.unit_width();
        let widths = distribute_widths(&specs, scope.available_width(), gap);
        let start_page = scope.page_index();
        let mut x = scope.margins().left;

        for (element, width) in elements.into_iter().zip(widths) {
            let mut slot = scope.scoped_margins();
            slot.margins_mut().left = x;
            slot.margins_mut().right = slot.paper_width() - x - width;

            // A sibling that moved the row onto a new page drags the rest
            // of the row to that page's top.
            let y_top = if slot.page_index() == start_page {
                point.y_top
            } else {
                slot.margins().top
            };
            let child_point = Point::new(x, y_top);

            match element {
                Element::Panel(group) => {
                    blocks.extend(self.layout_panel(&mut slot, group, child_point)?);
                }
                Element::Question(item) => {
                    let options = self.options;
                    let item_blocks =
                        layout_item(&mut slot, item, child_point, &options, LayoutMode::Commit)?;
                    blocks.extend(item_blocks.into_iter().map(Block::from));
                }
            }
            x += width + gap;
        }
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Metrics, RecordingBackend};
    use crate::model::{Edges, Item, ItemBody, PageConfig, PageSize};

    fn page() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 220.0,
                height: 300.0,
            },
            margin: Edges::uniform(10.0),
        }
    }

    fn question(name: &str) -> Element {
        Element::Question(Item::new(name, "", ItemBody::Text))
    }

    fn leaves(blocks: &[Block]) -> Vec<&LayoutBlock> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Leaf(leaf) => Some(leaf),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn header_skips_empty_parts() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let point = ctx.left_top_point();
        let empty = layout_header(&mut ctx, "", " ", point, Font::bold(13.0)).unwrap();
        assert!(empty.is_empty());

        let title_only = layout_header(&mut ctx, "Title", "", point, Font::bold(13.0)).unwrap();
        assert_eq!(title_only.children().len(), 1);
        assert_eq!(title_only.bounds().unwrap().top_left(), point);
    }

    #[test]
    fn rows_stack_with_a_divider_between() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let group = Group::new(
            "page1",
            vec![Row::new(vec![question("a")]), Row::new(vec![question("b")])],
        );
        let mut engine = LayoutEngine::new();
        let point = ctx.left_top_point();
        let blocks = engine.layout_group(&mut ctx, &group, point).unwrap();

        assert_eq!(blocks.len(), 4);
        assert!(blocks[1].is_divider());
        assert!(blocks[3].is_divider());
        // field 10..20, gap 15, epsilon
        assert_eq!(blocks[1].rect().y_top, 35.0);
        assert!((blocks[2].rect().y_top - 35.01).abs() < 1e-9);
        assert!((ctx.cursor().y_top - 60.02).abs() < 1e-9);
        assert_eq!(ctx.margin_depth(), 0);
    }

    #[test]
    fn siblings_share_the_row() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let group = Group::new("p", vec![Row::new(vec![question("a"), question("b")])]);
        let mut engine = LayoutEngine::new();
        let point = ctx.left_top_point();
        let blocks = engine.layout_group(&mut ctx, &group, point).unwrap();
        let items = leaves(&blocks);

        // 200 wide, 5pt gap: two slots of 97.5
        assert_eq!(items[0].rect, Rect::new(10.0, 107.5, 10.0, 20.0));
        assert_eq!(items[1].rect, Rect::new(112.5, 210.0, 10.0, 20.0));
    }

    #[test]
    fn invisible_children_take_no_space() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let mut hidden = Item::new("hidden", "", ItemBody::Text);
        hidden.visible = false;
        let mut hidden_row = Row::new(vec![question("x")]);
        hidden_row.visible = false;
        let group = Group::new(
            "p",
            vec![
                hidden_row,
                Row::new(vec![Element::Question(hidden), question("a")]),
            ],
        );
        let mut engine = LayoutEngine::new();
        let point = ctx.left_top_point();
        let blocks = engine.layout_group(&mut ctx, &group, point).unwrap();
        let items = leaves(&blocks);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].rect, Rect::new(10.0, 210.0, 10.0, 20.0));
    }

    #[test]
    fn panel_indent_covers_header_and_rows() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let mut panel = Group::new("panel", vec![Row::new(vec![question("a")])]).with_title("P");
        panel.inner_indent = 2;
        let group = Group::new("p", vec![Row::new(vec![Element::Panel(panel)])]);
        let mut engine = LayoutEngine::new();
        let point = ctx.left_top_point();
        let blocks = engine.layout_group(&mut ctx, &group, point).unwrap();

        let Block::Composite(header) = &blocks[0] else {
            panic!("expected panel header first, got {:?}", blocks[0]);
        };
        // two units of 5pt
        assert_eq!(header.bounds().unwrap().x_left, 20.0);
        // header 13pt tall, then one unit height
        let item = leaves(&blocks)[0];
        assert_eq!(item.rect.x_left, 20.0);
        assert_eq!(item.rect.y_top, 10.0 + 13.0 + 10.0);
        assert_eq!(ctx.margin_depth(), 0);
    }

    #[test]
    fn pages_ignore_inner_indent() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let mut group = Group::new("p", vec![Row::new(vec![question("a")])]).with_title("P");
        group.inner_indent = 3;
        let mut engine = LayoutEngine::new();
        let point = ctx.left_top_point();
        let blocks = engine.layout_group(&mut ctx, &group, point).unwrap();

        assert_eq!(blocks[0].rect().x_left, 10.0);
        assert_eq!(leaves(&blocks)[0].rect.x_left, 10.0);
    }
}
