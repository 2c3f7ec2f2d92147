//! # Document Assembly
//!
//! The top of the layout walk: the document header, then every visible page.
//!
//! The header is the document title and description, optionally composed
//! with a logo. Where the logo goes decides the order:
//!
//! - **left**: logo first, title to its right with the left margin pushed
//!   past the logo.
//! - **top**: logo first, title below it.
//! - **right**: title first with the right margin pulled in, then the logo
//!   at the right edge, put in front of the title in the composite.
//! - **bottom**: title first, logo centered below it.
//!
//! The header only ever appears on the first logical page, ahead of that
//! page's own blocks.

use log::debug;

use super::block::{flow_bottom, trim_trailing_dividers};
use super::flow::layout_header;
use super::{
    Block, BlockKind, CompositeBlock, EngineOptions, LayoutBlock, LayoutContext, LayoutEngine,
    LayoutMode, PANEL_CONT_GAP_SCALE, PX_TO_PT, TITLE_DOCUMENT_FONT_SIZE_SCALE,
};
use crate::backend::Font;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::model::{Document, Logo, LogoPosition};

impl LayoutEngine<'_> {
    /// Lay out `document` into logical pages of top-level blocks.
    ///
    /// Every visible page after the first starts on a fresh physical page.
    /// Pages that overflow add physical pages of their own, so a logical
    /// page can hold blocks for several physical ones.
    pub fn layout(
        &mut self,
        document: &Document,
        ctx: &mut LayoutContext<'_>,
    ) -> Result<Vec<Vec<Block>>> {
        self.options = EngineOptions {
            show_title: document.show_title,
            show_page_titles: document.show_page_titles,
            show_question_numbers: document.show_question_numbers,
        };
        let depth = ctx.margin_depth();

        let header = self.layout_document_header(ctx, document)?;
        let mut first_point = ctx.left_top_point();
        let mut header_blocks = Vec::new();
        if !header.is_empty() {
            let header: Block = header.into();
            if let Some(bottom) = flow_bottom(std::slice::from_ref(&header)) {
                first_point.y_top = bottom + ctx.unit_height() * PANEL_CONT_GAP_SCALE;
            }
            header_blocks.push(header);
        }

        let mut pages: Vec<Vec<Block>> = Vec::new();
        for (index, page) in document.visible_pages().enumerate() {
            let point = if index == 0 {
                first_point
            } else {
                ctx.add_page()?;
                ctx.left_top_point()
            };
            debug!(
                "page {:?} starts on physical page {} at y={:.2}",
                page.name,
                ctx.page_index(),
                point.y_top
            );

            let blocks = self.layout_group(ctx, page, point)?;
            let mut blocks = self.hooks.on_render_page(ctx, page, blocks)?;
            trim_trailing_dividers(&mut blocks);

            if index == 0 {
                let mut first = std::mem::take(&mut header_blocks);
                first.extend(blocks);
                pages.push(first);
            } else {
                pages.push(blocks);
            }
        }
        if pages.is_empty() && !header_blocks.is_empty() {
            pages.push(header_blocks);
        }

        debug_assert_eq!(ctx.margin_depth(), depth, "margin stack unbalanced");
        debug!(
            "laid out {} pages on {} physical pages",
            pages.len(),
            ctx.page_index() + 1
        );
        Ok(pages)
    }

    /// Title, description and logo as a single composite.
    fn layout_document_header(
        &self,
        ctx: &mut LayoutContext<'_>,
        document: &Document,
    ) -> Result<CompositeBlock> {
        let start = ctx.left_top_point();

        let Some(logo) = &document.logo else {
            return self.layout_document_title(ctx, document, start);
        };

        let mut header = CompositeBlock::new();
        match logo.position {
            LogoPosition::Left => {
                let logo_block = layout_logo(ctx, logo, start)?;
                let gap = ctx.unit_width();
                let mut scope = ctx.scoped_margins();
                scope.margins_mut().left += logo_block.rect.width() + gap;
                let title_point = Point::new(logo_block.rect.x_right + gap, start.y_top);
                header.add(logo_block);
                let title = self.layout_document_title(&mut scope, document, title_point)?;
                add_children(&mut header, title);
            }
            LogoPosition::Top => {
                let logo_block = layout_logo(ctx, logo, start)?;
                let title_point = Point::new(
                    start.x_left,
                    logo_block.rect.y_bot + ctx.unit_height() / 2.0,
                );
                header.add(logo_block);
                let title = self.layout_document_title(ctx, document, title_point)?;
                add_children(&mut header, title);
            }
            LogoPosition::Right => {
                {
                    let gap = ctx.unit_width();
                    let mut scope = ctx.scoped_margins();
                    scope.margins_mut().right += logo.width * PX_TO_PT + gap;
                    let title = self.layout_document_title(&mut scope, document, start)?;
                    add_children(&mut header, title);
                }
                header.unshift(layout_logo(ctx, logo, start)?);
            }
            LogoPosition::Bottom => {
                let title_block = self.layout_document_title(ctx, document, start)?;
                let logo_point = match title_block.bounds() {
                    Some(bounds) => {
                        Point::new(start.x_left, bounds.y_bot + ctx.unit_height() / 2.0)
                    }
                    None => start,
                };
                add_children(&mut header, title_block);
                header.add(layout_logo(ctx, logo, logo_point)?);
            }
        }
        Ok(header)
    }

    fn layout_document_title(
        &self,
        ctx: &mut LayoutContext<'_>,
        document: &Document,
        point: Point,
    ) -> Result<CompositeBlock> {
        if !self.options.show_title {
            return Ok(CompositeBlock::new());
        }
        let font = Font::bold(ctx.font_size() * TITLE_DOCUMENT_FONT_SIZE_SCALE);
        layout_header(ctx, &document.title, &document.description, point, font)
    }
}

fn add_children(into: &mut CompositeBlock, from: CompositeBlock) {
    if !from.is_empty() {
        into.add(from);
    }
}

/// Place and draw the logo on the row starting at `point`.
///
/// Right-positioned logos hug the right margin, left ones the left margin,
/// anything else is centered in the available width.
pub fn layout_logo(ctx: &mut LayoutContext<'_>, logo: &Logo, point: Point) -> Result<LayoutBlock> {
    let width = logo.width * PX_TO_PT;
    let height = logo.height * PX_TO_PT;
    let available = ctx.available_width();
    let shift = match logo.position {
        LogoPosition::Right => available - width,
        LogoPosition::Left => 0.0,
        LogoPosition::Top | LogoPosition::Bottom => (available - width) / 2.0,
    }
    .max(0.0);

    let rect = ctx.fit_to_page(
        Rect::at(Point::new(point.x_left + shift, point.y_top), width, height),
        LayoutMode::Commit,
    )?;
    ctx.draw_image(rect, &logo.src)?;
    Ok(LayoutBlock::new(
        rect,
        ctx.page_index(),
        BlockKind::Image {
            src: logo.src.clone(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Metrics, RecordingBackend};
    use crate::model::{Edges, PageConfig, PageSize};

    fn config() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 400.0,
                height: 400.0,
            },
            margin: Edges::uniform(20.0),
        }
    }

    fn logo(position: LogoPosition) -> Logo {
        Logo {
            src: "logo.png".into(),
            position,
            width: 80.0,
            height: 40.0,
        }
    }

    #[test]
    fn logo_shift_follows_position() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&config(), 10.0, &mut backend).unwrap();
        let point = ctx.left_top_point();

        let right = layout_logo(&mut ctx, &logo(LogoPosition::Right), point).unwrap();
        assert_eq!(right.rect.x_left, 20.0 + 360.0 - 60.0);
        assert_eq!(right.rect.height(), 30.0);

        let left = layout_logo(&mut ctx, &logo(LogoPosition::Left), point).unwrap();
        assert_eq!(left.rect.x_left, 20.0);

        let centered = layout_logo(&mut ctx, &logo(LogoPosition::Top), point).unwrap();
        assert_eq!(centered.rect.x_left, 20.0 + 150.0);
    }

    #[test]
    fn left_logo_pushes_the_title_right() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&config(), 10.0, &mut backend).unwrap();
        let document = Document {
            title: "Survey".into(),
            logo: Some(logo(LogoPosition::Left)),
            ..Default::default()
        };
        let mut engine = LayoutEngine::new();
        let pages = engine.layout(&document, &mut ctx).unwrap();

        let Block::Composite(header) = &pages[0][0] else {
            panic!("expected a header composite");
        };
        assert!(matches!(
            &header.children()[0],
            Block::Leaf(LayoutBlock {
                kind: BlockKind::Image { .. },
                ..
            })
        ));
        // logo 60pt wide, one unit (5pt) gap
        assert_eq!(header.children()[1].rect().x_left, 20.0 + 60.0 + 5.0);
        assert_eq!(header.children()[1].rect().y_top, 20.0);
        assert_eq!(ctx.margin_depth(), 0);
    }

    #[test]
    fn bottom_logo_without_title_sits_at_the_top() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&config(), 10.0, &mut backend).unwrap();
        let document = Document {
            logo: Some(logo(LogoPosition::Bottom)),
            ..Default::default()
        };
        let mut engine = LayoutEngine::new();
        let pages = engine.layout(&document, &mut ctx).unwrap();

        assert_eq!(pages.len(), 1);
        let Block::Composite(header) = &pages[0][0] else {
            panic!("expected a header composite");
        };
        assert_eq!(header.children().len(), 1);
        assert_eq!(header.children()[0].rect().y_top, 20.0);
    }

    #[test]
    fn options_come_from_the_document() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&config(), 10.0, &mut backend).unwrap();
        let document = Document {
            show_page_titles: false,
            show_question_numbers: false,
            ..Default::default()
        };
        let mut engine = LayoutEngine::new();
        engine.layout(&document, &mut ctx).unwrap();
        let options = engine.options();
        assert!(options.show_title);
        assert!(!options.show_page_titles);
        assert!(!options.show_question_numbers);
    }
}
