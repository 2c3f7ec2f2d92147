//! # Item Layout
//!
//! Lays out one content item: its title and description, its body, and the
//! optional comment field underneath.
//!
//! Where the title goes is decided per item:
//!
//! - **top** (and default): title, description, then the body. The title
//!   block joins the body's first rect unless the body had to move to a new
//!   page, in which case it stays behind as a rect of its own.
//! - **bottom**: body first. Title and description are measured right
//!   after the body without drawing anything; if they would cross the
//!   bottom margin the page is broken before they are drawn, so the title
//!   never gets separated from its description.
//! - **left**: title and description stacked on the left, body to their
//!   right, top-aligned with the title.
//! - **hidden**: only the body.
//!
//! The item's indent is applied to the left margin for the duration of the
//! layout. Every rect that comes out starts at the item's starting left
//! edge.

use log::trace;

use super::body::{extend_fragments, BodyOwner, LayoutBody};
use super::{
    BlockKind, EngineOptions, LayoutBlock, LayoutContext, LayoutMode,
    DESCRIPTION_FONT_SIZE_SCALE, PANEL_DESC_GAP_SCALE,
};
use crate::backend::{FieldKind, FieldMeta, Font};
use crate::error::Result;
use crate::geometry::{Fragment, Point, Rect};
use crate::model::{Item, TitleLocation};
use crate::text::{draw_block, measure_block, place_text_within};

/// Height of the comment field, in multiples of the font size.
pub const SECONDARY_FIELD_HEIGHT_SCALE: f64 = 3.0;
/// Share of the available width a left-placed title may wrap within.
pub const LEFT_TITLE_WIDTH_SCALE: f64 = 0.4;

/// Title and description placed one under the other.
#[derive(Debug, Clone, Copy)]
struct Heading {
    title: Fragment,
    description: Fragment,
}

impl Heading {
    fn rect(&self) -> Rect {
        self.title.rect.union(&self.description.rect)
    }

    /// The heading as page-separated fragments.
    fn fragments(&self) -> Vec<Fragment> {
        let mut fragments = vec![self.title];
        extend_fragments(&mut fragments, self.description);
        fragments
    }
}

/// The text an item's title is rendered with, number included.
pub fn item_title(item: &Item, options: &EngineOptions) -> String {
    match &item.number {
        Some(number) if options.show_question_numbers && !item.title.is_empty() => {
            format!("{}. {}", number, item.title)
        }
        _ => item.title.clone(),
    }
}

/// Lay out `item` with its top-left corner on `point`.
pub fn layout_item(
    ctx: &mut LayoutContext<'_>,
    item: &Item,
    point: Point,
    options: &EngineOptions,
    mode: LayoutMode,
) -> Result<Vec<LayoutBlock>> {
    let indent = ctx.measure_units(item.indent)?;
    let title = item_title(item, options);
    let owner = BodyOwner {
        name: &item.name,
        read_only: item.read_only,
    };

    let mut fragments = {
        let mut scope = ctx.scoped_margins();
        scope.margins_mut().left += indent;
        let indent_point = Point::new(point.x_left + indent, point.y_top);

        let mut fragments = match item.title_location {
            TitleLocation::Default | TitleLocation::Top => {
                layout_title_top(&mut scope, item, &title, owner, indent_point, mode)?
            }
            TitleLocation::Bottom => {
                layout_title_bottom(&mut scope, item, &title, owner, indent_point, mode)?
            }
            TitleLocation::Left => {
                layout_title_left(&mut scope, item, &title, owner, indent_point, mode)?
            }
            TitleLocation::Hidden => item.body.layout_body(&mut scope, owner, indent_point, mode)?,
        };

        if let Some(label) = &item.comment {
            attach_secondary_field(&mut scope, owner, label, &mut fragments, mode)?;
        }
        fragments
    };

    for fragment in fragments.iter_mut() {
        fragment.rect.x_left = point.x_left;
    }
    trace!("item {:?} -> {:?}", item.name, fragments);

    Ok(fragments
        .into_iter()
        .map(|f| {
            LayoutBlock::new(
                f.rect,
                f.page,
                BlockKind::Item {
                    name: item.name.clone(),
                },
            )
        })
        .collect())
}

fn layout_title_top(
    ctx: &mut LayoutContext<'_>,
    item: &Item,
    title: &str,
    owner: BodyOwner<'_>,
    point: Point,
    mode: LayoutMode,
) -> Result<Vec<Fragment>> {
    let max_width = ctx.available_width_from(point.x_left);
    let heading = layout_heading(ctx, title, &item.description, point, max_width, mode)?;
    let body_point = heading.description.rect.bottom_left();
    let body = item.body.layout_body(ctx, owner, body_point, mode)?;

    if title.is_empty() && item.description.is_empty() {
        return Ok(body);
    }
    Ok(join_heading(heading.fragments(), body))
}

/// Put the heading in front of the body, merging the heading's last
/// fragment into the body's first when both are on the same page.
fn join_heading(mut head: Vec<Fragment>, mut body: Vec<Fragment>) -> Vec<Fragment> {
    let first = &mut body[0];
    if let Some(last_head) = head.last() {
        if last_head.page == first.page {
            first.rect = first.rect.union(&last_head.rect);
            head.pop();
        }
    }
    head.extend(body);
    head
}

fn layout_title_bottom(
    ctx: &mut LayoutContext<'_>,
    item: &Item,
    title: &str,
    owner: BodyOwner<'_>,
    point: Point,
    mode: LayoutMode,
) -> Result<Vec<Fragment>> {
    let mut fragments = item.body.layout_body(ctx, owner, point, mode)?;
    let last = fragments[fragments.len() - 1];
    let mut title_point = last.rect.bottom_left();
    let max_width = ctx.available_width_from(title_point.x_left);

    // Dry pass: where would the heading end if drawn right after the body?
    let dry = layout_heading(
        ctx,
        title,
        &item.description,
        title_point,
        max_width,
        LayoutMode::Measure,
    )?;
    let is_new_page = ctx.is_new_page_element(dry.description.rect.y_bot);
    if is_new_page {
        if mode.commits() {
            ctx.add_page()?;
        }
        title_point = ctx.left_top_point();
    }

    let heading = layout_heading(ctx, title, &item.description, title_point, max_width, mode)?;
    if is_new_page {
        fragments.push(Fragment::new(heading.rect(), heading.description.page));
    } else if let Some(last) = fragments.last_mut() {
        last.rect.x_right = last.rect.x_right.max(heading.rect().x_right);
        last.rect.y_bot = heading.description.rect.y_bot;
    }
    Ok(fragments)
}

fn layout_title_left(
    ctx: &mut LayoutContext<'_>,
    item: &Item,
    title: &str,
    owner: BodyOwner<'_>,
    point: Point,
    mode: LayoutMode,
) -> Result<Vec<Fragment>> {
    let max_width = ctx.available_width_from(point.x_left) * LEFT_TITLE_WIDTH_SCALE;
    let heading = layout_heading(ctx, title, &item.description, point, max_width, mode)?;
    let split = heading.title.page != heading.description.page;
    // A description pushed to the next page takes the body with it.
    let body_top = if split {
        heading.description.rect.y_top
    } else {
        heading.title.rect.y_top
    };
    let body_point = Point::new(
        heading.title.rect.x_right.max(heading.description.rect.x_right),
        body_top,
    );
    let body = item.body.layout_body(ctx, owner, body_point, mode)?;

    if split || body[0].page != heading.title.page {
        return Ok(join_heading(heading.fragments(), body));
    }
    let mut fragments = body;
    let first = &mut fragments[0].rect;
    first.x_left = heading.title.rect.x_left;
    first.y_top = heading.title.rect.y_top;
    first.y_bot = first.y_bot.max(heading.description.rect.y_bot);
    Ok(fragments)
}

/// Title (bold) then description (smaller), with a small gap between them
/// only when both exist.
fn layout_heading(
    ctx: &mut LayoutContext<'_>,
    title: &str,
    description: &str,
    point: Point,
    max_width: f64,
    mode: LayoutMode,
) -> Result<Heading> {
    let title_font = Font::bold(ctx.font_size());
    let desc_font = Font::regular(ctx.font_size() * DESCRIPTION_FONT_SIZE_SCALE);

    let title_frag = place_text_within(ctx, point, title, title_font, max_width, mode)?;
    let mut desc_point = title_frag.rect.bottom_left();
    if !title.trim().is_empty() && !description.trim().is_empty() {
        desc_point.y_top += ctx.unit_width() * PANEL_DESC_GAP_SCALE;
    }
    let desc_frag = place_text_within(ctx, desc_point, description, desc_font, max_width, mode)?;
    Ok(Heading {
        title: title_frag,
        description: desc_frag,
    })
}

/// Lay out the comment field under the last fragment and fold it in.
fn attach_secondary_field(
    ctx: &mut LayoutContext<'_>,
    owner: BodyOwner<'_>,
    label: &str,
    fragments: &mut Vec<Fragment>,
    mode: LayoutMode,
) -> Result<()> {
    let Some(last) = fragments.last().copied() else {
        return Ok(());
    };
    let field = layout_secondary_field(ctx, owner, label, last.rect.bottom_left(), mode)?;
    if field.page != last.page {
        fragments.push(field);
    } else if let Some(last) = fragments.last_mut() {
        last.rect.y_bot = field.rect.y_bot;
        last.rect.x_right = last.rect.x_right.max(field.rect.x_right);
    }
    Ok(())
}

/// Label text and a multi-line field below it, moved to a fresh page
/// together when they don't fit.
fn layout_secondary_field(
    ctx: &mut LayoutContext<'_>,
    owner: BodyOwner<'_>,
    label: &str,
    point: Point,
    mode: LayoutMode,
) -> Result<Fragment> {
    let font = Font::regular(ctx.font_size());
    let block = measure_block(ctx, label, font, ctx.available_width_from(point.x_left))?;
    let mut text_rect = block.rect_at(point);
    let field_height = ctx.font_size() * SECONDARY_FIELD_HEIGHT_SCALE;

    if mode.commits() && ctx.is_new_page_element(text_rect.y_bot + field_height) {
        ctx.add_page()?;
        text_rect = block.rect_at(ctx.left_top_point());
    }

    let field_width = ctx.available_width_from(text_rect.x_left);
    let field_rect = Rect::at(text_rect.bottom_left(), field_width, field_height);
    if mode.commits() {
        draw_block(ctx, &block, text_rect.top_left())?;
        let field = FieldMeta {
            name: format!("{}-comment", owner.name),
            kind: FieldKind::TextField { multiline: true },
            read_only: owner.read_only,
            value: String::new(),
        };
        ctx.add_interactive_field(field_rect, &field)?;
    }
    Ok(Fragment::new(
        Rect::new(
            text_rect.x_left,
            text_rect.x_left + field_width,
            text_rect.y_top,
            field_rect.y_bot,
        ),
        ctx.page_index(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Metrics, RecordingBackend};
    use crate::model::{Edges, ItemBody, PageConfig, PageSize};

    fn page() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 300.0,
                height: 200.0,
            },
            margin: Edges::uniform(20.0),
        }
    }

    fn backend() -> RecordingBackend {
        RecordingBackend::new(Metrics::Monospace { advance: 0.5 })
    }

    #[test]
    fn numbers_prefix_titles() {
        let mut item = Item::new("q", "Age", ItemBody::Text);
        item.number = Some("3".into());
        assert_eq!(item_title(&item, &EngineOptions::default()), "3. Age");
        let plain = EngineOptions {
            show_question_numbers: false,
            ..Default::default()
        };
        assert_eq!(item_title(&item, &plain), "Age");
    }

    #[test]
    fn top_title_merges_into_body() {
        let mut backend = backend();
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let item = Item::new("q", "Name", ItemBody::Text);
        let blocks = layout_item(
            &mut ctx,
            &item,
            Point::new(20.0, 20.0),
            &EngineOptions::default(),
            LayoutMode::Commit,
        )
        .unwrap();
        assert_eq!(blocks.len(), 1);
        // title 20..30, field 30..40
        assert_eq!(blocks[0].rect, Rect::new(20.0, 280.0, 20.0, 40.0));
    }

    #[test]
    fn description_gap_only_with_a_title() {
        let mut backend = backend();
        let mut ctx = LayoutContext::new(&page(), 12.0, &mut backend).unwrap();
        let with_title = layout_heading(
            &mut ctx,
            "T",
            "D",
            Point::new(20.0, 20.0),
            200.0,
            LayoutMode::Measure,
        )
        .unwrap();
        assert_eq!(with_title.description.rect.y_top, 32.0 + 6.0 * 0.25);

        let without = layout_heading(
            &mut ctx,
            "",
            "D",
            Point::new(20.0, 20.0),
            200.0,
            LayoutMode::Measure,
        )
        .unwrap();
        assert_eq!(without.title.rect.height(), 0.0);
        assert_eq!(without.description.rect.y_top, 20.0);
    }

    #[test]
    fn indent_is_scoped_and_rects_start_at_the_point() {
        let mut backend = backend();
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let mut item = Item::new("q", "Name", ItemBody::Text);
        item.indent = 2;
        let before = ctx.margins();
        let blocks = layout_item(
            &mut ctx,
            &item,
            Point::new(20.0, 20.0),
            &EngineOptions::default(),
            LayoutMode::Commit,
        )
        .unwrap();
        assert_eq!(ctx.margins(), before);
        assert_eq!(ctx.margin_depth(), 0);
        assert_eq!(blocks[0].rect.x_left, 20.0);
    }

    #[test]
    fn left_title_puts_body_beside_it() {
        let mut backend = backend();
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let mut item = Item::new("q", "Name", ItemBody::Text);
        item.title_location = TitleLocation::Left;
        item.description = "Full name, please".into();
        let blocks = layout_item(
            &mut ctx,
            &item,
            Point::new(20.0, 20.0),
            &EngineOptions::default(),
            LayoutMode::Commit,
        )
        .unwrap();
        assert_eq!(blocks.len(), 1);
        let rect = blocks[0].rect;
        assert_eq!(rect.x_left, 20.0);
        assert_eq!(rect.y_top, 20.0);
        assert_eq!(rect.x_right, 280.0);
        // description starts under the 10pt title plus a 1.25pt gap and is
        // 6.67pt tall, reaching below the 10pt-tall field
        assert!((rect.y_bot - (31.25 + 20.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn left_title_split_from_description_stays_behind() {
        let mut backend = backend();
        let blocks = {
            let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
            let mut item = Item::new("q", "T", ItemBody::Text);
            item.title_location = TitleLocation::Left;
            item.description = "D".into();
            layout_item(
                &mut ctx,
                &item,
                Point::new(20.0, 165.0),
                &EngineOptions::default(),
                LayoutMode::Commit,
            )
            .unwrap()
        };

        // title fits at 165..175; the description would end at 182.9
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].page, 0);
        assert_eq!(blocks[0].rect, Rect::new(20.0, 25.0, 165.0, 175.0));
        assert_eq!(blocks[1].page, 1);
        assert_eq!(blocks[1].rect, Rect::new(20.0, 280.0, 20.0, 30.0));

        let (field, _) = backend.fields().next().unwrap();
        assert_eq!(*field, Rect::new(25.0, 280.0, 20.0, 30.0));
        assert_eq!(backend.pages_added(), 1);
    }

    #[test]
    fn comment_extends_the_last_rect() {
        let mut backend = backend();
        let blocks = {
            let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
            let mut item = Item::new("q", "", ItemBody::Text);
            item.comment = Some("Why?".into());
            layout_item(
                &mut ctx,
                &item,
                Point::new(20.0, 20.0),
                &EngineOptions::default(),
                LayoutMode::Commit,
            )
            .unwrap()
        };
        assert_eq!(blocks.len(), 1);
        // field 20..30, label 30..40, comment box 40..70
        assert_eq!(blocks[0].rect.y_bot, 70.0);
        let names: Vec<&str> = backend.fields().map(|(_, f)| f.name.as_str()).collect();
        assert_eq!(names, vec!["q", "q-comment"]);
    }

    #[test]
    fn comment_that_does_not_fit_starts_a_new_rect() {
        let mut backend = backend();
        let blocks = {
            let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
            let mut item = Item::new("q", "", ItemBody::Text);
            item.comment = Some("Why?".into());
            layout_item(
                &mut ctx,
                &item,
                Point::new(20.0, 135.0),
                &EngineOptions::default(),
                LayoutMode::Commit,
            )
            .unwrap()
        };
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].page, 1);
        assert_eq!(blocks[1].rect.y_top, 20.0);
        assert_eq!(blocks[1].rect.y_bot, 60.0);
        assert_eq!(backend.pages_added(), 1);
    }
}
