//! Body layout for each item kind.
//!
//! The item engine only knows that a body can be laid out at a point and
//! yields one fragment per physical page it ends up on. Everything specific
//! to a kind (fields, choice rows, static text) lives here.

use log::trace;

use super::{LayoutContext, LayoutMode};
use crate::backend::{FieldKind, FieldMeta, Font};
use crate::error::Result;
use crate::geometry::{Fragment, Point, Rect};
use crate::model::ItemBody;
use crate::text::{draw_block, measure_block, place_text};

/// Height of a single-line text field, in unit heights.
pub const TEXT_FIELD_HEIGHT_SCALE: f64 = 1.0;
/// Vertical gap between choice rows, in unit heights.
pub const CHOICE_GAP_SCALE: f64 = 0.25;
/// Gap between a choice box and its label, in unit widths.
pub const CHOICE_LABEL_GAP_SCALE: f64 = 0.5;

/// The item a body belongs to, as far as its fields are concerned.
#[derive(Debug, Clone, Copy)]
pub struct BodyOwner<'a> {
    pub name: &'a str,
    pub read_only: bool,
}

/// Lay out an item body at a point.
pub trait LayoutBody {
    /// Returns at least one fragment; more when the body spans pages.
    fn layout_body(
        &self,
        ctx: &mut LayoutContext<'_>,
        owner: BodyOwner<'_>,
        point: Point,
        mode: LayoutMode,
    ) -> Result<Vec<Fragment>>;
}

impl LayoutBody for ItemBody {
    fn layout_body(
        &self,
        ctx: &mut LayoutContext<'_>,
        owner: BodyOwner<'_>,
        point: Point,
        mode: LayoutMode,
    ) -> Result<Vec<Fragment>> {
        let mut fragments = match self {
            ItemBody::Text => {
                let height = ctx.unit_height() * TEXT_FIELD_HEIGHT_SCALE;
                vec![layout_text_field(ctx, owner, point, height, false, mode)?]
            }
            ItemBody::Comment { rows } => {
                let height = ctx.unit_height() * (*rows).max(1) as f64;
                vec![layout_text_field(ctx, owner, point, height, true, mode)?]
            }
            ItemBody::Choice {
                choices,
                multiple,
                has_other,
                other_text,
            } => {
                let other = has_other.then_some(other_text.as_str());
                layout_choices(ctx, owner, choices, *multiple, other, point, mode)?
            }
            ItemBody::Html { text } => {
                let font = Font::regular(ctx.font_size());
                vec![place_text(ctx, point, text, font, mode)?]
            }
            ItemBody::Empty => Vec::new(),
        };
        if fragments.is_empty() {
            fragments.push(Fragment::new(Rect::empty_at(point), ctx.page_index()));
        }
        trace!("body of {:?}: {:?}", owner.name, fragments);
        Ok(fragments)
    }
}

/// A text input spanning to the right margin.
fn layout_text_field(
    ctx: &mut LayoutContext<'_>,
    owner: BodyOwner<'_>,
    point: Point,
    height: f64,
    multiline: bool,
    mode: LayoutMode,
) -> Result<Fragment> {
    let width = ctx.available_width_from(point.x_left);
    let rect = ctx.fit_to_page(Rect::at(point, width, height), mode)?;
    if mode.commits() {
        let field = FieldMeta {
            name: owner.name.to_string(),
            kind: FieldKind::TextField { multiline },
            read_only: owner.read_only,
            value: String::new(),
        };
        ctx.add_interactive_field(rect, &field)?;
    }
    Ok(Fragment::new(rect, ctx.page_index()))
}

/// One row per choice: a unit-square box followed by the wrapped label.
/// Rows are fitted one at a time, so a long list continues on the next
/// page and yields one fragment per page.
fn layout_choices(
    ctx: &mut LayoutContext<'_>,
    owner: BodyOwner<'_>,
    choices: &[String],
    multiple: bool,
    other: Option<&str>,
    point: Point,
    mode: LayoutMode,
) -> Result<Vec<Fragment>> {
    let box_size = ctx.unit_height();
    let label_gap = ctx.unit_width() * CHOICE_LABEL_GAP_SCALE;
    let row_gap = ctx.unit_height() * CHOICE_GAP_SCALE;
    let font = Font::regular(ctx.font_size());

    let mut fragments: Vec<Fragment> = Vec::new();
    let mut y = point.y_top;
    let labels = choices.iter().map(String::as_str).chain(other);

    for (index, label) in labels.enumerate() {
        let label_x = point.x_left + box_size + label_gap;
        let block = measure_block(ctx, label, font, ctx.available_width_from(label_x))?;
        let height = box_size.max(block.height());
        let row = Rect::new(point.x_left, label_x + block.width(), y, y + height);
        let row = ctx.fit_to_page(row, mode)?;
        if mode.commits() {
            let kind = if multiple {
                FieldKind::CheckBox
            } else {
                FieldKind::RadioButton {
                    group: owner.name.to_string(),
                }
            };
            let field = FieldMeta {
                name: format!("{}[{}]", owner.name, index),
                kind,
                read_only: owner.read_only,
                value: label.to_string(),
            };
            ctx.add_interactive_field(Rect::at(row.top_left(), box_size, box_size), &field)?;
            draw_block(ctx, &block, Point::new(label_x, row.y_top))?;
        }
        extend_fragments(&mut fragments, Fragment::new(row, ctx.page_index()));
        y = row.y_bot + row_gap;
    }

    if other.is_some() {
        let field_point = Point::new(point.x_left, y);
        let height = ctx.unit_height() * TEXT_FIELD_HEIGHT_SCALE;
        let other_name = format!("{}-other", owner.name);
        let other_owner = BodyOwner {
            name: &other_name,
            read_only: owner.read_only,
        };
        let fragment = layout_text_field(ctx, other_owner, field_point, height, false, mode)?;
        extend_fragments(&mut fragments, fragment);
    }
    Ok(fragments)
}

/// Grow the last fragment when `next` is on the same page, otherwise start
/// a new one.
pub(crate) fn extend_fragments(fragments: &mut Vec<Fragment>, next: Fragment) {
    match fragments.last_mut() {
        Some(last) if last.page == next.page => last.rect = last.rect.union(&next.rect),
        _ => fragments.push(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Metrics, RecordingBackend};
    use crate::model::{Edges, PageConfig, PageSize};

    fn page() -> PageConfig {
        PageConfig {
            size: PageSize::Custom {
                width: 200.0,
                height: 100.0,
            },
            margin: Edges::uniform(10.0),
        }
    }

    const OWNER: BodyOwner<'static> = BodyOwner {
        name: "q",
        read_only: false,
    };

    #[test]
    fn text_field_spans_to_right_margin() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        {
            let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
            let fragments = ItemBody::Text
                .layout_body(&mut ctx, OWNER, Point::new(30.0, 20.0), LayoutMode::Commit)
                .unwrap();
            assert_eq!(fragments, vec![Fragment::new(Rect::new(30.0, 190.0, 20.0, 30.0), 0)]);
        }
        assert_eq!(backend.fields().count(), 1);
    }

    #[test]
    fn measuring_draws_nothing() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        {
            let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
            let body = ItemBody::Choice {
                choices: vec!["a".into(), "b".into()],
                multiple: true,
                has_other: true,
                other_text: "other".into(),
            };
            body.layout_body(&mut ctx, OWNER, Point::new(10.0, 10.0), LayoutMode::Measure)
                .unwrap();
        }
        assert!(backend.ops().is_empty());
    }

    #[test]
    fn long_choice_list_splits_across_pages() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let fragments = {
            let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
            let body = ItemBody::Choice {
                choices: (0..8).map(|i| format!("choice {}", i)).collect(),
                multiple: false,
                has_other: false,
                other_text: String::new(),
            };
            body.layout_body(&mut ctx, OWNER, Point::new(10.0, 10.0), LayoutMode::Commit)
                .unwrap()
        };
        // Rows are 10pt tall with a 2.5pt gap; 80pt of content area per page.
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].page, 0);
        assert_eq!(fragments[1].page, 1);
        assert_eq!(fragments[1].rect.y_top, 10.0);
        assert_eq!(backend.pages_added(), 1);
        assert_eq!(backend.fields().count(), 8);
    }

    #[test]
    fn empty_body_is_a_point() {
        let mut backend = RecordingBackend::new(Metrics::Monospace { advance: 0.5 });
        let mut ctx = LayoutContext::new(&page(), 10.0, &mut backend).unwrap();
        let fragments = ItemBody::Empty
            .layout_body(&mut ctx, OWNER, Point::new(12.0, 34.0), LayoutMode::Commit)
            .unwrap();
        assert_eq!(fragments, vec![Fragment::new(Rect::new(12.0, 12.0, 34.0, 34.0), 0)]);
    }
}
