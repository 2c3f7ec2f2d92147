//! # Text Layout
//!
//! Line wrapping and placement of text blocks.
//!
//! Text is wrapped greedily at UAX#14 break opportunities so that each line
//! fits the available width. A single unbreakable word wider than the line
//! keeps a line of its own and overflows. Mandatory breaks (newlines) always
//! start a new line.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::backend::{Font, TextSize};
use crate::error::Result;
use crate::geometry::{Fragment, Point, Rect};
use crate::layout::{LayoutContext, LayoutMode};

/// One measured line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size: TextSize,
}

/// Wrapped, measured text that has not been positioned yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
    pub font: Font,
}

impl TextBlock {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.lines.iter().map(|l| l.size.width).fold(0.0, f64::max)
    }

    pub fn height(&self) -> f64 {
        self.lines.iter().map(|l| l.size.height).sum()
    }

    /// The block's bounds if its top-left corner sits on `point`.
    pub fn rect_at(&self, point: Point) -> Rect {
        Rect::at(point, self.width(), self.height())
    }
}

/// Split `text` into lines no wider than `max_width` according to `measure`.
pub fn wrap_lines<F>(text: &str, max_width: f64, mut measure: F) -> Result<Vec<TextLine>>
where
    F: FnMut(&str) -> Result<TextSize>,
{
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    for (end, opportunity) in linebreaks(text) {
        let segment = &text[start..end];
        start = end;

        let candidate = format!("{}{}", current, segment);
        let fits = measure(candidate.trim_end())?.width <= max_width;
        if fits || current.trim_end().is_empty() {
            current = candidate;
        } else {
            push_line(&mut lines, &current, &mut measure)?;
            current = segment.to_string();
        }

        if opportunity == BreakOpportunity::Mandatory && end < text.len() {
            push_line(&mut lines, &current, &mut measure)?;
            current.clear();
        }
    }
    if !current.trim_end().is_empty() {
        push_line(&mut lines, &current, &mut measure)?;
    }
    Ok(lines)
}

fn push_line<F>(lines: &mut Vec<TextLine>, text: &str, measure: &mut F) -> Result<()>
where
    F: FnMut(&str) -> Result<TextSize>,
{
    let text = text.trim_end_matches(['\n', '\r', ' ', '\t']);
    let size = measure(text)?;
    lines.push(TextLine {
        text: text.to_string(),
        size,
    });
    Ok(())
}

/// Wrap and measure `text` for the current context. No side effects.
pub fn measure_block(
    ctx: &LayoutContext<'_>,
    text: &str,
    font: Font,
    max_width: f64,
) -> Result<TextBlock> {
    if text.trim().is_empty() {
        return Ok(TextBlock {
            lines: Vec::new(),
            font,
        });
    }
    let lines = wrap_lines(text, max_width, |s| ctx.measure_text(s, &font))?;
    Ok(TextBlock { lines, font })
}

/// Draw each line of `block` below `top_left`. Lines are drawn with their
/// origin on the line's vertical middle.
pub fn draw_block(ctx: &mut LayoutContext<'_>, block: &TextBlock, top_left: Point) -> Result<()> {
    let mut y = top_left.y_top;
    for line in &block.lines {
        let origin = Point::new(top_left.x_left, y + line.size.height / 2.0);
        ctx.draw_text(&line.text, origin, &block.font)?;
        y += line.size.height;
    }
    Ok(())
}

/// Lay out `text` with its top-left corner on `point`, wrapping at the
/// right margin.
///
/// Empty text produces a zero-size rect on `point`. When committing, the
/// block is moved to a new page if it would cross the bottom margin, then
/// drawn.
pub fn place_text(
    ctx: &mut LayoutContext<'_>,
    point: Point,
    text: &str,
    font: Font,
    mode: LayoutMode,
) -> Result<Fragment> {
    let max_width = ctx.available_width_from(point.x_left);
    place_text_within(ctx, point, text, font, max_width, mode)
}

/// Like [`place_text`] with an explicit wrapping width.
pub fn place_text_within(
    ctx: &mut LayoutContext<'_>,
    point: Point,
    text: &str,
    font: Font,
    max_width: f64,
    mode: LayoutMode,
) -> Result<Fragment> {
    let block = measure_block(ctx, text, font, max_width)?;
    if block.is_empty() {
        return Ok(Fragment::new(Rect::empty_at(point), ctx.page_index()));
    }
    let rect = ctx.fit_to_page(block.rect_at(point), mode)?;
    if mode.commits() {
        draw_block(ctx, &block, rect.top_left())?;
    }
    Ok(Fragment::new(rect, ctx.page_index()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(s: &str) -> Result<TextSize> {
        Ok(TextSize {
            width: s.chars().count() as f64 * 5.0,
            height: 10.0,
        })
    }

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn short_text_is_one_line() {
        let lines = wrap_lines("Hello world", 100.0, mono).unwrap();
        assert_eq!(texts(&lines), vec!["Hello world"]);
        assert_eq!(lines[0].size.width, 55.0);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // 10 chars per line
        let lines = wrap_lines("alpha beta gamma delta", 50.0, mono).unwrap();
        assert_eq!(texts(&lines), vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn long_word_overflows_on_its_own_line() {
        let lines = wrap_lines("a supercalifragilistic b", 30.0, mono).unwrap();
        assert_eq!(texts(&lines), vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn newlines_force_breaks() {
        let lines = wrap_lines("one\ntwo", 500.0, mono).unwrap();
        assert_eq!(texts(&lines), vec!["one", "two"]);
    }

    #[test]
    fn block_size_sums_lines() {
        let block = TextBlock {
            lines: wrap_lines("alpha beta gamma delta", 50.0, mono).unwrap(),
            font: Font::regular(10.0),
        };
        assert_eq!(block.width(), 50.0);
        assert_eq!(block.height(), 30.0);
        assert_eq!(
            block.rect_at(Point::new(5.0, 7.0)),
            Rect::new(5.0, 55.0, 7.0, 37.0)
        );
    }
}
