//! Paint one element box into strips: background, border, padded and aligned
//! content lines.

use crate::geometry::Region;
use crate::style::{BorderKind, Padding, ResolvedStyle, TextAlign};

use super::strip::{CellStyle, Strip};

/// Corner and edge glyphs: top-left, top-right, bottom-left, bottom-right,
/// horizontal, vertical.
pub fn border_glyphs(kind: BorderKind) -> Option<[char; 6]> {
    match kind {
        BorderKind::None => None,
        BorderKind::Thin => Some(['┌', '┐', '└', '┘', '─', '│']),
        BorderKind::Heavy => Some(['┏', '┓', '┗', '┛', '━', '┃']),
        BorderKind::Double => Some(['╔', '╗', '╚', '╝', '═', '║']),
        BorderKind::Round => Some(['╭', '╮', '╰', '╯', '─', '│']),
        BorderKind::Ascii => Some(['+', '+', '+', '+', '-', '|']),
    }
}

/// Cells taken by border and padding on each side.
pub fn chrome(style: &ResolvedStyle) -> Padding {
    let border = u16::from(
        style
            .border
            .as_ref()
            .is_some_and(|b| b.kind.is_visible()),
    );
    let pad = style.padding.unwrap_or_default();
    Padding::new(
        pad.top + border,
        pad.right + border,
        pad.bottom + border,
        pad.left + border,
    )
}

/// The content lines an element displays, with its symbol prefixed to the
/// first line.
pub fn content_lines(style: &ResolvedStyle, content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content.lines().map(str::to_owned).collect();
    if let Some(symbol) = style.symbol.as_deref().filter(|s| !s.is_empty()) {
        match lines.first_mut() {
            Some(first) => *first = format!("{symbol} {first}"),
            None => lines.push(symbol.to_owned()),
        }
    }
    lines
}

/// Paint `content` in `region` with `style`.
pub fn paint_box(style: &ResolvedStyle, content: &str, region: Region) -> Vec<Strip> {
    if region.is_empty() {
        return Vec::new();
    }
    let cell = CellStyle::from_style(style);
    let mut strips = Vec::with_capacity(region.height as usize);

    // Background
    for y in region.y..region.bottom() {
        let mut strip = Strip::new(y, region.x);
        strip.repeat(' ', region.width as usize, &cell);
        strips.push(strip);
    }

    let glyphs = style.border.as_ref().and_then(|b| border_glyphs(b.kind));
    if let Some([tl, tr, bl, br, h, v]) = glyphs {
        let border_fg = style
            .border
            .as_ref()
            .and_then(|b| b.color.clone())
            .or_else(|| style.fg.clone());
        let border_cell = cell.with_fg(border_fg);
        let inner_w = (region.width - 2).max(0) as usize;
        let last = strips.len() - 1;
        for (i, strip) in strips.iter_mut().enumerate() {
            let (left, fill, right) = match i {
                0 => (tl, h, tr),
                i if i == last => (bl, h, br),
                _ => (v, ' ', v),
            };
            strip.cells.clear();
            strip.push(left, border_cell.clone());
            if region.width > 1 {
                if fill == ' ' {
                    strip.repeat(' ', inner_w, &cell);
                } else {
                    strip.repeat(fill, inner_w, &border_cell);
                }
                strip.push(right, border_cell.clone());
            }
        }
    }

    let inner = region.shrink(chrome(style));
    if inner.is_empty() {
        return strips;
    }
    let align = style.align.unwrap_or(TextAlign::Left);
    let width = inner.width as usize;
    for (i, line) in content_lines(style, content).iter().enumerate() {
        let y = inner.y + i as i32;
        if y >= inner.bottom() {
            break;
        }
        let text: String = line.chars().take(width).collect();
        let len = text.chars().count();
        let offset = match align {
            TextAlign::Left => 0,
            TextAlign::Center => (width - len) / 2,
            TextAlign::Right => width - len,
        };
        let row = (y - region.y) as usize;
        let start = (inner.x - region.x) as usize + offset;
        for (j, ch) in text.chars().enumerate() {
            if let Some(slot) = strips[row].cells.get_mut(start + j) {
                slot.ch = ch;
                slot.style = cell.clone();
            }
        }
    }
    strips
}

// ===========================================================================
// Tests
// ===========================================================================
