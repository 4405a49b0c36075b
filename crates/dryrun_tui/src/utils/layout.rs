//! Layout helpers for Rects.

use ratatui::layout::Rect;

use crate::utils::constants::HORIZONTAL_PADDING;

/// Apply [HORIZONTAL_PADDING] on the left and right.
#[inline]
pub fn horizontal_padding(area: Rect) -> Rect {
    padding(area, HORIZONTAL_PADDING, 0)
}

/// Apply padding on all four sides.
#[inline]
pub fn padding(area: Rect, horizontal: u16, vertical: u16) -> Rect {
    Rect {
        x: area.x.saturating_add(horizontal),
        y: area.y.saturating_add(vertical),
        width: area.width.saturating_sub(horizontal.saturating_mul(2)),
        height: area.height.saturating_sub(vertical.saturating_mul(2)),
    }
}

/// Split `area` vertically: the top part gets `percent` of the height (at
/// least `min_top` lines when there is room), the bottom part the rest.
pub fn percent_split(area: Rect, percent: u16, min_top: u16) -> (Rect, Rect) {
    let wanted = (area.height as u32 * percent.min(100) as u32 / 100) as u16;
    let top_h = wanted.max(min_top).min(area.height);
    let top = Rect { height: top_h, ..area };
    let bottom = Rect {
        y: area.y.saturating_add(top_h),
        height: area.height - top_h,
        ..area
    };
    (top, bottom)
}

/// First visible line so that `cursor` stays within a `viewport`-line window
/// that currently starts at `offset`.
pub fn scroll_window(offset: usize, cursor: usize, viewport: usize) -> usize {
    if viewport == 0 {
        return cursor;
    }
    if cursor < offset {
        cursor
    } else if cursor >= offset + viewport {
        cursor + 1 - viewport
    } else {
        offset
    }
}
