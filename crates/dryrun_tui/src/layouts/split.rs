//! Split the terminal area into header, tab bar, body and footer regions.

use ratatui::layout::Rect;

/// Header: title line plus bottom border.
pub const HEADER_HEIGHT: u16 = 2;

/// Tab bar: one line.
pub const TAB_BAR_HEIGHT: u16 = 1;

/// Footer: one shortcut line.
pub const FOOTER_HEIGHT: u16 = 1;

#[derive(Debug, Clone)]
pub struct MainSplits {
    pub header: Rect,
    pub tabs: Rect,
    /// May have zero height when the terminal is too small.
    pub body: Rect,
    pub footer: Rect,
}

/// Stack header, tab bar, body and footer top to bottom. The body takes what
/// is left after the fixed strips.
pub fn main_splits(area: Rect) -> MainSplits {
    let fixed = HEADER_HEIGHT + TAB_BAR_HEIGHT + FOOTER_HEIGHT;
    let body_h = area.height.saturating_sub(fixed);

    let strip = |y: u16, height: u16| Rect {
        x: area.x,
        y,
        width: area.width,
        height: height.min(area.height.saturating_sub(y - area.y)),
    };

    let header = strip(area.y, HEADER_HEIGHT);
    let tabs = strip(area.y.saturating_add(HEADER_HEIGHT), TAB_BAR_HEIGHT);
    let body = strip(area.y.saturating_add(HEADER_HEIGHT + TAB_BAR_HEIGHT), body_h);
    let footer = strip(
        area.y.saturating_add(HEADER_HEIGHT + TAB_BAR_HEIGHT + body_h),
        FOOTER_HEIGHT,
    );

    MainSplits {
        header,
        tabs,
        body,
        footer,
    }
}

/// Split horizontally: left gets `left_percent` of the width, right the rest.
pub fn side_by_side(area: Rect, left_percent: u16) -> (Rect, Rect) {
    let left_w = (area.width as u32 * left_percent.min(100) as u32 / 100) as u16;
    let left = Rect { width: left_w, ..area };
    let right = Rect {
        x: area.x.saturating_add(left_w),
        width: area.width - left_w,
        ..area
    };
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_splits_assigns_regions() {
        let s = main_splits(Rect::new(0, 0, 80, 24));
        assert_eq!(s.header.height, 2);
        assert_eq!(s.tabs.y, 2);
        assert_eq!(s.body.y, 3);
        assert_eq!(s.body.height, 20);
        assert_eq!(s.footer.y, 23);
        assert_eq!(s.footer.height, 1);
    }

    #[test]
    fn main_splits_tiny_terminal() {
        let s = main_splits(Rect::new(0, 0, 80, 3));
        assert_eq!(s.body.height, 0);
        assert_eq!(s.header.height, HEADER_HEIGHT);
        assert_eq!(s.footer.height, 0);
    }

    #[test]
    fn side_by_side_divides_width() {
        let (left, right) = side_by_side(Rect::new(0, 0, 100, 10), 60);
        assert_eq!(left.width, 60);
        assert_eq!(right.x, 60);
        assert_eq!(right.width, 40);
    }
}
