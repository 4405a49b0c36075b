//! Layout components built from [crate::utils] and [crate::theme].
//!
//! - **[split]**: header, tab bar, body and footer regions.
//! - **[panel]**: bordered, titled panel block with focus highlight.
//! - **[style]**: palette [crate::theme::Rgb] to ratatui styles.
//! - **[head]**: header strip with title and status dot.
//! - **[tabs]**: tab bar line.
//! - **[shortcut]**: context-aware key hints in the footer.

mod head;
mod panel;
mod shortcut;
mod split;
mod style;
mod tabs;

pub use head::{header_line, render_header, HeaderState, HEADER_STATUS_READY};
pub use panel::block_for_panel;
pub use shortcut::{shortcut_line, ShortcutContext};
pub use split::{main_splits, side_by_side, MainSplits, FOOTER_HEIGHT, HEADER_HEIGHT, TAB_BAR_HEIGHT};
pub use style::{
    background_style, border_focused_style, border_style, danger_style, success_style, text_muted_style,
    text_style, warning_style,
};
pub use tabs::tab_bar_line;
