//! Shared utilities for the dryrun TUI.
//!
//! - **[constants]**: spacing and sizing constants.
//! - **[layout]**: Rect padding and splitting helpers.
//! - **[format]**: duration, truncation and word wrap.

mod constants;
mod format;
mod layout;

pub use constants::*;
pub use format::{format_duration, truncate_ellipsis, wrap_lines};
pub use layout::{horizontal_padding, padding, percent_split, scroll_window};
