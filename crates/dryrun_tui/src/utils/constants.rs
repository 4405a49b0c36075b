//! TUI spacing and sizing constants.

/// Horizontal padding in characters (each side).
pub const HORIZONTAL_PADDING: u16 = 1;

/// Left indent for continuation lines.
pub const LEFT_PADDING: &str = "  ";

/// Spaces inserted by Tab in the editors.
pub const TAB_WIDTH: usize = 4;

/// Max runtime log lines kept for the Ctrl+D screen (older lines dropped).
pub const MAX_TRACE_LINES: usize = 2000;

/// Streaming narration shown while a call is in flight is capped to this many
/// trailing characters.
pub const STREAMING_DISPLAY_CAP: usize = 80_000;
