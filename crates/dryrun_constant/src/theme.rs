//! Theme color constants for CLI and TUI charts.
//!
//! Defined as (R, G, B) tuples for use with any terminal color library.

/// Bar colors for the summary chart, in chart order.
pub mod chart {
    /// Execution steps: #FFA07A
    pub const EXECUTION_STEPS: (u8, u8, u8) = (255, 160, 122);
    /// Variables tracked: #98FB98
    pub const VARIABLES_TRACKED: (u8, u8, u8) = (152, 251, 152);
    /// Errors found: #87CEFA
    pub const ERRORS_FOUND: (u8, u8, u8) = (135, 206, 250);
    /// Optimization suggestions: #DDA0DD
    pub const OPTIMIZATION_SUGGESTIONS: (u8, u8, u8) = (221, 160, 221);

    pub const ALL: [(u8, u8, u8); 4] = [
        EXECUTION_STEPS,
        VARIABLES_TRACKED,
        ERRORS_FOUND,
        OPTIMIZATION_SUGGESTIONS,
    ];
}
