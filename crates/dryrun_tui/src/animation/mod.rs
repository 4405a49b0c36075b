//! Time-based animations for the busy state.

mod spinner;

pub use spinner::{busy_line, Spinner};
