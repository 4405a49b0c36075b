//! dryrun-tui: terminal UI for dryrun.
//!
//! Two tabs: **Code Input** (code editor and test-case editor) and **Analysis
//! Results** (narrated dry run, summary chart, debug JSON). Runtime logs live on
//! a separate screen (Ctrl+D). Theming in `theme`; layout in `layouts`; state
//! and view in [state] and [view]. Run with [run_tui_with_runtime].

pub mod animation;
pub mod editor;
pub mod layouts;
pub mod narrative;
pub mod run;
pub mod runtime_events;
pub mod state;
pub mod theme;
pub mod utils;
pub mod view;

pub use run::{run_tui_with_runtime, AnalysisInput, TuiChannels};
pub use state::{Focus, Screen, Tab, TuiState};
pub use theme::Appearance;
pub use view::draw as draw_view;
