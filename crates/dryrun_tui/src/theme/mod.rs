//! dryrun theme: semantic color palette for the TUI.
//!
//! Roles follow the usual editor theme split (surfaces, borders, text,
//! semantic states, chrome, editor). Chart bar colors are not part of the
//! palette; they come from `dryrun_constant::theme::chart` so the CLI and TUI
//! plot the same colors.
//!
//! ```ignore
//! use dryrun_tui::theme::{Appearance, DryrunPalette};
//!
//! let palette = DryrunPalette::for_appearance(Appearance::Light);
//! let text = palette.text.tuple();
//! ```

mod appearance;
mod palette;
mod rgb;

pub use appearance::Appearance;
pub use palette::DryrunPalette;
pub use rgb::Rgb;
