//! Shared constants for dryrun: app metadata, theme colors, runtime defaults.

pub mod app;
pub mod defaults;
pub mod theme;
