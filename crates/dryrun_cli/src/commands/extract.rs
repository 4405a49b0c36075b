//! `dryrun extract`: split a saved reply into narrative and summary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dryrun_core::ResponseExtractor;

use crate::commands::{input, report};
use crate::output;

pub fn handle(file: &Path) -> Result<()> {
    let raw = if input::is_stdin(Some(file)) {
        input::read_stdin("response")?
    } else {
        fs::read_to_string(file)
            .with_context(|| format!("Failed to read response from {}", file.display()))?
    };

    let result = ResponseExtractor::new().extract(&raw);
    if output::is_json() {
        output::data("result", &result);
    } else {
        report::print_result(&result);
    }
    Ok(())
}
