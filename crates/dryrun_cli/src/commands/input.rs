//! Resolve code and test case text from flags, files or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::cli::InputArgs;

/// `-` as a path means stdin.
const STDIN_PATH: &str = "-";

/// Code and test case as given. Empty text is left for request validation to report.
pub fn read_inputs(args: &InputArgs) -> Result<(String, String)> {
    if is_stdin(args.code_file.as_deref()) && is_stdin(args.test_file.as_deref()) {
        return Err(anyhow!("Only one of --code-file and --test-file can read stdin"));
    }
    let code = read_source(args.code.as_deref(), args.code_file.as_deref(), "code")?;
    let test_case = read_source(args.test.as_deref(), args.test_file.as_deref(), "test case")?;
    Ok((code, test_case))
}

/// Inline text wins over a file; neither yields an empty string.
pub fn read_source(inline: Option<&str>, file: Option<&Path>, what: &str) -> Result<String> {
    if let Some(text) = inline {
        return Ok(text.to_string());
    }
    match file {
        Some(path) if is_stdin(Some(path)) => read_stdin(what),
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {} from {}", what, path.display())),
        None => Ok(String::new()),
    }
}

pub fn read_stdin(what: &str) -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .with_context(|| format!("Failed to read {what} from stdin"))?;
    Ok(text)
}

pub fn is_stdin(path: Option<&Path>) -> bool {
    path.is_some_and(|p| p.as_os_str() == STDIN_PATH)
}
