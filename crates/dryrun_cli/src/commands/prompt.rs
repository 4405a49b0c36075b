//! `dryrun prompt`: show the prompt an analysis would send.

use anyhow::Result;
use dryrun_core::{AnalysisRequest, PromptBuilder};

use crate::cli::InputArgs;
use crate::commands::input;
use crate::output;

pub fn handle(args: InputArgs) -> Result<()> {
    let (code, test_case) = input::read_inputs(&args)?;
    let prompt = render(&code, &test_case)?;
    if output::is_json() {
        output::data("prompt", &serde_json::json!({ "prompt": prompt }));
    } else {
        println!("{prompt}");
    }
    Ok(())
}

/// Validates the inputs the same way an analysis would, then builds the prompt.
fn render(code: &str, test_case: &str) -> Result<String> {
    let request = AnalysisRequest::new(code, test_case)?;
    Ok(PromptBuilder::new().build_for(&request))
}
