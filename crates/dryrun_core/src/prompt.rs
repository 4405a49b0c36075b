use crate::extract::SUMMARY_DELIMITER;
use crate::request::AnalysisRequest;
use crate::summary::SummaryField;

const TASK: &str = "Perform a dry run of the following code with the provided test case. \
Explain each step of execution, with the step and the changes in the variables at each step.
Include variable assignments and their values at each step. If there are any \
errors or potential issues, point them out and also give an optimal solution.";

/// Formats submissions into the instruction sent to the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, code: &str, test_case: &str) -> String {
        let mut prompt = String::with_capacity(TASK.len() + code.len() + test_case.len() + 512);

        prompt.push_str(TASK);
        prompt.push_str("\n\n");
        prompt.push_str("When the walkthrough is complete, write a line containing only ");
        prompt.push_str(SUMMARY_DELIMITER);
        prompt.push_str(
            " and after it a summary of the analysis as a single JSON object with exactly this structure:\n",
        );
        prompt.push_str(&summary_template());
        prompt.push_str("\n\nCode:\n");
        prompt.push_str(code);
        prompt.push_str("\n\nTest Case:\n");
        prompt.push_str(test_case);
        prompt.push_str("\n\nDry Run Analysis:\n");

        prompt
    }

    pub fn build_for(&self, request: &AnalysisRequest) -> String {
        self.build(request.code(), request.test_case())
    }
}

fn summary_template() -> String {
    let lines: Vec<String> = SummaryField::ALL
        .iter()
        .map(|field| format!("    \"{}\": <{}>", field.key(), field.description()))
        .collect();
    format!("{{\n{}\n}}", lines.join(",\n"))
}
