use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The four metrics the model reports about its own walkthrough, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    ExecutionSteps,
    VariablesTracked,
    ErrorsFound,
    OptimizationSuggestions,
}

impl SummaryField {
    pub const ALL: [SummaryField; 4] = [
        SummaryField::ExecutionSteps,
        SummaryField::VariablesTracked,
        SummaryField::ErrorsFound,
        SummaryField::OptimizationSuggestions,
    ];

    /// JSON key used in the summary block.
    pub fn key(&self) -> &'static str {
        match self {
            SummaryField::ExecutionSteps => "execution_steps",
            SummaryField::VariablesTracked => "variables_tracked",
            SummaryField::ErrorsFound => "errors_found",
            SummaryField::OptimizationSuggestions => "optimization_suggestions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryField::ExecutionSteps => "Execution Steps",
            SummaryField::VariablesTracked => "Variables Tracked",
            SummaryField::ErrorsFound => "Errors Found",
            SummaryField::OptimizationSuggestions => "Optimization Suggestions",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SummaryField::ExecutionSteps => "number of steps",
            SummaryField::VariablesTracked => "number of variables tracked",
            SummaryField::ErrorsFound => "number of errors found",
            SummaryField::OptimizationSuggestions => "number of optimization suggestions",
        }
    }
}

impl std::fmt::Display for SummaryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_steps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables_tracked: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors_found: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_suggestions: Option<u64>,
}

impl SummaryCounts {
    pub fn new(
        execution_steps: u64,
        variables_tracked: u64,
        errors_found: u64,
        optimization_suggestions: u64,
    ) -> Self {
        Self {
            execution_steps: Some(execution_steps),
            variables_tracked: Some(variables_tracked),
            errors_found: Some(errors_found),
            optimization_suggestions: Some(optimization_suggestions),
        }
    }

    pub fn get(&self, field: SummaryField) -> Option<u64> {
        match field {
            SummaryField::ExecutionSteps => self.execution_steps,
            SummaryField::VariablesTracked => self.variables_tracked,
            SummaryField::ErrorsFound => self.errors_found,
            SummaryField::OptimizationSuggestions => self.optimization_suggestions,
        }
    }

    fn slot(&mut self, field: SummaryField) -> &mut Option<u64> {
        match field {
            SummaryField::ExecutionSteps => &mut self.execution_steps,
            SummaryField::VariablesTracked => &mut self.variables_tracked,
            SummaryField::ErrorsFound => &mut self.errors_found,
            SummaryField::OptimizationSuggestions => &mut self.optimization_suggestions,
        }
    }

    /// True when no field was reported.
    pub fn is_empty(&self) -> bool {
        SummaryField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Builds counts from a parsed summary object.
    ///
    /// Unknown keys are ignored and missing keys stay `None`. Values that are
    /// not non-negative whole numbers leave their field `None` and add a
    /// warning to the returned list.
    pub fn from_object(object: &Map<String, Value>) -> (Self, Vec<String>) {
        let mut counts = Self::default();
        let mut warnings = Vec::new();

        for field in SummaryField::ALL {
            let Some(value) = object.get(field.key()) else {
                continue;
            };
            match coerce_count(value) {
                Ok(n) => *counts.slot(field) = Some(n),
                Err(reason) => warnings.push(format!("{}: {}", field.key(), reason)),
            }
        }

        (counts, warnings)
    }
}

fn coerce_count(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            if n.as_i64().is_some() {
                return Err(format!("negative value {n} rejected"));
            }
            match n.as_f64() {
                Some(f) => coerce_float(f).ok_or_else(|| format!("value {n} is not a whole count")),
                None => Err(format!("value {n} is out of range")),
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(v) = trimmed.parse::<u64>() {
                return Ok(v);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(coerce_float)
                .ok_or_else(|| format!("string {s:?} is not a whole count"))
        }
        Value::Null => Err("null value rejected".to_string()),
        Value::Bool(b) => Err(format!("boolean {b} rejected")),
        Value::Array(_) => Err("array value rejected".to_string()),
        Value::Object(_) => Err("object value rejected".to_string()),
    }
}

fn coerce_float(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
