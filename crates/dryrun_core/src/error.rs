use thiserror::Error;

use crate::request::InputField;

#[derive(Error, Debug)]
pub enum DryRunError {
    #[error("{}", input_message(.0))]
    InputValidation(Vec<InputField>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn input_message(fields: &[InputField]) -> String {
    match fields {
        [] => "invalid input".to_string(),
        [field] => format!("{} is required to perform the analysis", field.label()),
        _ => "both the code and a test case are required to perform the analysis".to_string(),
    }
}

impl DryRunError {
    /// True for failures the user can fix by editing the submission.
    pub fn is_input_error(&self) -> bool {
        matches!(self, DryRunError::InputValidation(_))
    }
}

pub type Result<T> = std::result::Result<T, DryRunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_validation_single_field() {
        let err = DryRunError::InputValidation(vec![InputField::TestCase]);
        assert_eq!(
            err.to_string(),
            "a test case is required to perform the analysis"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_input_validation_both_fields() {
        let err = DryRunError::InputValidation(vec![InputField::Code, InputField::TestCase]);
        assert!(err.to_string().contains("both the code and a test case"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DryRunError::from(io_err);
        assert!(err.to_string().contains("file not found"));
        assert!(!err.is_input_error());
    }
}
