//! Command handlers

pub mod nuget;
pub mod steam;

use ducky_logger as logger;
use ducky_metadata::ValidationResult;

use crate::errors::CliError;

/// Render a validation outcome and turn failure into an error
///
/// Every finding is printed with its suggestions; warnings never affect the
/// outcome.
pub fn report_validation(what: &str, result: &ValidationResult) -> Result<(), CliError> {
    for warning in &result.warnings {
        logger::warn(warning);
    }

    if result.valid {
        logger::success(&format!("{} validation passed", what));
        return Ok(());
    }

    for issue in &result.errors {
        logger::error_with_suggestions(&issue.message, &issue.suggestions);
    }

    Err(CliError::ValidationFailed {
        message: format!(
            "{} validation failed with {} error{}",
            what,
            result.errors.len(),
            if result.errors.len() == 1 { "" } else { "s" }
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ducky_metadata::ValidationIssue;

    #[test]
    fn test_report_validation_passes_with_warnings() {
        let result = ValidationResult::from_findings(vec![], vec!["minor".to_string()]);
        assert!(report_validation("NuGet", &result).is_ok());
    }

    #[test]
    fn test_report_validation_fails_with_count() {
        let result = ValidationResult::from_findings(
            vec![
                ValidationIssue::new("first", &[]),
                ValidationIssue::new("second", &[]),
            ],
            vec![],
        );
        let err = report_validation("NuGet", &result).expect_err("must fail");
        assert_eq!(err.to_string(), "NuGet validation failed with 2 errors");
    }
}
