//! Pipeline error type.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by the scheduling stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input validation failed; every detected problem is listed.
    #[error("invalid input: {}", join_messages(.errors))]
    InvalidInput {
        /// The individual validation failures.
        errors: Vec<ValidationError>,
    },

    /// The fitness worker pool could not be constructed.
    #[error("worker pool setup failed: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    /// Wraps a validation failure list.
    pub fn invalid_input(errors: Vec<ValidationError>) -> Self {
        Self::InvalidInput { errors }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_input_display() {
        let err = PipelineError::invalid_input(vec![
            ValidationError {
                kind: ValidationErrorKind::EmptyCourseList,
                message: "no courses to schedule".into(),
            },
            ValidationError {
                kind: ValidationErrorKind::InvalidCalendar,
                message: "calendar has no exam days".into(),
            },
        ]);
        let text = err.to_string();
        assert!(text.contains("no courses to schedule"));
        assert!(text.contains("calendar has no exam days"));
    }
}
