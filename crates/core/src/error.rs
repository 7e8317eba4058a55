use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid deadline configuration: {0}")]
    InvalidDeadlines(String),

    #[error("No pairing at position {0}")]
    PositionNotFound(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CoreError::PositionNotFound(3);
        assert!(error.to_string().contains('3'));
    }
}
