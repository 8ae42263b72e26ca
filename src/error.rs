use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Empty or malformed image data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A codec parameter is out of range (block size, threshold, table).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Two grids that must share a shape do not.
    #[error("Dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        /// (width, height) of the reference grid.
        expected: (usize, usize),
        /// (width, height) of the other grid.
        actual: (usize, usize),
    },

    /// Malformed PGM/raw container data.
    #[error("Invalid image format: {0}")]
    Format(String),
}

impl CodecError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = CodecError::DimensionMismatch {
            expected: (10, 10),
            actual: (12, 10),
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 10x10, got 12x10");
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            CodecError::invalid_argument("block size must be positive"),
            CodecError::InvalidArgument("block size must be positive".to_string())
        );
        assert!(matches!(CodecError::invalid_input("empty"), CodecError::InvalidInput(_)));
    }
}
