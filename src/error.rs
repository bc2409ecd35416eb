use std::error::Error;
use std::fmt;

/// Which index domain a rejected index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "column"),
        }
    }
}

/// Error type for matrix construction and operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Bad sizes, operand shape mismatches, wrong-shaped replacement columns.
    InvalidArgument(String),
    /// A 1-based index fell outside `[1, bound]`.
    IndexOutOfRange { axis: Axis, index: usize, bound: usize },
    /// Text could not be parsed as a matrix.
    Parse(String),
}

impl MatrixError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MatrixError::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MatrixError::InvalidArgument(_))
    }

    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, MatrixError::IndexOutOfRange { .. })
    }
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatrixError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MatrixError::IndexOutOfRange { axis, index, bound } => write!(
                f,
                "{} index {} is outside the index domain [1, {}]",
                axis, index, bound
            ),
            MatrixError::Parse(msg) => write!(f, "Failed to parse matrix: {}", msg),
        }
    }
}

impl Error for MatrixError {}

pub type Result<T> = std::result::Result<T, MatrixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_axis_and_bound() {
        let err = MatrixError::IndexOutOfRange {
            axis: Axis::Col,
            index: 5,
            bound: 3,
        };
        assert_eq!(
            err.to_string(),
            "column index 5 is outside the index domain [1, 3]"
        );
        assert!(err.is_index_out_of_range());
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn converts_into_anyhow() {
        fn fails() -> anyhow::Result<()> {
            Err(MatrixError::invalid("size must be larger than 0"))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(err.to_string().contains("size must be larger than 0"));
    }
}
