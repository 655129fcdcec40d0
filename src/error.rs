use std::collections::TryReserveError;

/// Crate-level error type for shapelet discovery and selection.
///
/// Configuration problems, numerically undefined quality scores and resource
/// failures are all reported to the caller; the library never terminates the
/// process on its own.
#[derive(Debug, thiserror::Error)]
pub enum ShapeletError {
    /// Minimum candidate length is greater than the maximum.
    #[error("invalid length range: min={min} is greater than max={max}")]
    InvalidLengthRange { min: usize, max: usize },

    /// Candidate length of zero was requested.
    #[error("candidate length must be at least 1")]
    ZeroLength,

    /// A candidate length does not fit inside one of the series.
    #[error("max length {max} exceeds length {series_len} of series {series}")]
    LengthExceedsSeries {
        max: usize,
        series: usize,
        series_len: usize,
    },

    /// Number of shapelets to keep must be at least 1.
    #[error("k must be at least 1")]
    InvalidK,

    /// The binary separation score needs at least three series.
    #[error("at least 3 time series are required, got {count}")]
    TooFewSeries { count: usize },

    /// A class label outside {0, 1}.
    #[error("label {label} of series {series} is not binary")]
    NonBinaryLabel { series: usize, label: u8 },

    /// A standalone series was given a label outside {0, 1}.
    #[error("label {label} is not binary")]
    InvalidLabel { label: u8 },

    /// One of the two classes has no members.
    #[error("class {label} has no time series")]
    MissingClass { label: u8 },

    /// A time series without samples.
    #[error("time series has no samples")]
    EmptySeries,

    /// Distance vector and label vector lengths differ.
    #[error("distance vector has {got} entries, expected {expected}")]
    DistanceCountMismatch { expected: usize, got: usize },

    /// Within-class deviation sum is exactly zero, quality is undefined.
    #[error("degenerate quality: within-class deviation sum is zero")]
    DegenerateQuality,

    /// Parallel selection was asked to run with no workers.
    #[error("worker count must be greater than zero")]
    ZeroWorkers,

    /// Candidate buffer could not be allocated.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// Malformed dataset or archive text.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// File I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShapeletError {
    /// Creates a `ShapeletError::Parse`.
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience Result type for shapelet operations.
pub type Result<T> = std::result::Result<T, ShapeletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_actionable() {
        let err = ShapeletError::InvalidLengthRange { min: 5, max: 3 };
        assert_eq!(
            err.to_string(),
            "invalid length range: min=5 is greater than max=3"
        );

        let err = ShapeletError::LengthExceedsSeries {
            max: 12,
            series: 2,
            series_len: 10,
        };
        assert_eq!(err.to_string(), "max length 12 exceeds length 10 of series 2");
    }

    #[test]
    fn test_parse_helper() {
        match ShapeletError::parse(7, "missing label") {
            ShapeletError::Parse { line, reason } => {
                assert_eq!(line, 7);
                assert_eq!(reason, "missing label");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_allocation_from_try_reserve() {
        let mut v: Vec<u64> = Vec::new();
        let reserve_err = v.try_reserve_exact(usize::MAX).unwrap_err();
        let err: ShapeletError = reserve_err.into();
        assert!(matches!(err, ShapeletError::Allocation(_)));
    }
}
