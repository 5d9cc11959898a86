//! Error types for registration operations.
//!
//! Every fallible operation in this crate returns [`AlignResult`], which is
//! `Result<T, AlignError>`. Each error carries a machine-readable code in the
//! format `ALIGN-XXXX`:
//!
//! - `ALIGN-1xxx`: I/O errors (reading, writing, parsing point files)
//! - `ALIGN-2xxx`: Input validation errors (bad point sets, no candidates)
//! - `ALIGN-3xxx`: Estimation errors (degenerate geometry)
//! - `ALIGN-4xxx`: Failures forwarded from external collaborators
//!
//! # Example
//!
//! ```
//! use cloudmatch::{AlignError, ErrorCode};
//!
//! let err = AlignError::mismatched_lengths(12, 9);
//! assert_eq!(err.code(), ErrorCode::MismatchedLengths);
//! assert_eq!(err.code().as_str(), "ALIGN-2001");
//! ```

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for registration operations.
pub type AlignResult<T> = Result<T, AlignError>;

/// Machine-readable error codes for registration operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // I/O errors (1xxx)
    /// ALIGN-1001: Failed to read file
    IoRead = 1001,
    /// ALIGN-1002: Failed to write file
    IoWrite = 1002,
    /// ALIGN-1003: Failed to parse file contents
    ParseError = 1003,

    // Input validation errors (2xxx)
    /// ALIGN-2001: Matched point sets have different lengths
    MismatchedLengths = 2001,
    /// ALIGN-2002: Too few points for triangulation
    InsufficientPoints = 2002,
    /// ALIGN-2003: No correspondences available for estimation
    NoCorrespondences = 2003,
    /// ALIGN-2004: Triangle references an out-of-range point index
    InvalidPointIndex = 2004,

    // Estimation errors (3xxx)
    /// ALIGN-3001: Cross-covariance too close to singular
    DegenerateTransform = 3001,

    // External collaborator errors (4xxx)
    /// ALIGN-4001: Triangulation provider failed
    Triangulation = 4001,
    /// ALIGN-4002: Consistency pruner failed
    Pruning = 4002,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `ALIGN-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IoRead => "ALIGN-1001",
            ErrorCode::IoWrite => "ALIGN-1002",
            ErrorCode::ParseError => "ALIGN-1003",
            ErrorCode::MismatchedLengths => "ALIGN-2001",
            ErrorCode::InsufficientPoints => "ALIGN-2002",
            ErrorCode::NoCorrespondences => "ALIGN-2003",
            ErrorCode::InvalidPointIndex => "ALIGN-2004",
            ErrorCode::DegenerateTransform => "ALIGN-3001",
            ErrorCode::Triangulation => "ALIGN-4001",
            ErrorCode::Pruning => "ALIGN-4002",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during registration operations.
#[derive(Debug, Error, Diagnostic)]
pub enum AlignError {
    /// Error reading from a file.
    #[error("failed to read points from {path}")]
    #[diagnostic(
        code(align::io::read),
        help("Check that the file exists and is readable")
    )]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write points to {path}")]
    #[diagnostic(
        code(align::io::write),
        help("Check that the directory exists and is writable")
    )]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a point or triangle file.
    #[error("failed to parse {path} at line {line}: {details}")]
    #[diagnostic(
        code(align::parse::error),
        help("Expected one comma-separated record per line, e.g. `1.5,-2.0`")
    )]
    ParseError {
        path: PathBuf,
        line: usize,
        details: String,
    },

    /// Matched point sets passed to the estimator have different lengths.
    #[error("matched point sets have different lengths: model has {model}, data has {data}")]
    #[diagnostic(
        code(align::input::mismatched_lengths),
        help("The estimator requires one data point per model point, in the same order")
    )]
    MismatchedLengths { model: usize, data: usize },

    /// A point set is too small to triangulate.
    #[error("point set {name:?} has {count} points, but triangulation requires at least 3")]
    #[diagnostic(code(align::input::insufficient_points))]
    InsufficientPoints { name: String, count: usize },

    /// No candidate correspondences survived for transform estimation.
    #[error("no correspondences to estimate a transform from: {details}")]
    #[diagnostic(
        code(align::input::no_correspondences),
        help("Try a larger matching threshold, or check that the clouds actually overlap")
    )]
    NoCorrespondences { details: String },

    /// A triangle references a point index outside its point set.
    #[error("triangle references point {index}, but the set only has {count} points")]
    #[diagnostic(code(align::input::point_index))]
    InvalidPointIndex { index: usize, count: usize },

    /// The cross-covariance of the matched sets is too close to singular
    /// for a meaningful rotation estimate.
    #[error("degenerate geometry: cross-covariance norm {norm:.3e} is below {epsilon:.3e}")]
    #[diagnostic(
        code(align::estimate::degenerate),
        help(
            "This happens when all matched points coincide or only a single match exists. Provide at least two well-separated correspondences."
        )
    )]
    DegenerateTransform { norm: f64, epsilon: f64 },

    /// The external triangulation provider reported a failure.
    #[error("triangulation failed: {details}")]
    #[diagnostic(code(align::external::triangulation))]
    Triangulation { details: String },

    /// The external consistency pruner reported a failure.
    #[error("consistency pruning failed: {details}")]
    #[diagnostic(code(align::external::pruning))]
    Pruning { details: String },
}

impl AlignError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AlignError::IoRead { .. } => ErrorCode::IoRead,
            AlignError::IoWrite { .. } => ErrorCode::IoWrite,
            AlignError::ParseError { .. } => ErrorCode::ParseError,
            AlignError::MismatchedLengths { .. } => ErrorCode::MismatchedLengths,
            AlignError::InsufficientPoints { .. } => ErrorCode::InsufficientPoints,
            AlignError::NoCorrespondences { .. } => ErrorCode::NoCorrespondences,
            AlignError::InvalidPointIndex { .. } => ErrorCode::InvalidPointIndex,
            AlignError::DegenerateTransform { .. } => ErrorCode::DegenerateTransform,
            AlignError::Triangulation { .. } => ErrorCode::Triangulation,
            AlignError::Pruning { .. } => ErrorCode::Pruning,
        }
    }

    // Constructor helpers for common error patterns

    /// Create an IoRead error.
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AlignError::IoRead {
            path: path.into(),
            source,
        }
    }

    /// Create an IoWrite error.
    pub fn io_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AlignError::IoWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a ParseError with a 1-based line number.
    pub fn parse_error(path: impl Into<PathBuf>, line: usize, details: impl Into<String>) -> Self {
        AlignError::ParseError {
            path: path.into(),
            line,
            details: details.into(),
        }
    }

    /// Create a MismatchedLengths error.
    pub fn mismatched_lengths(model: usize, data: usize) -> Self {
        AlignError::MismatchedLengths { model, data }
    }

    /// Create an InsufficientPoints error.
    pub fn insufficient_points(name: impl Into<String>, count: usize) -> Self {
        AlignError::InsufficientPoints {
            name: name.into(),
            count,
        }
    }

    /// Create a NoCorrespondences error.
    pub fn no_correspondences(details: impl Into<String>) -> Self {
        AlignError::NoCorrespondences {
            details: details.into(),
        }
    }

    /// Create an InvalidPointIndex error.
    pub fn invalid_point_index(index: usize, count: usize) -> Self {
        AlignError::InvalidPointIndex { index, count }
    }

    /// Create a Triangulation error.
    pub fn triangulation(details: impl Into<String>) -> Self {
        AlignError::Triangulation {
            details: details.into(),
        }
    }

    /// Create a Pruning error.
    pub fn pruning(details: impl Into<String>) -> Self {
        AlignError::Pruning {
            details: details.into(),
        }
    }
}
