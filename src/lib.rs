//! redeem-linalg: a small dense matrix type for elimination-style algorithms.
//!
//! The crate provides a real-valued `Matrix` with 1-based element addressing,
//! elementwise algebra, transpose, and the row/column editing operations
//! (sub-matrix, concatenation, row swap, row combination, column deletion and
//! replacement) that Gaussian elimination and similar solvers are built from.
//! Every operation except `set` and `fill` returns a new matrix.
pub mod config;
pub mod error;
pub mod io;
pub mod math;

pub use config::{ComparisonMode, EqualityConfig};
pub use error::{MatrixError, Result};
pub use math::Matrix;
