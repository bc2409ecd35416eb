//! Dense matrix value type.
//!
//! `Matrix` stores `f64` entries row-major and addresses them 1-based, the
//! convention used by elimination-style algorithms written on top of it.
pub mod matrix;

pub use matrix::Matrix;
