//! Readers and writers for matrices stored as delimited text.
pub mod delimited;

pub use delimited::{read_matrix, read_matrix_from_path, write_matrix, DelimitedConfig};
