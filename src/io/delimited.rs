//! Delimited text (CSV/TSV) reader and writer for `Matrix`.
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::math::Matrix;

/// Configuration for reading and writing delimited matrix files.
#[derive(Debug, Clone)]
pub struct DelimitedConfig {
    /// Field separator, e.g. `b','` or `b'\t'`.
    pub delimiter: u8,
    /// Skip the first record on read. On write, no header is emitted.
    pub has_headers: bool,
}

impl Default for DelimitedConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }
}

impl DelimitedConfig {
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// Read a delimited file into a matrix, one record per row.
pub fn read_matrix_from_path<P: AsRef<Path>>(path: P, config: &DelimitedConfig) -> Result<Matrix> {
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Failed to open matrix file: {}", path.as_ref().display()))?;
    read_matrix(file, config)
}

/// Read delimited text into a matrix, one record per row.
///
/// All records must have the same number of fields and every field must
/// parse as `f64`.
pub fn read_matrix<R: Read>(reader: R, config: &DelimitedConfig) -> Result<Matrix> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut data = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut n_rows = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        let values = parse_record(&record, row_idx)?;

        match n_cols {
            None => n_cols = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(anyhow!(
                    "Row {} has {} fields, expected {}",
                    row_idx + 1,
                    values.len(),
                    expected
                ));
            }
            Some(_) => {}
        }

        data.extend(values);
        n_rows += 1;
    }

    let n_cols = n_cols.ok_or_else(|| anyhow!("No rows found in matrix input"))?;
    log::debug!("Read {}x{} matrix from delimited input", n_rows, n_cols);

    let matrix = Matrix::from_shape_vec((n_rows, n_cols), data)?;
    Ok(matrix)
}

fn parse_record(record: &StringRecord, row_idx: usize) -> Result<Vec<f64>> {
    if record.is_empty() || (record.len() == 1 && record[0].is_empty()) {
        return Err(anyhow!("Row {} is empty", row_idx + 1));
    }
    record
        .iter()
        .enumerate()
        .map(|(col_idx, field)| {
            field.parse::<f64>().with_context(|| {
                format!(
                    "Invalid value '{}' at row {}, column {}",
                    field,
                    row_idx + 1,
                    col_idx + 1
                )
            })
        })
        .collect()
}

/// Write a matrix as delimited text, one record per row.
pub fn write_matrix<W: Write>(writer: W, matrix: &Matrix, config: &DelimitedConfig) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(false)
        .from_writer(writer);

    for row in matrix.as_slice().chunks(matrix.cols()) {
        let fields: Vec<String> = row.iter().map(|v| format!("{:?}", v)).collect();
        writer
            .write_record(&fields)
            .context("Failed to write matrix row")?;
    }
    writer.flush().context("Failed to flush matrix writer")?;
    log::trace!("Wrote {}x{} matrix", matrix.rows(), matrix.cols());
    Ok(())
}
