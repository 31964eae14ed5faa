//! CSV dataset loading.
//!
//! Supported format:
//! - First line is a comment declaring the column split:
//!   `# INPUTS: <features>, OUTPUTS: <targets>`
//! - Second line is a header row and is skipped
//! - Every following non-blank line is one sample: `features` numeric cells
//!   followed by `targets` numeric cells, comma-separated
//!
//! Samples become matrix columns, so `inputs` is `features x samples` and
//! `targets` is `outputs x samples`.

use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub inputs: Matrix,
    pub targets: Matrix,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Dataset {
    /// Reads and parses a dataset file.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let dataset = Dataset::parse_csv(&text)
            .map_err(|e| match e {
                Error::InvalidDataset(msg) => Error::InvalidDataset(format!("{}: {msg}", path.display())),
                other => other,
            })?;
        debug!(
            "loaded {} samples ({} features, {} outputs) from {}",
            dataset.num_samples(),
            dataset.num_features(),
            dataset.num_outputs(),
            path.display()
        );
        Ok(dataset)
    }

    /// Parses dataset text in the format described at the top of this module.
    pub fn parse_csv(text: &str) -> Result<Dataset> {
        let mut lines = text.lines();

        let declaration = lines
            .next()
            .ok_or_else(|| Error::InvalidDataset("file is empty".into()))?;
        let (n_inputs, n_outputs) = parse_declaration(declaration)?;

        // Header row.
        if lines.next().is_none() {
            return Err(Error::InvalidDataset("missing header row".into()));
        }

        let width = n_inputs + n_outputs;
        let mut features: Vec<f64> = Vec::new();
        let mut labels: Vec<f64> = Vec::new();
        let mut samples = 0;

        // Line numbers are 1-based and count the two leading lines.
        for (line_no, line) in lines.enumerate().map(|(i, l)| (i + 3, l.trim())) {
            if line.is_empty() {
                continue;
            }

            let cells = parse_floats(line, line_no)?;
            if cells.len() != width {
                return Err(Error::InvalidDataset(format!(
                    "line {line_no}: expected {width} columns, got {}",
                    cells.len()
                )));
            }
            features.extend_from_slice(&cells[..n_inputs]);
            labels.extend_from_slice(&cells[n_inputs..]);
            samples += 1;
        }

        if samples == 0 {
            return Err(Error::InvalidDataset("no samples".into()));
        }

        // Rows were read sample-major; transpose so samples become columns.
        let inputs = Matrix::from_vec(samples, n_inputs, features)?.transpose();
        let targets = Matrix::from_vec(samples, n_outputs, labels)?.transpose();
        Ok(Dataset { inputs, targets })
    }

    pub fn num_samples(&self) -> usize {
        self.inputs.cols()
    }

    pub fn num_features(&self) -> usize {
        self.inputs.rows()
    }

    pub fn num_outputs(&self) -> usize {
        self.targets.rows()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Parses `# INPUTS: n, OUTPUTS: m` (keys are case-insensitive).
fn parse_declaration(line: &str) -> Result<(usize, usize)> {
    let bad = || {
        Error::InvalidDataset(format!(
            "first line must look like \"# INPUTS: n, OUTPUTS: m\", got {line:?}"
        ))
    };

    let body = line.trim().strip_prefix('#').ok_or_else(bad)?;
    let mut inputs = None;
    let mut outputs = None;
    for part in body.split(',') {
        let (key, value) = part.split_once(':').ok_or_else(bad)?;
        let value: usize = value.trim().parse().map_err(|_| bad())?;
        match key.trim().to_ascii_uppercase().as_str() {
            "INPUTS" => inputs = Some(value),
            "OUTPUTS" => outputs = Some(value),
            _ => return Err(bad()),
        }
    }

    match (inputs, outputs) {
        (Some(i), Some(o)) if i > 0 && o > 0 => Ok((i, o)),
        _ => Err(bad()),
    }
}

fn parse_floats(line: &str, line_no: usize) -> Result<Vec<f64>> {
    line.split(',')
        .map(|cell| {
            let cell = cell.trim();
            cell.parse::<f64>().map_err(|_| {
                Error::InvalidDataset(format!("line {line_no}: '{cell}' is not a number"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR: &str = "# INPUTS: 2, OUTPUTS: 1\nx1,x2,y\n0,0,0\n0,1,1\n1,0,1\n\n1,1,0\n";

    #[test]
    fn samples_become_columns() {
        let ds = Dataset::parse_csv(XOR).unwrap();
        assert_eq!(ds.inputs.shape(), (2, 4));
        assert_eq!(ds.targets.shape(), (1, 4));
        assert_eq!(ds.inputs.as_slice(), &[0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(ds.targets.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn declaration_is_required() {
        let text = "x1,x2,y\n0,0,0\n";
        assert!(matches!(Dataset::parse_csv(text), Err(Error::InvalidDataset(_))));
    }

    #[test]
    fn short_rows_and_bad_cells_are_reported() {
        let short = "# INPUTS: 2, OUTPUTS: 1\nh\n0,1\n";
        let err = Dataset::parse_csv(short).unwrap_err().to_string();
        assert!(err.contains("line 3"), "{err}");

        let bad = "# INPUTS: 1, OUTPUTS: 1\nh\n0.5,abc\n";
        assert!(Dataset::parse_csv(bad).unwrap_err().to_string().contains("abc"));
    }

    #[test]
    fn header_only_file_has_no_samples() {
        let text = "# INPUTS: 1, OUTPUTS: 1\nx,y\n";
        assert!(Dataset::parse_csv(text).is_err());
    }
}
