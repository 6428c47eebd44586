use std::io::ErrorKind;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use ndarray::Array1;

use super::model::{FilePair, Trace};
use crate::error::{Error, Result};

/// Pattern matching the seismograms written by the SPECFEM codes
/// (`.semd`, `.semv`, `.sema`, `.semp`, ...).
pub const DEFAULT_PATTERN: &str = "*.sem*";

// ---------------------------------------------------------------------------
// Trace loader
// ---------------------------------------------------------------------------

/// Load a seismogram from a plain-text table.
///
/// Layout: one sample per row, whitespace-separated numeric fields, no header.
/// The first column is time, the second the amplitude; further columns are
/// allowed but ignored. Every row must have the same number of fields.
/// Blank lines and lines starting with `#` are skipped.
pub fn load_trace(path: &Path) -> Result<Trace> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingFile {
            path: path.to_path_buf(),
        },
        _ => Error::io(path, e),
    })?;
    parse_trace(path, &text)
}

/// Parse the text of a seismogram file. `path` is only used in errors.
pub fn parse_trace(path: &Path, text: &str) -> Result<Trace> {
    let mut time = Vec::new();
    let mut amplitude = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = line
            .split_whitespace()
            .enumerate()
            .map(|(col, tok)| parse_field(path, line_no, col, tok))
            .collect::<Result<Vec<f64>>>()?;

        match width {
            None if fields.len() < 2 => {
                return Err(Error::malformed(
                    path,
                    line_no,
                    format!("expected at least 2 columns, found {}", fields.len()),
                ));
            }
            None => width = Some(fields.len()),
            Some(w) if w != fields.len() => {
                return Err(Error::malformed(
                    path,
                    line_no,
                    format!("row has {} columns but previous rows have {w}", fields.len()),
                ));
            }
            Some(_) => {}
        }

        time.push(fields[0]);
        amplitude.push(fields[1]);
    }

    if amplitude.is_empty() {
        return Err(Error::malformed(path, 0, "no data rows"));
    }

    Ok(Trace {
        path: path.to_path_buf(),
        time: Array1::from(time),
        amplitude: Array1::from(amplitude),
    })
}

fn parse_field(path: &Path, line: usize, col: usize, tok: &str) -> Result<f64> {
    let value: f64 = tok.parse().map_err(|_| {
        Error::malformed(path, line, format!("column {}: '{tok}' is not a number", col + 1))
    })?;
    if !value.is_finite() {
        return Err(Error::malformed(
            path,
            line,
            format!("column {}: non-finite value '{tok}'", col + 1),
        ));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Pair discovery
// ---------------------------------------------------------------------------

/// List the reference files matching `pattern` and pair each with the
/// candidate file of the same name, sorted by name.
///
/// Only the reference directory drives discovery: extra candidate files are
/// ignored. Whether each candidate actually exists is checked when the pair is
/// compared, so a missing candidate fails at its place in the report.
pub fn discover_pairs(
    reference_dir: &Path,
    candidate_dir: &Path,
    pattern: &str,
) -> Result<Vec<FilePair>> {
    let pattern = Pattern::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    if !candidate_dir.is_dir() {
        return Err(Error::MissingFile {
            path: candidate_dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(reference_dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingFile {
            path: reference_dir.to_path_buf(),
        },
        _ => Error::io(reference_dir, e),
    })?;

    let mut pairs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(reference_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            log::warn!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        if !pattern.matches_with(&name, options) {
            continue;
        }
        let candidate = candidate_dir.join(&name);
        pairs.push(FilePair::new(name, path, candidate));
    }

    pairs.sort_by(|a, b| a.name().cmp(b.name()));
    log::debug!(
        "Found {} reference file(s) matching '{}' in {}",
        pairs.len(),
        pattern,
        reference_dir.display()
    );
    Ok(pairs)
}
