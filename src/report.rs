//! Rendering of comparison results: the text table printed by the command and
//! machine-readable JSON / CSV exports.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Tolerances;
use crate::data::model::{AggregateResult, Comparison, MetricResult, PairFailure};

const NAME_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 13;
const RULE_WIDTH: usize = 50;

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Scientific notation with five decimals and a signed exponent of at least
/// two digits, e.g. `9.99871e-01`.
pub fn sci(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{value:.5e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

// ---------------------------------------------------------------------------
// Text table
// ---------------------------------------------------------------------------

pub fn write_dirs(
    out: &mut impl Write,
    reference_dir: &Path,
    candidate_dir: &Path,
) -> io::Result<()> {
    writeln!(out, "ref_dir= {}", reference_dir.display())?;
    writeln!(out, "example_dir= {}", candidate_dir.display())
}

/// One row per pair, a rule, then the aggregate min/max row.
pub fn write_table(
    out: &mut impl Write,
    report: &[MetricResult],
    aggregate: &AggregateResult,
) -> io::Result<()> {
    writeln!(
        out,
        "|{:<NAME_WIDTH$}| {:<VALUE_WIDTH$}| {:<VALUE_WIDTH$}|",
        "file name", "corr", "err"
    )?;
    for row in report {
        writeln!(
            out,
            "|{:>NAME_WIDTH$}| {:>VALUE_WIDTH$}| {:>VALUE_WIDTH$}|",
            row.file_name,
            sci(row.correlation),
            sci(row.normalized_error)
        )?;
    }
    writeln!(out, "|{}|", "-".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "|{:<NAME_WIDTH$}| {:>VALUE_WIDTH$}| {:>VALUE_WIDTH$}|",
        "min/max",
        sci(aggregate.min_correlation),
        sci(aggregate.max_error)
    )
}

pub fn write_failures(out: &mut impl Write, failures: &[PairFailure]) -> io::Result<()> {
    for failure in failures {
        writeln!(out, "skipped {}: {}", failure.file_name, failure.message)?;
    }
    Ok(())
}

pub fn write_verdict(out: &mut impl Write, passed: bool) -> io::Result<()> {
    writeln!(out, "{}", if passed { "Success" } else { "Failure" })
}

// ---------------------------------------------------------------------------
// Machine-readable exports
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonReport<'a> {
    reference_dir: &'a Path,
    candidate_dir: &'a Path,
    tolerances: &'a Tolerances,
    #[serde(flatten)]
    comparison: &'a Comparison,
}

/// Write the comparison as pretty-printed JSON.
pub fn write_json(
    path: &Path,
    reference_dir: &Path,
    candidate_dir: &Path,
    tolerances: &Tolerances,
    comparison: &Comparison,
) -> Result<()> {
    let doc = JsonReport {
        reference_dir,
        candidate_dir,
        tolerances,
        comparison,
    };
    let text = serde_json::to_string_pretty(&doc).context("serializing JSON report")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Wrote JSON report to {}", path.display());
    Ok(())
}

/// Write one CSV row per compared pair:
/// `file_name,correlation,normalized_error`.
pub fn write_csv(path: &Path, report: &[MetricResult]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in report {
        writer
            .serialize(row)
            .with_context(|| format!("writing CSV row for {}", row.file_name))?;
    }
    writer.flush().context("flushing CSV report")?;
    log::info!("Wrote CSV report ({} rows) to {}", report.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(reference_dir: &Path, candidate_dir: &Path, comparison: &Comparison) -> String {
        let mut buf = Vec::new();
        write_dirs(&mut buf, reference_dir, candidate_dir).unwrap();
        write_table(&mut buf, &comparison.report, &comparison.aggregate).unwrap();
        write_failures(&mut buf, &comparison.failures).unwrap();
        write_verdict(&mut buf, comparison.passed).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn row(name: &str, correlation: f64, normalized_error: f64) -> MetricResult {
        MetricResult {
            file_name: name.to_string(),
            correlation,
            normalized_error,
        }
    }

    #[test]
    fn sci_matches_c_formatting() {
        assert_eq!(sci(1.0), "1.00000e+00");
        assert_eq!(sci(0.0), "0.00000e+00");
        assert_eq!(sci(0.999871), "9.99871e-01");
        assert_eq!(sci(-2.5e-7), "-2.50000e-07");
        assert_eq!(sci(1.5e120), "1.50000e+120");
    }

    #[test]
    fn table_layout() {
        let report = vec![row("A.semd", 1.0, 0.0), row("B.semd", 0.999871, 2.5e-5)];
        let comparison = Comparison {
            passed: true,
            aggregate: AggregateResult::from_results(&report),
            report,
            failures: Vec::new(),
        };

        let text = render(Path::new("ref/"), Path::new("out/"), &comparison);
        let expected = "\
ref_dir= ref/
example_dir= out/
|file name           | corr         | err          |
|              A.semd|   1.00000e+00|   0.00000e+00|
|              B.semd|   9.99871e-01|   2.50000e-05|
|--------------------------------------------------|
|min/max             |   9.99871e-01|   2.50000e-05|
Success
";
        assert_eq!(text, expected);
    }

    #[test]
    fn skipped_pairs_follow_the_table() {
        let comparison = Comparison {
            passed: false,
            report: Vec::new(),
            aggregate: AggregateResult::default(),
            failures: vec![PairFailure {
                file_name: "C.semd".to_string(),
                message: "missing file: out/C.semd".to_string(),
            }],
        };
        let text = render(Path::new("ref"), Path::new("out"), &comparison);
        assert!(text.contains("skipped C.semd: missing file: out/C.semd\nFailure\n"), "{text}");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_csv(&path, &[row("A.semd", 1.0, 0.0), row("B.semd", 0.5, 0.25)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "file_name,correlation,normalized_error");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("B.semd,0.5,0.25"));
    }

    #[test]
    fn json_export_flattens_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = vec![row("A.semd", 1.0, 0.0)];
        let comparison = Comparison {
            passed: true,
            aggregate: AggregateResult::from_results(&report),
            report,
            failures: Vec::new(),
        };
        let tolerances = Tolerances::default();
        write_json(&path, Path::new("ref"), Path::new("out"), &tolerances, &comparison).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["passed"], true);
        assert_eq!(value["reference_dir"], "ref");
        assert_eq!(value["tolerances"]["min_correlation"], 0.99);
        assert_eq!(value["report"][0]["file_name"], "A.semd");
        assert_eq!(value["aggregate"]["max_error"], 0.0);
        assert!(value.get("failures").is_none());
    }
}
