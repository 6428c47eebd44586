//! Directory-level comparisons through the public API.

use std::fs;
use std::path::Path;

use compare_examples::{
    AggregateResult, Comparator, CompareConfig, Error, ErrorPolicy, ExampleLayout,
};
use tempfile::tempdir;

fn write_rows(path: &Path, rows: &[(f64, f64)]) {
    let text: String = rows.iter().map(|(t, a)| format!("{t} {a}\n")).collect();
    fs::write(path, text).unwrap();
}

/// Reference and candidate OUTPUT_FILES directories inside one repository.
fn example(root: &Path) -> ExampleLayout {
    let layout = ExampleLayout::new(
        "specfem2d",
        "simple/homogeneous",
        root.join("refs"),
        root.join("repo"),
    );
    fs::create_dir_all(layout.reference_dir()).unwrap();
    fs::create_dir_all(layout.candidate_dir()).unwrap();
    layout
}

#[test]
fn identical_sets_report_perfect_scores() {
    let root = tempdir().unwrap();
    let layout = example(root.path());
    let a = [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)];
    let b = [(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)];
    for dir in [layout.reference_dir(), layout.candidate_dir()] {
        write_rows(&dir.join("A.semd"), &a);
        write_rows(&dir.join("B.semd"), &b);
    }

    let cmp = Comparator::default()
        .compare(&layout.reference_dir(), &layout.candidate_dir())
        .unwrap();

    let rows: Vec<(&str, f64, f64)> = cmp
        .report
        .iter()
        .map(|r| (r.file_name.as_str(), r.correlation, r.normalized_error))
        .collect();
    assert_eq!(rows, vec![("A.semd", 1.0, 0.0), ("B.semd", 1.0, 0.0)]);
    assert_eq!(cmp.aggregate, AggregateResult::default());
    assert!(cmp.passed);
}

#[test]
fn extra_candidate_row_aborts() {
    let root = tempdir().unwrap();
    let layout = example(root.path());
    write_rows(&layout.reference_dir().join("A.semd"), &[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
    write_rows(
        &layout.candidate_dir().join("A.semd"),
        &[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0), (3.0, 4.0)],
    );

    let aborted = Comparator::default()
        .compare(&layout.reference_dir(), &layout.candidate_dir())
        .unwrap_err();
    assert!(aborted.completed.is_empty());
    assert!(matches!(aborted.source, Error::ShapeMismatch { reference: 3, candidate: 4, .. }));
}

#[test]
fn empty_reference_set_is_a_vacuous_pass() {
    let root = tempdir().unwrap();
    let layout = example(root.path());

    let cmp = Comparator::default()
        .compare(&layout.reference_dir(), &layout.candidate_dir())
        .unwrap();
    assert!(cmp.passed);
    assert!(cmp.is_vacuous());
    assert_eq!(cmp.aggregate.min_correlation, 1.0);
    assert_eq!(cmp.aggregate.max_error, 0.0);
}

#[test]
fn malformed_candidate_is_reported() {
    let root = tempdir().unwrap();
    let layout = example(root.path());
    write_rows(&layout.reference_dir().join("A.semd"), &[(0.0, 1.0), (1.0, 2.0)]);
    fs::write(layout.candidate_dir().join("A.semd"), "0.0 1.0\n1.0 ***********\n").unwrap();

    let aborted = Comparator::default()
        .compare(&layout.reference_dir(), &layout.candidate_dir())
        .unwrap_err();
    match aborted.source {
        Error::MalformedData { line, ref path, .. } => {
            assert_eq!(line, 2);
            assert!(path.ends_with("OUTPUT_FILES/A.semd"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn keep_going_collects_every_problem() {
    let root = tempdir().unwrap();
    let layout = example(root.path());
    let good = [(0.0, 0.1), (1.0, -0.4), (2.0, 0.9)];
    write_rows(&layout.reference_dir().join("A.semd"), &good);
    write_rows(&layout.candidate_dir().join("A.semd"), &good);
    write_rows(&layout.reference_dir().join("B.semd"), &good);
    write_rows(&layout.reference_dir().join("C.semd"), &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    write_rows(&layout.candidate_dir().join("C.semd"), &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);

    let config = CompareConfig {
        on_error: ErrorPolicy::Skip,
        ..CompareConfig::default()
    };
    let cmp = Comparator::new(config)
        .compare(&layout.reference_dir(), &layout.candidate_dir())
        .unwrap();

    assert!(!cmp.passed);
    assert_eq!(cmp.report.len(), 1);
    let skipped: Vec<&str> = cmp.failures.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(skipped, vec!["B.semd", "C.semd"]);
    assert!(cmp.failures[1].message.contains("identically zero"));
}

#[test]
fn phase_shift_fails_correlation() {
    let root = tempdir().unwrap();
    let layout = example(root.path());
    let n = 200;
    let wave = |shift: f64| -> Vec<(f64, f64)> {
        (0..n)
            .map(|i| {
                let t = i as f64 * 0.01;
                (t, (2.0 * std::f64::consts::PI * (t - shift)).sin())
            })
            .collect()
    };
    write_rows(&layout.reference_dir().join("S.semd"), &wave(0.0));
    write_rows(&layout.candidate_dir().join("S.semd"), &wave(0.25));

    let cmp = Comparator::default()
        .compare(&layout.reference_dir(), &layout.candidate_dir())
        .unwrap();
    assert!(!cmp.passed);
    assert!(cmp.aggregate.min_correlation.abs() < 0.1, "{:?}", cmp.aggregate);
}
