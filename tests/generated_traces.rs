use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

/// Writes `<root>/gen/reference` and moves the candidate set to
/// `<root>/repo/EXAMPLES/reference`, so `compare-examples gen reference <root>`
/// finds both.
fn generate(root: &Path, noise: &str) {
    let out = root.join("gen");
    let status = Command::new(env!("CARGO_BIN_EXE_generate-traces"))
        .args(["--out", out.to_str().unwrap(), "--stations", "3", "--samples", "400"])
        .args(["--noise", noise, "--seed", "7"])
        .status()
        .unwrap();
    assert!(status.success());

    let examples = root.join("repo/EXAMPLES");
    fs::create_dir_all(&examples).unwrap();
    fs::rename(out.join("candidate"), examples.join("reference")).unwrap();
}

fn compare(root: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compare-examples"))
        .current_dir(root.join("repo"))
        .args(["gen", "reference", root.to_str().unwrap(), "--skip-run"])
        .output()
        .unwrap()
}

#[test]
fn noiseless_sets_match() {
    let root = tempdir().unwrap();
    generate(root.path(), "0");

    let output = compare(root.path());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{text}");
    assert!(text.contains("AA.S0003.BXZ.semd"), "{text}");
    assert_eq!(text.matches(".semd|").count(), 6, "{text}");
    assert!(text.ends_with("Success\n"), "{text}");
}

#[test]
fn noisy_candidate_fails() {
    let root = tempdir().unwrap();
    generate(root.path(), "0.05");

    let output = compare(root.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).ends_with("Failure\n"));
}

#[test]
fn same_seed_gives_same_noise() {
    let root = tempdir().unwrap();
    for dir in ["a", "b"] {
        let status = Command::new(env!("CARGO_BIN_EXE_generate-traces"))
            .args(["--out", root.path().join(dir).to_str().unwrap()])
            .args(["--stations", "1", "--samples", "50", "--noise", "0.1", "--seed", "3"])
            .status()
            .unwrap();
        assert!(status.success());
    }
    let trace = "candidate/OUTPUT_FILES/AA.S0001.BXZ.semd";
    assert_eq!(
        fs::read_to_string(root.path().join("a").join(trace)).unwrap(),
        fs::read_to_string(root.path().join("b").join(trace)).unwrap()
    );
}
