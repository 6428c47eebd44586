use std::path::{Path, PathBuf};

/// Directory holding the seismograms of one example, in both the reference
/// tree and the simulation repository.
pub const OUTPUT_DIR: &str = "OUTPUT_FILES";
pub const EXAMPLES_DIR: &str = "EXAMPLES";
pub const RUNNER_SCRIPT: &str = "run_this_example.sh";

// ---------------------------------------------------------------------------
// Example layout
// ---------------------------------------------------------------------------

/// Where one example lives on disk.
///
/// ```text
/// <reference_top_dir>/<code_name>/<example_name>/OUTPUT_FILES/   reference
/// <repo_dir>/EXAMPLES/<example_name>/OUTPUT_FILES/               candidate
/// <repo_dir>/EXAMPLES/<example_name>/run_this_example.sh         runner
/// ```
///
/// `example_name` may be nested, e.g. `fluid_solid/fluid_solid_external_mesh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleLayout {
    /// Simulation code, e.g. `specfem2d`.
    pub code_name: String,
    pub example_name: String,
    pub reference_top_dir: PathBuf,
    /// Top of the simulation repository (contains `EXAMPLES/`).
    pub repo_dir: PathBuf,
}

impl ExampleLayout {
    pub fn new(
        code_name: impl Into<String>,
        example_name: impl Into<String>,
        reference_top_dir: impl Into<PathBuf>,
        repo_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            code_name: code_name.into(),
            example_name: example_name.into(),
            reference_top_dir: reference_top_dir.into(),
            repo_dir: repo_dir.into(),
        }
    }

    pub fn reference_dir(&self) -> PathBuf {
        self.reference_top_dir
            .join(&self.code_name)
            .join(example_path(&self.example_name))
            .join(OUTPUT_DIR)
    }

    pub fn example_dir(&self) -> PathBuf {
        self.repo_dir.join(EXAMPLES_DIR).join(example_path(&self.example_name))
    }

    pub fn candidate_dir(&self) -> PathBuf {
        self.example_dir().join(OUTPUT_DIR)
    }

    pub fn runner_script(&self) -> PathBuf {
        self.example_dir().join(RUNNER_SCRIPT)
    }
}

/// Example names use `/` regardless of platform; trailing or doubled slashes
/// are tolerated.
fn example_path(name: &str) -> PathBuf {
    name.split('/').filter(|part| !part.is_empty()).collect::<PathBuf>()
}

/// Strip the repository prefix for log output.
pub fn relative_to<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_all_paths() {
        let layout = ExampleLayout::new(
            "specfem2d",
            "fluid_solid/fluid_solid_external_mesh/",
            "/refs",
            "/repo",
        );
        assert_eq!(
            layout.reference_dir(),
            Path::new("/refs/specfem2d/fluid_solid/fluid_solid_external_mesh/OUTPUT_FILES")
        );
        assert_eq!(
            layout.candidate_dir(),
            Path::new("/repo/EXAMPLES/fluid_solid/fluid_solid_external_mesh/OUTPUT_FILES")
        );
        assert_eq!(
            layout.runner_script(),
            Path::new("/repo/EXAMPLES/fluid_solid/fluid_solid_external_mesh/run_this_example.sh")
        );
    }

    #[test]
    fn relative_paths_for_logging() {
        let layout = ExampleLayout::new("specfem3d", "Tape2007", "/refs", "/repo");
        assert_eq!(
            relative_to(&layout.candidate_dir(), Path::new("/repo")),
            Path::new("EXAMPLES/Tape2007/OUTPUT_FILES")
        );
        assert_eq!(
            relative_to(Path::new("/elsewhere"), Path::new("/repo")),
            Path::new("/elsewhere")
        );
    }
}
