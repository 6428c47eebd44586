use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::Parser;

use compare_examples::env::EnvConfig;
use compare_examples::layout::relative_to;
use compare_examples::report;
use compare_examples::runner::{ExampleRunner, RunnerConfig};
use compare_examples::{
    AggregateResult, Comparator, CompareConfig, Comparison, ErrorPolicy, ExampleLayout,
};

/// Run a simulation example and compare its seismograms with a reference set.
///
/// Expects to be started from the top of the simulation repository (the
/// directory containing EXAMPLES/), or to be pointed at it with --repo-dir.
#[derive(Parser)]
#[command(name = "compare-examples")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Simulation code, e.g. specfem2d
    code_name: String,

    /// Example as it appears under EXAMPLES/, e.g. fluid_solid/fluid_solid_external_mesh
    example_name: String,

    /// Top directory of the reference seismograms (<top>/<code>/<example>/OUTPUT_FILES)
    reference_top_dir: PathBuf,

    /// Top of the simulation repository
    #[arg(long, default_value = ".")]
    repo_dir: PathBuf,

    /// JSON comparator configuration (pattern, tolerances, policies)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Glob selecting the seismogram files
    #[arg(long)]
    pattern: Option<String>,

    /// Lowest acceptable correlation [default: 0.99]
    #[arg(long)]
    min_correlation: Option<f64>,

    /// Highest acceptable normalized error [default: 1e-4]
    #[arg(long)]
    max_error: Option<f64>,

    /// JSON file with the environment for the example run; replaces the inherited one
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Compare existing output without running the example
    #[arg(long)]
    skip_run: bool,

    /// Do not fail when the example script exits with a non-zero status
    #[arg(long)]
    ignore_runner_status: bool,

    /// Report unreadable or mismatched pairs and continue instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Fail when no seismogram matches the pattern
    #[arg(long)]
    fail_on_empty: bool,

    /// Compare file pairs in parallel
    #[arg(long)]
    parallel: bool,

    /// Also write the report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also write the per-file metrics as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn compare_config(&self) -> Result<CompareConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => CompareConfig::default(),
        };
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(v) = self.min_correlation {
            config.tolerances.min_correlation = v;
        }
        if let Some(v) = self.max_error {
            config.tolerances.max_error = v;
        }
        if self.keep_going {
            config.on_error = ErrorPolicy::Skip;
        }
        config.fail_on_empty |= self.fail_on_empty;
        config.parallel |= self.parallel;

        let tol = &config.tolerances;
        ensure!(
            (-1.0..=1.0).contains(&tol.min_correlation),
            "min correlation must lie in [-1, 1], got {}",
            tol.min_correlation
        );
        ensure!(
            tol.max_error >= 0.0,
            "max error must be non-negative, got {}",
            tol.max_error
        );
        Ok(config)
    }

    fn runner_config(&self) -> Result<RunnerConfig> {
        let env = self
            .env_file
            .as_deref()
            .map(EnvConfig::from_json_file)
            .transpose()?;
        Ok(RunnerConfig {
            env,
            ignore_status: self.ignore_runner_status,
        })
    }

    fn layout(&self) -> ExampleLayout {
        ExampleLayout::new(
            self.code_name.clone(),
            self.example_name.clone(),
            self.reference_top_dir.clone(),
            self.repo_dir.clone(),
        )
    }
}

fn load_config(path: &Path) -> Result<CompareConfig> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            println!("Failure");
            ExitCode::FAILURE
        }
    }
}

/// Returns the verdict; errors mean the comparison could not be completed.
fn run(cli: &Cli) -> Result<bool> {
    let config = cli.compare_config()?;
    let layout = cli.layout();
    log::info!(
        "{} example {}",
        layout.code_name,
        relative_to(&layout.example_dir(), &cli.repo_dir).display()
    );

    if cli.skip_run {
        log::info!("Skipping example run");
    } else {
        ExampleRunner::new(layout.runner_script(), cli.runner_config()?)
            .run()
            .context("running example")?;
    }

    let reference_dir = layout.reference_dir();
    let candidate_dir = layout.candidate_dir();
    let comparator = Comparator::new(config);
    let mut out = std::io::stdout().lock();

    match comparator.compare(&reference_dir, &candidate_dir) {
        Ok(comparison) => {
            report::write_dirs(&mut out, &reference_dir, &candidate_dir)?;
            report::write_table(&mut out, &comparison.report, &comparison.aggregate)?;
            report::write_failures(&mut out, &comparison.failures)?;
            out.flush()?;
            if comparison.is_vacuous() {
                eprintln!(
                    "Warning: no files matching '{}' in {}, nothing was compared",
                    comparator.config().pattern,
                    reference_dir.display()
                );
            }
            // The verdict line goes last; a failed export must only ever print `Failure`.
            export(cli, comparator.config(), &reference_dir, &candidate_dir, &comparison)?;
            report::write_verdict(&mut out, comparison.passed)?;
            Ok(comparison.passed)
        }
        Err(aborted) => {
            report::write_dirs(&mut out, &reference_dir, &candidate_dir)?;
            let partial = AggregateResult::from_results(&aborted.completed);
            report::write_table(&mut out, &aborted.completed, &partial)?;
            out.flush()?;
            Err(aborted.into())
        }
    }
}

fn export(
    cli: &Cli,
    config: &CompareConfig,
    reference_dir: &Path,
    candidate_dir: &Path,
    comparison: &Comparison,
) -> Result<()> {
    if let Some(path) = &cli.json {
        report::write_json(path, reference_dir, candidate_dir, &config.tolerances, comparison)?;
    }
    if let Some(path) = &cli.csv {
        report::write_csv(path, &comparison.report)?;
    }
    Ok(())
}
