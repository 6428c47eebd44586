//! Writes a synthetic reference/candidate pair of seismogram sets, for trying
//! out `compare-examples` without running a simulation.
//!
//! ```text
//! <out>/reference/OUTPUT_FILES/AA.S0001.BXX.semd ...
//! <out>/candidate/OUTPUT_FILES/AA.S0001.BXX.semd ...
//! ```

use std::f64::consts::TAU;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "generate-traces", about = "Write synthetic seismograms for regression checks")]
struct Args {
    /// Output directory
    #[arg(long, default_value = "sample_traces")]
    out: PathBuf,

    /// Number of receivers
    #[arg(long, default_value_t = 4)]
    stations: usize,

    /// Samples per trace
    #[arg(long, default_value_t = 1000)]
    samples: usize,

    /// Time step in seconds
    #[arg(long, default_value_t = 1e-3)]
    dt: f64,

    /// Dominant source frequency in Hz
    #[arg(long, default_value_t = 10.0)]
    frequency: f64,

    /// Relative amplitude of the noise added to the candidate traces
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Seed for the candidate noise
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Ricker wavelet centred on `t0`.
fn ricker(t: f64, t0: f64, f0: f64) -> f64 {
    let a = (std::f64::consts::PI * f0 * (t - t0)).powi(2);
    (1.0 - 2.0 * a) * (-a).exp()
}

/// Zero-mean normal sample with standard deviation `sigma`.
fn gaussian(rng: &mut StdRng, sigma: f64) -> f64 {
    if sigma == 0.0 {
        return 0.0;
    }
    // Box-Muller; `1 - u` keeps the logarithm away from zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    sigma * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Two-column table in the layout the SPECFEM codes write.
fn format_trace(dt: f64, amplitudes: &[f64]) -> String {
    let mut text = String::with_capacity(amplitudes.len() * 32);
    for (i, a) in amplitudes.iter().enumerate() {
        let _ = writeln!(text, "{:>15.6e} {:>15.6e}", i as f64 * dt, a);
    }
    text
}

fn write_set(dir: &Path, traces: &[(String, Vec<f64>)], dt: f64) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (name, amplitudes) in traces {
        let path = dir.join(name);
        std::fs::write(&path, format_trace(dt, amplitudes))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut reference = Vec::new();
    let mut candidate = Vec::new();

    for station in 1..=args.stations {
        // Farther receivers see a later, weaker arrival.
        let t0 = 1.2 / args.frequency + 0.05 * station as f64;
        let gain = 1e-3 / station as f64;

        for (component, polarity) in [("BXX", 0.4), ("BXZ", 1.0)] {
            let name = format!("AA.S{station:04}.{component}.semd");
            let trace: Vec<f64> = (0..args.samples)
                .map(|i| gain * polarity * ricker(i as f64 * args.dt, t0, args.frequency))
                .collect();
            let noisy: Vec<f64> = trace
                .iter()
                .map(|&a| a + gaussian(&mut rng, args.noise * gain))
                .collect();
            reference.push((name.clone(), trace));
            candidate.push((name, noisy));
        }
    }

    let reference_dir = args.out.join("reference").join("OUTPUT_FILES");
    let candidate_dir = args.out.join("candidate").join("OUTPUT_FILES");
    write_set(&reference_dir, &reference, args.dt)?;
    write_set(&candidate_dir, &candidate, args.dt)?;

    log::info!("noise level {} (seed {})", args.noise, args.seed);
    println!(
        "Wrote {} traces ({} samples each) to {} and {}",
        reference.len(),
        args.samples,
        reference_dir.display(),
        candidate_dir.display()
    );
    Ok(())
}
