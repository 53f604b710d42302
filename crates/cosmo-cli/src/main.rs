// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — xi-transform
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Transform a tabulated power spectrum into correlation-function multipoles.
//!
//! ```text
//! xi-transform --spectrum configs/linear_pk_demo.dat --config configs/demo_run.json
//! ```
//!
//! Output is whitespace-separated text on stdout: one block with the built
//! multipoles on a linear r grid, then one block per configured extraction.
//! Set `RUST_LOG=debug` for transform sizing details.

use anyhow::{bail, Context, Result};
use clap::Parser;
use cosmo_core::{
    build_correlation_function, extract_multipole, make_distortion_model, CorrelationFunction,
    ExtractedMultipole, TabulatedSpectrum,
};
use cosmo_types::config::{CorrelationConfig, RunConfig};
use cosmo_types::constants::{DEFAULT_LMAX, DEFAULT_TOLERANCE};
use log::info;
use std::io::{self, BufWriter, Write};

#[derive(Parser, Debug)]
#[command(name = "xi-transform")]
#[command(about = "Spherical Bessel transform of a tabulated P(k) into xi_ell(r)")]
#[command(version)]
struct Cli {
    /// Two-column text table of (k, P(k)); lines starting with '#' are skipped
    #[arg(short, long)]
    spectrum: String,

    /// JSON run configuration (distortion model, r-range, extractions)
    #[arg(short, long)]
    config: Option<String>,

    /// Spacing of the printed r grid
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Lower end of the r-range when no config file is given
    #[arg(long, default_value_t = 10.0)]
    r_min: f64,

    /// Upper end of the r-range when no config file is given
    #[arg(long, default_value_t = 200.0)]
    r_max: f64,
}

fn load_run_config(cli: &Cli) -> Result<RunConfig> {
    match &cli.config {
        Some(path) => {
            RunConfig::from_file(path).with_context(|| format!("loading run config {path}"))
        }
        None => Ok(RunConfig {
            spectrum: Default::default(),
            distortion: None,
            correlation: CorrelationConfig {
                r_min: cli.r_min,
                r_max: cli.r_max,
                lmax: DEFAULT_LMAX,
                tolerance: DEFAULT_TOLERANCE,
            },
            transform: Default::default(),
            extract: Vec::new(),
        }),
    }
}

/// Points r_min, r_min + step, ... up to and including r_max.
fn linear_grid(r_min: f64, r_max: f64, step: f64) -> Vec<f64> {
    let n = ((r_max - r_min) / step * (1.0 + 1e-12)).floor() as usize;
    (0..=n).map(|i| (r_min + i as f64 * step).min(r_max)).collect()
}

fn write_correlation(out: &mut impl Write, cf: &CorrelationFunction, step: f64) -> Result<()> {
    let (r_min, r_max) = cf.domain();
    let ells = cf.ells();
    write!(out, "# r")?;
    for ell in &ells {
        write!(out, " xi_{ell}")?;
    }
    writeln!(out)?;
    for r in linear_grid(r_min, r_max, step) {
        write!(out, "{r:.4}")?;
        for m in cf.multipoles() {
            write!(out, " {:.10e}", m.eval(r)?)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_extracted(out: &mut impl Write, xi: &ExtractedMultipole) -> Result<()> {
    writeln!(out, "# r xi_{}", xi.ell())?;
    for (r, v) in xi.r().iter().zip(xi.values().iter()) {
        writeln!(out, "{r:.4} {v:.10e}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if !(cli.step.is_finite() && cli.step > 0.0) {
        bail!("--step must be positive, got {}", cli.step);
    }

    let run = load_run_config(&cli)?;
    let spectrum = TabulatedSpectrum::from_file(&cli.spectrum, run.spectrum)
        .with_context(|| format!("reading spectrum table {}", cli.spectrum))?;
    let (k_lo, k_hi) = spectrum.k_range();
    let (below, above) = spectrum.tail_slopes();
    info!(
        "loaded {} spectrum points over k=[{k_lo:e}, {k_hi:e}], tail slopes {below:.3} / {above:.3}",
        spectrum.len()
    );

    let model = run
        .distortion
        .as_ref()
        .map(make_distortion_model)
        .transpose()
        .context("building distortion model")?;

    let cf = build_correlation_function(&spectrum, &run.correlation, model.as_ref(), &run.transform)
        .context("building correlation function")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_correlation(&mut out, &cf, cli.step)?;

    for (i, extract) in run.extract.iter().enumerate() {
        let xi = extract_multipole(&cf, extract)
            .with_context(|| format!("extraction #{i} (ell={})", extract.ell))?;
        writeln!(out)?;
        write_extracted(&mut out, &xi)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_grid_includes_endpoints() {
        let g = linear_grid(10.0, 20.0, 2.5);
        assert_eq!(g, vec![10.0, 12.5, 15.0, 17.5, 20.0]);
        let g = linear_grid(10.0, 20.0, 3.0);
        assert_eq!(g.len(), 4);
        assert!(*g.last().unwrap() <= 20.0);
    }

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::parse_from(["xi-transform", "--spectrum", "pk.dat"]);
        assert_eq!(cli.spectrum, "pk.dat");
        assert!(cli.config.is_none());
        assert_eq!(cli.step, 1.0);
        let run = load_run_config(&cli).unwrap();
        assert_eq!(run.correlation.r_min, 10.0);
        assert_eq!(run.correlation.r_max, 200.0);
        assert!(run.distortion.is_none());
    }
}
