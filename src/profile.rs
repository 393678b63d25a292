//! Hourly wind power profiles: CSV import and a synthetic AR(1) generator.

use std::error::Error;
use std::io;
use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Minimum capacity-factor multiplier (deep lull).
const MULTIPLIER_MIN: f64 = 0.0;
/// Maximum capacity-factor multiplier (storm front, still below rated).
const MULTIPLIER_MAX: f64 = 1.0;

/// Hourly available wind power in MW, one sample per hour.
#[derive(Debug, Clone)]
pub struct WindProfile {
    hours: Vec<f64>,
}

impl WindProfile {
    /// Wraps an explicit hourly series. Negative samples are clipped to zero.
    pub fn from_hourly_mw(samples: Vec<f64>) -> Self {
        Self {
            hours: samples.into_iter().map(|p| p.max(0.0)).collect(),
        }
    }

    /// Constant output over `hours` hours. Mostly useful in tests.
    pub fn constant(p_mw: f64, hours: usize) -> Self {
        Self {
            hours: vec![p_mw.max(0.0); hours],
        }
    }

    /// Reads an hourly profile from a CSV file.
    ///
    /// The last column of each record is taken as power in MW, so a leading
    /// hour-index or timestamp column is ignored; a non-numeric first row is
    /// treated as a header and skipped. Negative samples are clipped to zero.
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        Self::from_csv_reader(std::fs::File::open(path)?)
    }

    /// Reads an hourly profile from any CSV source.
    pub fn from_csv_reader(source: impl io::Read) -> Result<Self, Box<dyn Error>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut hours = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let field = record
                .get(record.len().saturating_sub(1))
                .unwrap_or("")
                .trim();
            match field.parse::<f64>() {
                Ok(p) => hours.push(p.max(0.0)),
                // Tolerate a header line, reject garbage further down.
                Err(_) if i == 0 => continue,
                Err(e) => {
                    return Err(format!("row {}: bad power value {field:?}: {e}", i + 1).into());
                }
            }
        }
        Ok(Self { hours })
    }

    /// Generates a synthetic hourly profile from a seeded AR(1) process on
    /// the capacity factor.
    ///
    /// The multiplier evolves as `m(t) = alpha * m(t-1) + (1 - alpha) *
    /// (mean_cf + epsilon(t))` with Gaussian innovations and is clamped to
    /// \[0, 1\], so output never exceeds `p_rated_mw`. Identical seeds give
    /// identical profiles.
    pub fn synthetic(p_rated_mw: f64, hours: usize, seed: u64) -> Self {
        const ALPHA: f64 = 0.94;
        const MEAN_CF: f64 = 0.45;
        const NOISE_STD: f64 = 0.35;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut multiplier = MEAN_CF;
        let mut samples = Vec::with_capacity(hours);
        for _ in 0..hours {
            let epsilon = gaussian_noise(&mut rng, NOISE_STD);
            multiplier = ALPHA * multiplier + (1.0 - ALPHA) * (MEAN_CF + epsilon);
            multiplier = multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
            samples.push(p_rated_mw.max(0.0) * multiplier);
        }
        Self { hours: samples }
    }

    /// Tiles the profile end to end until it covers `years` profile years,
    /// truncated to whole years of the base length.
    pub fn repeat_years(&self, years: usize) -> Self {
        let mut hours = Vec::with_capacity(self.hours.len() * years);
        for _ in 0..years {
            hours.extend_from_slice(&self.hours);
        }
        Self { hours }
    }

    /// Number of simulated hours.
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    /// Whether the profile holds no samples.
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// The hourly samples in MW.
    pub fn hours(&self) -> &[f64] {
        &self.hours
    }
}

/// Box-Muller Gaussian sample with the given standard deviation.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_samples_are_clipped() {
        let p = WindProfile::from_hourly_mw(vec![100.0, -5.0, 0.0]);
        assert_eq!(p.hours(), &[100.0, 0.0, 0.0]);
    }

    #[test]
    fn repeat_years_tiles_the_base_profile() {
        let p = WindProfile::from_hourly_mw(vec![1.0, 2.0]).repeat_years(3);
        assert_eq!(p.len(), 6);
        assert_eq!(p.hours(), &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn synthetic_is_seed_deterministic() {
        let a = WindProfile::synthetic(1500.0, 500, 42);
        let b = WindProfile::synthetic(1500.0, 500, 42);
        assert_eq!(a.hours(), b.hours());
    }

    #[test]
    fn different_seeds_differ() {
        let a = WindProfile::synthetic(1500.0, 500, 42);
        let b = WindProfile::synthetic(1500.0, 500, 43);
        assert!(a.hours().iter().zip(b.hours()).any(|(x, y)| x != y));
    }

    #[test]
    fn synthetic_stays_within_rated_power() {
        let p = WindProfile::synthetic(1500.0, 5000, 7);
        for &mw in p.hours() {
            assert!((0.0..=1500.0).contains(&mw));
        }
    }

    #[test]
    fn csv_import_skips_header_and_clips() {
        let data = "wind_mw\n120.5\n-3.0\n0\n";
        let p = WindProfile::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(p.hours(), &[120.5, 0.0, 0.0]);
    }

    #[test]
    fn csv_import_without_header() {
        let data = "100.0\n200.0\n";
        let p = WindProfile::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(p.hours(), &[100.0, 200.0]);
    }

    #[test]
    fn csv_import_ignores_a_leading_index_column() {
        let data = "t,wind_mw\n0,100.0\n1,200.0\n";
        let p = WindProfile::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(p.hours(), &[100.0, 200.0]);
    }

    #[test]
    fn csv_import_rejects_garbage_rows() {
        let data = "100.0\nnot-a-number\n";
        assert!(WindProfile::from_csv_reader(data.as_bytes()).is_err());
    }
}
