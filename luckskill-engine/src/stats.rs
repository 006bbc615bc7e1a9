//! Descriptive statistics over per-trial series.
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::constants::MIN_INTERVAL_SAMPLES;
use crate::error::EngineError;
use crate::numbers::usize_to_f64;

/// Welford accumulator for mean and sample variance.
#[derive(Debug, Default, Clone)]
pub struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        let count = usize_to_f64(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    /// Sample variance (`n - 1` denominator); zero below two samples.
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / usize_to_f64(self.count - 1)).max(0.0)
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the mean.
    #[must_use]
    pub fn standard_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.std_dev() / usize_to_f64(self.count).sqrt()
        }
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::default();
        for value in iter {
            stats.add(value);
        }
        stats
    }
}

/// Count, mean, spread and range of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Returns `None` for an empty series.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let stats: RunningStats = values.iter().copied().collect();
        Some(Self {
            count: stats.count(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            min: stats.min,
            max: stats.max,
        })
    }
}

/// Two-sided Student-t interval around a sample mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub standard_error: f64,
    pub t_critical: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Student-t confidence interval for the mean of `values`, using `n - 1`
/// degrees of freedom.
///
/// # Errors
///
/// Returns `InsufficientSamples` with fewer than two values, `InvalidRange`
/// for a level outside `(0, 1)`, and `Distribution` if the t distribution
/// cannot be built.
pub fn student_t_interval(values: &[f64], level: f64) -> Result<ConfidenceInterval, EngineError> {
    if values.len() < MIN_INTERVAL_SAMPLES {
        return Err(EngineError::InsufficientSamples {
            required: MIN_INTERVAL_SAMPLES,
            actual: values.len(),
        });
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(EngineError::range(
            "confidence_level",
            format!("must be within (0, 1) (got {level})"),
        ));
    }

    let stats: RunningStats = values.iter().copied().collect();
    let freedom = usize_to_f64(values.len() - 1);
    let t_dist = StudentsT::new(0.0, 1.0, freedom)
        .map_err(|err| EngineError::Distribution(err.to_string()))?;
    let t_critical = t_dist.inverse_cdf(1.0 - (1.0 - level) / 2.0);

    let mean = stats.mean();
    let standard_error = stats.standard_error();
    let half_width = t_critical * standard_error;
    Ok(ConfidenceInterval {
        mean,
        standard_error,
        t_critical,
        lower: mean - half_width,
        upper: mean + half_width,
    })
}

/// One equal-width histogram bin; `upper` is exclusive except in the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin counts of a per-trial series, ready for an external plotter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Equal-width bins spanning `[min, max]` of the finite values. A
    /// constant series collapses into a single bin.
    #[must_use]
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let Some(summary) = Summary::from_values(&finite) else {
            return Self { bins: Vec::new() };
        };
        let (min, max) = (summary.min, summary.max);
        let span = max - min;
        if bins == 0 || span <= 0.0 {
            return Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: finite.len(),
                }],
            };
        }

        let width = span / usize_to_f64(bins);
        let mut counts = vec![0usize; bins];
        for value in &finite {
            let offset = ((value - min) / width).floor();
            let slot = num_traits::cast::<f64, usize>(offset)
                .unwrap_or(0)
                .min(bins - 1);
            counts[slot] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(idx, count)| HistogramBin {
                lower: min + width * usize_to_f64(idx),
                upper: min + width * usize_to_f64(idx + 1),
                count,
            })
            .collect();
        Self { bins }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_stats_match_closed_form() {
        let stats: RunningStats = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        assert!((stats.mean() - 5.0).abs() < 1e-12);
        assert!((stats.variance() - 32.0 / 7.0).abs() < 1e-12);
        assert_eq!(stats.count(), 8);
    }

    #[test]
    fn summary_tracks_range() {
        let summary = Summary::from_values(&[0.5, -1.0, 3.0]).unwrap();
        assert!((summary.min + 1.0).abs() < f64::EPSILON);
        assert!((summary.max - 3.0).abs() < f64::EPSILON);
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn interval_uses_student_t_quantile() {
        let interval = student_t_interval(&[0.0, 1.0, 0.0, 1.0], 0.95).unwrap();
        assert!((interval.mean - 0.5).abs() < 1e-12);
        assert!((interval.t_critical - 3.182_446).abs() < 1e-4);
        assert!((interval.standard_error - 0.288_675).abs() < 1e-5);
        assert!((interval.upper - interval.lower - 2.0 * 0.918_68).abs() < 1e-3);
    }

    #[test]
    fn constant_series_collapses_interval() {
        let interval = student_t_interval(&[0.25; 10], 0.95).unwrap();
        assert!((interval.lower - 0.25).abs() < 1e-12);
        assert!((interval.upper - 0.25).abs() < 1e-12);
    }

    #[test]
    fn interval_needs_two_samples() {
        assert_eq!(
            student_t_interval(&[0.4], 0.95).unwrap_err(),
            EngineError::InsufficientSamples {
                required: 2,
                actual: 1
            }
        );
        assert!(student_t_interval(&[0.1, 0.2], 1.0).is_err());
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0];
        let hist = Histogram::from_values(&values, 2);
        assert_eq!(hist.bins.len(), 2);
        assert_eq!(hist.bins[0].count, 2);
        assert_eq!(hist.bins[1].count, 3);
        assert_eq!(hist.total(), values.len());
    }

    #[test]
    fn histogram_handles_degenerate_input() {
        assert!(Histogram::from_values(&[], 5).bins.is_empty());
        let constant = Histogram::from_values(&[3.0, 3.0], 5);
        assert_eq!(constant.bins.len(), 1);
        assert_eq!(constant.total(), 2);
    }
}
