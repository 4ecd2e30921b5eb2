//! FFT-based Frequency Analysis

use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// Frequency band definitions in cycles per sample (Nyquist = 0.5)
#[derive(Debug, Clone, Copy)]
pub struct FrequencyBands {
    /// Slow variability band
    pub low: (f64, f64),
    /// Transit-scale band
    pub medium: (f64, f64),
    /// Point-to-point noise band
    pub high: (f64, f64),
}

impl Default for FrequencyBands {
    fn default() -> Self {
        Self {
            low: (0.0, 0.05),
            medium: (0.05, 0.2),
            high: (0.2, 0.5),
        }
    }
}

/// Windowed periodogram of a flux series
pub struct FftAnalyzer {
    planner: FftPlanner<f64>,
    bands: FrequencyBands,
}

/// Band powers and summary of one periodogram
#[derive(Debug, Clone, Default)]
pub struct SpectralFeatures {
    pub power_low: f64,
    pub power_medium: f64,
    pub power_high: f64,
    /// Frequency of the strongest bin (cycles per sample)
    pub dominant_frequency: f64,
    /// Power-weighted mean frequency, NaN for a flat series
    pub spectral_centroid: f64,
    pub total_power: f64,
}

impl FftAnalyzer {
    /// Analyzer with the default bands
    pub fn new() -> Self {
        Self::with_bands(FrequencyBands::default())
    }

    /// Analyzer with custom bands
    pub fn with_bands(bands: FrequencyBands) -> Self {
        Self {
            planner: FftPlanner::new(),
            bands,
        }
    }

    /// Mean-removed, Hamming-windowed series as complex samples
    fn prepare(signal: &[f64]) -> Vec<Complex<f64>> {
        let n = signal.len();
        let mean = signal.iter().sum::<f64>() / n as f64;
        let denom = n.saturating_sub(1).max(1) as f64;

        signal
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let window = if n < 2 {
                    1.0
                } else {
                    0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos()
                };
                Complex::new((v - mean) * window, 0.0)
            })
            .collect()
    }

    /// One-sided power per bin, bin `k` at `k / n` cycles per sample
    fn periodogram(&mut self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        let mut buffer = Self::prepare(signal);
        self.planner.plan_fft_forward(n).process(&mut buffer);

        buffer
            .iter()
            .take(n / 2 + 1)
            .map(|c| c.norm_sqr() / n as f64)
            .collect()
    }

    /// Spectral features of a series sampled at unit cadence
    pub fn analyze(&mut self, signal: &[f64]) -> SpectralFeatures {
        if signal.is_empty() {
            return SpectralFeatures::default();
        }

        let resolution = 1.0 / signal.len() as f64;
        let spectrum = self.periodogram(signal);
        let bins = || {
            spectrum
                .iter()
                .enumerate()
                .map(move |(k, &power)| (k as f64 * resolution, power))
        };
        let band = |(lo, hi): (f64, f64), closed: bool| -> f64 {
            bins()
                .filter(|&(f, _)| f >= lo && (f < hi || (closed && f <= hi)))
                .map(|(_, p)| p)
                .sum()
        };

        let total_power: f64 = spectrum.iter().sum();
        let dominant = bins()
            .fold((0.0, 0.0), |best, (f, p)| if p > best.1 { (f, p) } else { best });
        let spectral_centroid = if total_power > 0.0 {
            bins().map(|(f, p)| f * p).sum::<f64>() / total_power
        } else {
            f64::NAN
        };

        SpectralFeatures {
            power_low: band(self.bands.low, false),
            power_medium: band(self.bands.medium, false),
            power_high: band(self.bands.high, true),
            dominant_frequency: dominant.0,
            spectral_centroid,
            total_power,
        }
    }
}

impl Default for FftAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_sine_wave() {
        let mut analyzer = FftAnalyzer::new();

        // 0.1 cycles per sample
        let signal: Vec<f64> = (0..500)
            .map(|i| (2.0 * PI * 0.1 * i as f64).sin())
            .collect();

        let features = analyzer.analyze(&signal);

        assert!((features.dominant_frequency - 0.1).abs() < 0.01);
        assert!(features.power_medium > features.power_low);
        assert!(features.power_medium > features.power_high);
    }

    #[test]
    fn test_constant_signal_has_no_power() {
        let mut analyzer = FftAnalyzer::new();
        let features = analyzer.analyze(&[3.0; 64]);
        assert!(features.total_power < 1e-20);
    }

    #[test]
    fn test_centroid_follows_frequency() {
        let mut analyzer = FftAnalyzer::new();
        let tone = |f: f64| -> Vec<f64> {
            (0..256).map(|i| (2.0 * PI * f * i as f64).sin()).collect()
        };

        let slow = analyzer.analyze(&tone(0.02)).spectral_centroid;
        let fast = analyzer.analyze(&tone(0.3)).spectral_centroid;
        assert!(slow < fast);
        assert!(analyzer.analyze(&[1.0]).spectral_centroid.is_nan());
    }

    #[test]
    fn test_empty_signal() {
        let mut analyzer = FftAnalyzer::new();
        let features = analyzer.analyze(&[]);
        assert_eq!(features.total_power, 0.0);
    }
}
