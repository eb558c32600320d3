//! Signalkvalitet uavhengig av dalsøket.
//!
//! Metrikken er andelen spektralenergi i pulsbåndet (≈0.6–3 Hz) av all energi
//! over DC, regnet på det rå vinduet. Dalsøk og kvalitet kan dermed være uenige:
//! støy kan gi daler, men kvaliteten flagger det som `poor`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

use crate::models::QualityConfig;
use crate::smoothing::mean;
use crate::types::{QualityEstimate, QualityLabel, Sample};

/// Estimert samplingsrate (Hz) fra tidsstemplene.
pub fn estimate_sample_rate(samples: &[Sample]) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let span = samples[n - 1].timestamp - samples[0].timestamp;
    if !(span.is_finite() && span > 0.0) {
        return None;
    }
    Some((n - 1) as f64 / span)
}

/// Andel energi i [low, high] Hz av all energi over DC, i [0, 1].
/// `None` når vinduet er for kort eller uten energi.
pub fn band_energy_ratio(samples: &[Sample], low_hz: f64, high_hz: f64) -> Option<f64> {
    let n = samples.len();
    let fs = estimate_sample_rate(samples)?;

    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let m = mean(&values);

    // Hamming-vindu på snittfjernet signal
    let mut buffer: Vec<Complex<f64>> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let w = 0.54 - 0.46 * (2.0 * PI * i as f64 / (n - 1) as f64).cos();
            Complex::new((v - m) * w, 0.0)
        })
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let bin_hz = fs / n as f64;
    let mut total = 0.0;
    let mut in_band = 0.0;
    for (k, c) in buffer.iter().enumerate().take(n / 2 + 1).skip(1) {
        let p = c.norm_sqr();
        let f = k as f64 * bin_hz;
        total += p;
        if f >= low_hz && f <= high_hz {
            in_band += p;
        }
    }

    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    Some((in_band / total).clamp(0.0, 1.0))
}

/// Terskler → etikett.
pub fn label_for(metric: f64, cfg: &QualityConfig) -> QualityLabel {
    if metric >= cfg.good_threshold {
        QualityLabel::Good
    } else if metric >= cfg.fair_threshold {
        QualityLabel::Fair
    } else {
        QualityLabel::Poor
    }
}

/// Kvalitet for rått (ikke-detrendet) vindu. Metrikken rapporteres som confidence.
pub fn score_quality(raw: &[Sample], cfg: &QualityConfig) -> QualityEstimate {
    if raw.len() < cfg.min_samples.max(2) {
        return QualityEstimate::NONE;
    }
    match band_energy_ratio(raw, cfg.band_low_hz, cfg.band_high_hz) {
        Some(metric) => QualityEstimate {
            label: label_for(metric, cfg),
            confidence: metric,
        },
        None => QualityEstimate::NONE,
    }
}
