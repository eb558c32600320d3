use crate::smoothing::mean;
use crate::types::{HeartRateEstimate, HrvEstimate, Valley};

/// Antall intervaller som trengs før puls-confidence kan nå 1.0.
/// Ett enkelt intervall har ingen spredning å måle, så det gir maks 0.5.
const RATE_FULL_CONFIDENCE_INTERVALS: f64 = 2.0;

/// Tidsavstand (ms) mellom påfølgende daler.
pub fn intervals_ms(valleys: &[Valley]) -> Vec<f64> {
    valleys
        .windows(2)
        .map(|w| (w[1].timestamp - w[0].timestamp) * 1000.0)
        .collect()
}

/// Utvalgs-standardavvik (deler på N−1). 0.0 for færre enn 2 verdier.
pub fn sample_std(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Variasjonskoeffisient σ/μ (utvalgs-σ). 0.0 når μ <= 0.
pub fn coefficient_of_variation(xs: &[f64]) -> f64 {
    let m = mean(xs);
    if m <= 0.0 {
        return 0.0;
    }
    sample_std(xs) / m
}

/// Puls fra intervallsettet.
///
/// * ingen intervaller ⇒ 0 bpm, confidence 0 (forventet lavsignal-tilstand)
/// * bpm = 60000 / snitt(ms), confidence = clamp(1 − cv, 0, 1)
/// * utenfor plausibelt bånd ⇒ forkastes som artefakt
pub fn estimate_heart_rate(intervals: &[f64], plausible_min: f64, plausible_max: f64) -> HeartRateEstimate {
    if intervals.is_empty() {
        return HeartRateEstimate::NONE;
    }
    let m = mean(intervals);
    if !(m.is_finite() && m > 0.0) {
        return HeartRateEstimate::NONE;
    }

    let bpm = 60_000.0 / m;
    if bpm < plausible_min || bpm > plausible_max {
        log::debug!("bpm {:.1} utenfor [{}, {}] – forkastet", bpm, plausible_min, plausible_max);
        return HeartRateEstimate::NONE;
    }

    let cv = coefficient_of_variation(intervals);
    let count_factor = (intervals.len() as f64 / RATE_FULL_CONFIDENCE_INTERVALS).min(1.0);
    let confidence = ((1.0 - cv) * count_factor).clamp(0.0, 1.0);

    HeartRateEstimate { bpm, confidence }
}

/// SDNN (utvalgs-σ av intervallene, ms).
///
/// Krever minst 2 intervaller (≥ 3 daler); ellers 0 med confidence 0.
/// Confidence = clamp(antall / target, 0, 1).
pub fn estimate_hrv(intervals: &[f64], target_intervals: usize) -> HrvEstimate {
    if intervals.len() < 2 {
        return HrvEstimate::NONE;
    }
    let sdnn_ms = sample_std(intervals);
    if !sdnn_ms.is_finite() {
        return HrvEstimate::NONE;
    }
    let target = target_intervals.max(1) as f64;
    let confidence = (intervals.len() as f64 / target).clamp(0.0, 1.0);

    HrvEstimate { sdnn_ms, confidence }
}
