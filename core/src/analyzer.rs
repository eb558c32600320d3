use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::buffer::SignalBuffer;
use crate::error::CoreError;
use crate::metrics::{estimate_heart_rate, estimate_hrv, intervals_ms};
use crate::models::ProcessingConfig;
use crate::quality::score_quality;
use crate::types::{HeartRateEstimate, HrvEstimate, QualityEstimate, Sample, Valley};
use crate::valleys::{detect_valleys, ValleyParams};

/// Alt som avledes fra vinduet i én tick. Regnes helt på nytt hver gang.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAnalysis {
    pub valleys: Vec<Valley>,
    pub intervals_ms: Vec<f64>,
    pub heart_rate: HeartRateEstimate,
    pub hrv: HrvEstimate,
    pub quality: QualityEstimate,
    pub sample_count: usize,
    pub span_secs: f64,
}

/// Ren funksjon av bufferens tilstand: snapshot → daler → intervaller → estimater.
/// Kvaliteten regnes på det rå vinduet, uavhengig av dalsøket.
pub fn analyze_buffer(buffer: &SignalBuffer, cfg: &ProcessingConfig) -> WindowAnalysis {
    let snapshot = buffer.snapshot(cfg.smoothing_window, cfg.detrend);
    let valleys = detect_valleys(&snapshot, &ValleyParams::from(cfg));
    let intervals = intervals_ms(&valleys);

    let heart_rate = estimate_heart_rate(&intervals, cfg.plausible_bpm_min, cfg.plausible_bpm_max);
    let hrv = estimate_hrv(&intervals, cfg.hrv_target_intervals);
    let quality = score_quality(&buffer.raw(), &cfg.quality);

    WindowAnalysis {
        valleys,
        intervals_ms: intervals,
        heart_rate,
        hrv,
        quality,
        sample_count: buffer.len(),
        span_secs: buffer.span_secs(),
    }
}

/// Analyser en ferdig sekvens av samples (samme vei som en tick).
/// Samples som bryter tidsrekkefølgen hoppes over.
pub fn analyze_samples(samples: &[Sample], cfg: &ProcessingConfig) -> WindowAnalysis {
    let mut buffer = SignalBuffer::new(cfg.window_secs);
    for s in samples {
        if let Err(e) = buffer.append(*s) {
            log::warn!("hopper over sample: {e}");
        }
    }
    analyze_buffer(&buffer, cfg)
}

/// JSON-inngang: `samples` er en liste `{timestamp, value}`, `cfg` valgfri ProcessingConfig.
/// Feil i input rapporteres med JSON-sti.
pub fn analyze_window_json(samples_json: &str, cfg_json: Option<&str>) -> Result<String, CoreError> {
    let mut de = serde_json::Deserializer::from_str(samples_json);
    let samples: Vec<Sample> = serde_path_to_error::deserialize(&mut de)?;

    let cfg: ProcessingConfig = match cfg_json {
        Some(txt) if !txt.trim().is_empty() => {
            let mut de = serde_json::Deserializer::from_str(txt);
            serde_path_to_error::deserialize(&mut de)?
        }
        _ => ProcessingConfig::default(),
    };
    cfg.validate()?;

    let analysis = analyze_samples(&samples, &cfg);
    let mut v: Value = serde_json::to_value(&analysis)?;
    if let Value::Object(ref mut obj) = v {
        obj.insert("mode".into(), Value::from(cfg.mode.key()));
        obj.insert("source".into(), Value::from("rust_core"));
    }
    Ok(serde_json::to_string(&v)?)
}
