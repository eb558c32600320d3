use serde::{Deserialize, Serialize};
use std::fmt;

/// Én pulsverdi per prosessert frame. Endres aldri etter at den er laget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: f64, // sek, monoton
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Dalpunkt (syklusgrense) i gjeldende vindu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valley {
    pub timestamp: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartRateEstimate {
    pub bpm: f64,
    pub confidence: f64,
}

impl HeartRateEstimate {
    pub const NONE: HeartRateEstimate = HeartRateEstimate { bpm: 0.0, confidence: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HrvEstimate {
    #[serde(alias = "sdnn")]
    pub sdnn_ms: f64,
    pub confidence: f64,
}

impl HrvEstimate {
    pub const NONE: HrvEstimate = HrvEstimate { sdnn_ms: 0.0, confidence: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    #[default]
    Poor,
    Fair,
    Good,
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityLabel::Poor => "poor",
            QualityLabel::Fair => "fair",
            QualityLabel::Good => "good",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityEstimate {
    pub label: QualityLabel,
    pub confidence: f64,
}

impl QualityEstimate {
    pub const NONE: QualityEstimate = QualityEstimate { label: QualityLabel::Poor, confidence: 0.0 };
}

/// Verdi for et metrikk-kort. Hver variant har kjent form,
/// så confidence følger alltid med estimatet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MetricValue {
    HeartRate(HeartRateEstimate),
    Hrv(HrvEstimate),
    Quality(QualityEstimate),
    Plain { value: f64, unit: Option<&'static str> },
}

impl MetricValue {
    pub fn confidence(&self) -> Option<f64> {
        match self {
            MetricValue::HeartRate(h) => Some(h.confidence),
            MetricValue::Hrv(h) => Some(h.confidence),
            MetricValue::Quality(q) => Some(q.confidence),
            MetricValue::Plain { .. } => None,
        }
    }
}

impl fmt::Display for MetricValue {
    /// "--" når estimatet mangler (0 eller ikke-finitt). Respekterer bredde/justering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MetricValue::HeartRate(h) if h.bpm.is_finite() && h.bpm > 0.0 => {
                format!("{:.0} BPM", h.bpm)
            }
            MetricValue::Hrv(h) if h.sdnn_ms.is_finite() && h.sdnn_ms > 0.0 => {
                format!("{:.1} ms", h.sdnn_ms)
            }
            MetricValue::Quality(q) => q.label.to_string(),
            MetricValue::Plain { value, unit } if value.is_finite() => match unit {
                Some(u) => format!("{value:.1} {u}"),
                None => format!("{value:.1}"),
            },
            _ => "--".to_string(),
        };
        f.pad(&text)
    }
}
