use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Kanal-kombinasjon: hvordan R/G/B reduseres til én skalar per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelMode {
    /// 2R − G − B
    #[default]
    Default,
    RedOnly,
    GreenOnly,
    BlueOnly,
    /// R − B
    RedMinusBlue,
    /// 3R − G − B
    Custom,
}

impl ChannelMode {
    pub const ALL: [ChannelMode; 6] = [
        ChannelMode::Default,
        ChannelMode::RedOnly,
        ChannelMode::GreenOnly,
        ChannelMode::BlueOnly,
        ChannelMode::RedMinusBlue,
        ChannelMode::Custom,
    ];

    /// Nøkkel slik den brukes av konfig/klient ("redOnly" osv.)
    pub fn key(self) -> &'static str {
        match self {
            ChannelMode::Default => "default",
            ChannelMode::RedOnly => "redOnly",
            ChannelMode::GreenOnly => "greenOnly",
            ChannelMode::BlueOnly => "blueOnly",
            ChannelMode::RedMinusBlue => "redMinusBlue",
            ChannelMode::Custom => "custom",
        }
    }

    /// Visningsnavn for velgeren
    pub fn label(self) -> &'static str {
        match self {
            ChannelMode::Default => "Default (2R - G - B)",
            ChannelMode::RedOnly => "Red Only",
            ChannelMode::GreenOnly => "Green Only",
            ChannelMode::BlueOnly => "Blue Only",
            ChannelMode::RedMinusBlue => "Red - Blue",
            ChannelMode::Custom => "Custom (3R - G - B)",
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChannelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelMode::ALL
            .iter()
            .copied()
            .find(|m| m.key() == s)
            .ok_or_else(|| CoreError::InvalidConfig(format!("ukjent kanalmodus: {s}")))
    }
}

/// Snittintensitet for én frame (typisk 0–255 per kanal).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// Én frame fra kameraet: monoton tid (sek) + snittfarger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub t: f64, // sek, monoton
    pub rgb: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityConfig {
    pub band_low_hz: f64,   // nedre pulsbånd (Hz)
    pub band_high_hz: f64,  // øvre pulsbånd (Hz)
    pub good_threshold: f64,
    pub fair_threshold: f64,
    pub min_samples: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            band_low_hz: 0.6,
            band_high_hz: 3.0,
            good_threshold: 0.6,
            fair_threshold: 0.35,
            min_samples: 32,
        }
    }
}

/// Prosesseringsparametre. Endres kun mens økten er idle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingConfig {
    pub mode: ChannelMode,
    /// Vinduslengde W (sek)
    pub window_secs: f64,
    /// Sentrert glidende snitt (antall samples, 0/1 = av)
    pub smoothing_window: usize,
    /// Trekk fra vindussnittet (DC) før dalsøk
    pub detrend: bool,
    /// Radius (samples) for lokalt minimum
    pub valley_radius: usize,
    /// Dal må ligge på/under snitt − k·σ i detrendet vindu
    pub valley_depth_k: f64,
    /// Høyeste fysiologiske puls; gir refraktærtiden mellom daler
    pub max_bpm: f64,
    pub plausible_bpm_min: f64,
    pub plausible_bpm_max: f64,
    /// Antall intervaller som gir full HRV-confidence
    pub hrv_target_intervals: usize,
    pub quality: QualityConfig,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            mode: ChannelMode::Default,
            window_secs: 10.0,
            smoothing_window: 5,
            detrend: true,
            valley_radius: 3,
            valley_depth_k: 0.0,
            max_bpm: 180.0,
            plausible_bpm_min: 35.0,
            plausible_bpm_max: 220.0,
            hrv_target_intervals: 10,
            quality: QualityConfig::default(),
        }
    }
}

impl ProcessingConfig {
    pub fn with_mode(mode: ChannelMode) -> Self {
        Self { mode, ..Self::default() }
    }

    /// Minste tid mellom to aksepterte daler (ms). 180 bpm ⇒ 333.3 ms.
    pub fn refractory_ms(&self) -> f64 {
        60_000.0 / self.max_bpm
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let bad = |msg: &str| Err(CoreError::InvalidConfig(msg.to_string()));

        if !(self.window_secs.is_finite() && self.window_secs > 0.0) {
            return bad("windowSecs må være > 0");
        }
        if !(self.max_bpm.is_finite() && self.max_bpm > 0.0) {
            return bad("maxBpm må være > 0");
        }
        if !(self.plausible_bpm_min >= 0.0 && self.plausible_bpm_min < self.plausible_bpm_max) {
            return bad("plausibelt bpm-bånd er ugyldig");
        }
        if !self.valley_depth_k.is_finite() || self.valley_depth_k < 0.0 {
            return bad("valleyDepthK må være >= 0");
        }
        if self.valley_radius == 0 {
            return bad("valleyRadius må være >= 1");
        }
        if self.hrv_target_intervals == 0 {
            return bad("hrvTargetIntervals må være >= 1");
        }
        let q = &self.quality;
        if !(q.band_low_hz > 0.0 && q.band_low_hz < q.band_high_hz) {
            return bad("kvalitetsbåndet er ugyldig");
        }
        if !(0.0 <= q.fair_threshold && q.fair_threshold <= q.good_threshold && q.good_threshold <= 1.0) {
            return bad("kvalitetsterskler må oppfylle 0 <= fair <= good <= 1");
        }
        Ok(())
    }
}
