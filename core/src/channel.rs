use crate::error::CoreError;
use crate::models::{ChannelMode, Rgb};

/// Kombiner R/G/B til én pulsverdi etter valgt modus. Ren funksjon.
#[inline]
pub fn combine(rgb: Rgb, mode: ChannelMode) -> f64 {
    let Rgb { r, g, b } = rgb;
    match mode {
        ChannelMode::Default => 2.0 * r - g - b,
        ChannelMode::RedOnly => r,
        ChannelMode::GreenOnly => g,
        ChannelMode::BlueOnly => b,
        ChannelMode::RedMinusBlue => r - b,
        ChannelMode::Custom => 3.0 * r - g - b,
    }
}

/// Valider frame-intensiteter og trekk ut skalaren.
/// Negative eller ikke-finitte kanaler gir `InvalidFrame` (ticken hoppes over).
pub fn extract(rgb: Rgb, mode: ChannelMode) -> Result<f64, CoreError> {
    for (name, v) in [("r", rgb.r), ("g", rgb.g), ("b", rgb.b)] {
        if !v.is_finite() {
            return Err(CoreError::invalid_frame(format!("{name} er ikke finitt")));
        }
        if v < 0.0 {
            return Err(CoreError::invalid_frame(format!("{name} er negativ ({v})")));
        }
    }
    Ok(combine(rgb, mode))
}
