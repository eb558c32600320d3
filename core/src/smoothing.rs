/// Sentrert glidende snitt. Vinduet tvinges til oddetall slik at
/// midtpunktet er veldefinert; endene bruker et kortere vindu for å holde lengden.
pub fn smooth_series(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.len() < 3 {
        return values.to_vec();
    }

    let w = if window % 2 == 0 { window + 1 } else { window };
    let k = w / 2;
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let a = i.saturating_sub(k);
        let b = (i + k + 1).min(values.len());
        let slice = &values[a..b];
        out.push(slice.iter().sum::<f64>() / slice.len() as f64);
    }

    out
}

#[inline]
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().copied().sum::<f64>() / xs.len() as f64
    }
}

/// Trekk fra snittet (DC) – demper baseline-drift fra omgivelseslys.
pub fn detrend_mean(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    values.iter().map(|v| v - m).collect()
}

/// Populasjons-σ, brukt som skala for dalterskelen.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
