// core/src/valleys.rs
use ordered_float::OrderedFloat;

use crate::models::ProcessingConfig;
use crate::smoothing::{mean, population_std};
use crate::types::{Sample, Valley};

/// Parametre for dalsøket (hentes fra ProcessingConfig).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValleyParams {
    /// Antall naboer på hver side som må ligge høyere
    pub radius: usize,
    /// Minste tid mellom aksepterte daler (ms)
    pub refractory_ms: f64,
    /// Dalen må ligge på/under snitt − k·σ
    pub depth_k: f64,
}

impl From<&ProcessingConfig> for ValleyParams {
    fn from(cfg: &ProcessingConfig) -> Self {
        Self {
            radius: cfg.valley_radius.max(1),
            refractory_ms: cfg.refractory_ms(),
            depth_k: cfg.valley_depth_k,
        }
    }
}

impl Default for ValleyParams {
    fn default() -> Self {
        ValleyParams::from(&ProcessingConfig::default())
    }
}

/// Relativ σ under denne regnes som flatt signal.
const FLAT_REL_EPS: f64 = 1e-9;

/// Er `i` et lokalt minimum innenfor radius?
/// `i` må være første forekomst av minsteverdien i `[i-r, i+r]`: strengt lavere enn
/// alt til venstre, lavere eller lik til høyre. Ved likhet vinner tidligste indeks.
fn is_local_min(values: &[f64], i: usize, radius: usize) -> bool {
    values[i - radius..=i + radius]
        .iter()
        .enumerate()
        .min_by_key(|(_, x)| OrderedFloat(**x))
        .map(|(j, _)| j + i - radius)
        == Some(i)
}

/// Tidspunkt for dalbunnen med sub-sample presisjon: parabel gjennom `(i-1, i, i+1)`.
/// Forskyvningen holdes innenfor en halv sample mot nabopunktet.
fn refine_timestamp(snapshot: &[Sample], i: usize) -> f64 {
    let (a, b, c) = (snapshot[i - 1].value, snapshot[i].value, snapshot[i + 1].value);
    let t = snapshot[i].timestamp;
    let curvature = a - 2.0 * b + c;
    if !(curvature.is_finite() && curvature > 0.0) {
        return t;
    }
    let offset = (0.5 * (a - c) / curvature).clamp(-0.5, 0.5);
    if offset >= 0.0 {
        t + offset * (snapshot[i + 1].timestamp - t)
    } else {
        t + offset * (t - snapshot[i - 1].timestamp)
    }
}

/// Snitt samplingsperiode (ms), 0.0 uten spenn.
fn sample_period_ms(snapshot: &[Sample]) -> f64 {
    match (snapshot.first(), snapshot.last()) {
        (Some(a), Some(b)) if snapshot.len() > 1 => {
            (b.timestamp - a.timestamp) * 1000.0 / (snapshot.len() - 1) as f64
        }
        _ => 0.0,
    }
}

/// Finn daler (syklusgrenser) i et glattet/detrendet snapshot.
///
/// Én passering venstre→høyre. En kandidat aksepteres kun hvis den ligger minst
/// refraktærtiden etter forrige *aksepterte* dal, minus en halv samplingsperiode
/// (puls akkurat på maxBpm skal fortsatt telle). Dalens tidspunkt interpoleres
/// mellom samples. Beregnes helt på nytt hver tick.
pub fn detect_valleys(snapshot: &[Sample], params: &ValleyParams) -> Vec<Valley> {
    let n = snapshot.len();
    let r = params.radius.max(1);
    if n < 2 * r + 1 {
        return Vec::new();
    }

    let values: Vec<f64> = snapshot.iter().map(|s| s.value).collect();
    let m = mean(&values);
    let sd = population_std(&values);

    // Flatt signal ⇒ ingen daler
    if !sd.is_finite() || sd <= FLAT_REL_EPS * (1.0 + m.abs()) {
        return Vec::new();
    }
    let depth_limit = m - params.depth_k * sd;
    let min_gap_ms = params.refractory_ms - 0.5 * sample_period_ms(snapshot);

    let mut out: Vec<Valley> = Vec::new();
    for i in r..(n - r) {
        if values[i] > depth_limit || !is_local_min(&values, i, r) {
            continue;
        }

        let t = refine_timestamp(snapshot, i);
        if let Some(last) = out.last() {
            if (t - last.timestamp) * 1000.0 < min_gap_ms {
                continue;
            }
        }
        out.push(Valley { timestamp: t, index: i });
    }

    log::debug!("valleys: {} i vindu på {} samples", out.len(), n);
    out
}
