// core/src/buffer.rs
use std::collections::VecDeque;

use crate::error::CoreError;
use crate::smoothing::{detrend_mean, smooth_series};
use crate::types::Sample;

/// Tidsavgrenset rullende vindu av samples.
///
/// Invariant: `newest.timestamp - s.timestamp <= window_secs` for alle beholdte samples,
/// og tidsstemplene er ikke-synkende. Gamle samples kastes, de endres aldri.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBuffer {
    window_secs: f64,
    samples: VecDeque<Sample>,
}

impl SignalBuffer {
    pub fn new(window_secs: f64) -> Self {
        Self {
            window_secs,
            samples: VecDeque::new(),
        }
    }

    pub fn window_secs(&self) -> f64 {
        self.window_secs
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Tidsspenn fra eldste til nyeste sample (sek)
    pub fn span_secs(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(a), Some(b)) => b.timestamp - a.timestamp,
            _ => 0.0,
        }
    }

    /// Legg til et sample og kast alt eldre enn `newest - W`.
    /// Ikke-finitte verdier og tid som går bakover avvises uten endring.
    pub fn append(&mut self, sample: Sample) -> Result<(), CoreError> {
        if !sample.timestamp.is_finite() || !sample.value.is_finite() {
            return Err(CoreError::invalid_sample("ikke-finitt tid eller verdi"));
        }
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                return Err(CoreError::invalid_sample(format!(
                    "tid går bakover ({} < {})",
                    sample.timestamp, last.timestamp
                )));
            }
        }

        self.samples.push_back(sample);

        let cutoff = sample.timestamp - self.window_secs;
        while let Some(front) = self.samples.front() {
            if front.timestamp < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Rå samples i tidsrekkefølge.
    pub fn raw(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn raw_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Analyseklart snapshot: valgfri DC-detrending, deretter glidende snitt.
    /// Tidsstemplene beholdes uendret.
    pub fn snapshot(&self, smoothing_window: usize, detrend: bool) -> Vec<Sample> {
        let raw = self.raw_values();
        let base = if detrend { detrend_mean(&raw) } else { raw };
        let smoothed = smooth_series(&base, smoothing_window);

        self.samples
            .iter()
            .zip(smoothed)
            .map(|(s, v)| Sample::new(s.timestamp, v))
            .collect()
    }

    /// Tøm vinduet (ved start av ny økt)
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}
