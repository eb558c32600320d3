//! Prometheus-målinger for tick-løkken og eksport av records.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub struct Telemetry {
    pub registry: Registry,
    pub ticks_total: IntCounterVec,
    pub window_samples: IntGauge,
    pub valleys: IntGauge,
    pub records_total: IntCounterVec,
}

impl Telemetry {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let ticks_total = IntCounterVec::new(
            Opts::new("heartlens_ticks_total", "Ticks by outcome"),
            &["outcome"],
        )?;
        let window_samples = IntGauge::new("heartlens_window_samples", "Samples in the rolling window")?;
        let valleys = IntGauge::new("heartlens_valleys", "Valleys detected in the current window")?;
        let records_total = IntCounterVec::new(
            Opts::new("heartlens_records_total", "Derived records by result"),
            &["result"],
        )?;

        registry.register(Box::new(ticks_total.clone()))?;
        registry.register(Box::new(window_samples.clone()))?;
        registry.register(Box::new(valleys.clone()))?;
        registry.register(Box::new(records_total.clone()))?;

        Ok(Self { registry, ticks_total, window_samples, valleys, records_total })
    }
}

/// Felles instans. Navnene er faste, så opprettelsen kan bare feile ved programmeringsfeil.
pub static TELEMETRY: Lazy<Telemetry> =
    Lazy::new(|| Telemetry::new().expect("heartlens telemetry metrics must be valid"));

pub fn tick(outcome: &str) {
    TELEMETRY.ticks_total.with_label_values(&[outcome]).inc();
}

pub fn window(samples: usize, valleys: usize) {
    TELEMETRY.window_samples.set(samples as i64);
    TELEMETRY.valleys.set(valleys as i64);
}

pub fn record(result: &str) {
    TELEMETRY.records_total.with_label_values(&[result]).inc();
}

pub fn tick_count(outcome: &str) -> u64 {
    TELEMETRY.ticks_total.with_label_values(&[outcome]).get()
}

/// Tekstformat for /metrics
pub fn render() -> String {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&TELEMETRY.registry.gather(), &mut buf) {
        log::warn!("kunne ikke serialisere metrics: {e}");
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
