// core/src/session.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::analyzer::{analyze_buffer, WindowAnalysis};
use crate::buffer::SignalBuffer;
use crate::channel::extract;
use crate::error::CoreError;
use crate::models::{Frame, ProcessingConfig};
use crate::record::DerivedRecord;
use crate::telemetry;
use crate::types::Sample;

/// Kilde for frames (kamera e.l.). `None` betyr "ingen frame denne ticken".
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

impl<F: FnMut() -> Option<Frame>> FrameSource for F {
    fn next_frame(&mut self) -> Option<Frame> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Økten er idle (eller stoppet før ticken) – ingen arbeid
    Idle,
    /// Kilden hadde ingen frame
    NoFrame,
    /// Ugyldig frame/sample – ticken hoppes over, løkken fortsetter
    Skipped(String),
    Processed,
}

impl TickOutcome {
    fn label(&self) -> &'static str {
        match self {
            TickOutcome::Idle => "idle",
            TickOutcome::NoFrame => "no_frame",
            TickOutcome::Skipped(_) => "skipped",
            TickOutcome::Processed => "processed",
        }
    }
}

/// Delbart stopp-flagg. Sjekkes før neste tick planlegges.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Økt: Idle ⇄ Recording, med én tick per frame.
///
/// Bufferen er eneste tilstand som bæres mellom ticks; alle estimater regnes
/// på nytt fra den. Etter `stop()` står siste analyse frosset til neste `start()`.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    config: ProcessingConfig,
    buffer: SignalBuffer,
    latest: Option<WindowAnalysis>,
    stop: StopHandle,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ProcessingConfig::default())
    }
}

impl Session {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            state: SessionState::Idle,
            buffer: SignalBuffer::new(config.window_secs),
            config,
            latest: None,
            stop: StopHandle::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn buffer(&self) -> &SignalBuffer {
        &self.buffer
    }

    /// Siste beregnede analyse (frosset etter stop)
    pub fn latest(&self) -> Option<&WindowAnalysis> {
        self.latest.as_ref()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Bytt konfig. Kun lov mens idle; ellers avvist uten endring.
    pub fn set_config(&mut self, config: ProcessingConfig) -> Result<(), CoreError> {
        if self.is_recording() {
            log::warn!("avviser konfigendring under opptak");
            return Err(CoreError::ConfigWhileRecording);
        }
        config.validate()?;
        self.config = config;
        self.buffer = SignalBuffer::new(config.window_secs);
        log::info!("konfig oppdatert: mode={}, window={}s", config.mode, config.window_secs);
        Ok(())
    }

    /// Idle → Recording. Nullstiller bufferen. No-op hvis allerede i opptak.
    pub fn start(&mut self) {
        if self.is_recording() {
            return;
        }
        self.buffer.reset();
        self.latest = None;
        self.stop.clear();
        self.state = SessionState::Recording;
        log::info!("opptak startet (mode={})", self.config.mode);
    }

    /// Recording → Idle. Siste analyse beholdes. No-op hvis allerede idle.
    pub fn stop(&mut self) {
        self.stop.request_stop();
        if !self.is_recording() {
            return;
        }
        self.state = SessionState::Idle;
        log::info!("opptak stoppet etter {} samples", self.buffer.len());
    }

    /// Én tick: hent frame → sample → buffer → full reanalyse.
    pub fn tick<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> TickOutcome {
        if self.is_recording() && self.stop.is_stop_requested() {
            self.stop();
        }
        let outcome = self.tick_inner(source);
        telemetry::tick(outcome.label());
        outcome
    }

    fn tick_inner<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> TickOutcome {
        if !self.is_recording() {
            return TickOutcome::Idle;
        }
        let Some(frame) = source.next_frame() else {
            return TickOutcome::NoFrame;
        };

        match self.ingest(frame) {
            Ok(()) => {
                let analysis = analyze_buffer(&self.buffer, &self.config);
                telemetry::window(analysis.sample_count, analysis.valleys.len());
                log::debug!(
                    "tick t={:.3}: bpm={:.1} ({:.2}), sdnn={:.1} ({:.2}), kvalitet={}",
                    frame.t,
                    analysis.heart_rate.bpm,
                    analysis.heart_rate.confidence,
                    analysis.hrv.sdnn_ms,
                    analysis.hrv.confidence,
                    analysis.quality.label
                );
                self.latest = Some(analysis);
                TickOutcome::Processed
            }
            Err(e) => {
                log::warn!("tick hoppet over: {e}");
                TickOutcome::Skipped(e.to_string())
            }
        }
    }

    fn ingest(&mut self, frame: Frame) -> Result<(), CoreError> {
        let value = extract(frame.rgb, self.config.mode)?;
        self.buffer.append(Sample::new(frame.t, value))
    }

    /// Materialiser record for eksport (gjeldende tick).
    pub fn record(&self, subject_id: &str, now: DateTime<Utc>) -> Result<DerivedRecord, CoreError> {
        let analysis = self.latest.clone().unwrap_or_default();
        let res = DerivedRecord::build(subject_id, &analysis, self.buffer.raw(), now);
        telemetry::record(if res.is_ok() { "ok" } else { "rejected" });
        res
    }
}
