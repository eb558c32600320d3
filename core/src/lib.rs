//! HeartLens-kjernen: rPPG fra snittfarger per frame til puls, HRV og signalkvalitet.
//!
//! Flyt per tick: `channel` → `buffer` → `valleys` → `metrics` (puls/HRV),
//! og `quality` uavhengig av dalsøket. `session` eier bufferen og kjører ticks,
//! `scheduler` driver dem med stopp-flagg.

pub mod analyzer;
pub mod buffer;
pub mod channel;
pub mod cli;
pub mod error;
pub mod metrics;
pub mod models;
pub mod quality;
pub mod record;
pub mod scheduler;
pub mod session;
pub mod smoothing;
pub mod storage;
pub mod store_api;
pub mod telemetry;
pub mod types;
pub mod valleys;

#[cfg(feature = "python")]
mod py;

pub use analyzer::{analyze_buffer, analyze_samples, analyze_window_json, WindowAnalysis};
pub use buffer::SignalBuffer;
pub use error::{CoreError, CoreResult};
pub use models::{ChannelMode, Frame, ProcessingConfig, QualityConfig, Rgb};
pub use record::{DerivedRecord, HistoricalSummary, InMemoryRecordStore, RecordStore};
pub use scheduler::{RunStats, TickScheduler};
pub use session::{FrameSource, Session, SessionState, StopHandle, TickOutcome};
pub use storage::{load_config, save_config};
pub use store_api::HttpRecordStore;
pub use types::{
    HeartRateEstimate, HrvEstimate, MetricValue, QualityEstimate, QualityLabel, Sample, Valley,
};
