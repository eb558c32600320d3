// core/src/record.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analyzer::WindowAnalysis;
use crate::error::CoreError;
use crate::types::{HeartRateEstimate, HrvEstimate, Sample};

/// Plassholder klienten bruker når ingen bruker er bekreftet.
pub const UNKNOWN_SUBJECT: &str = "unknown";

/// Record slik den sendes til lagrings-API-et (uendret form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRecord {
    pub subject_id: String,
    pub heart_rate: HeartRateEstimate,
    pub hrv: HrvEstimate,
    #[serde(default)]
    pub ppg_data: Vec<Sample>,
    pub timestamp: DateTime<Utc>,
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Gyldig subjectId: ikke tom og ikke plassholderen.
pub fn validate_subject(subject_id: &str) -> Result<&str, CoreError> {
    let s = subject_id.trim();
    if s.is_empty() || s == UNKNOWN_SUBJECT {
        return Err(CoreError::MissingSubject);
    }
    Ok(s)
}

impl DerivedRecord {
    /// Bygg record fra gjeldende analyse og vindu.
    /// Avviser manglende subject og tomt vindu; ikke-finitte tall lagres som 0.
    pub fn build(
        subject_id: &str,
        analysis: &WindowAnalysis,
        ppg_data: Vec<Sample>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let subject = validate_subject(subject_id)?;
        if ppg_data.is_empty() {
            return Err(CoreError::EmptyRecord);
        }

        Ok(Self {
            subject_id: subject.to_string(),
            heart_rate: HeartRateEstimate {
                bpm: finite_or_zero(analysis.heart_rate.bpm),
                confidence: finite_or_zero(analysis.heart_rate.confidence),
            },
            hrv: HrvEstimate {
                sdnn_ms: finite_or_zero(analysis.hrv.sdnn_ms),
                confidence: finite_or_zero(analysis.hrv.confidence),
            },
            ppg_data,
            timestamp,
        })
    }
}

/* -------------------------------------------------------------------------
   Svarformer fra lagrings-API-et
   ------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    /// Lagret dokument (kan ha ekstra felt som `_id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub success: bool,
    /// null/mangler ⇒ 0 hos klienten
    #[serde(default, rename = "avgHeartRate")]
    pub avg_heart_rate: Option<f64>,
    #[serde(default, rename = "avgHRV")]
    pub avg_hrv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastAccessResponse {
    pub success: bool,
    #[serde(default, rename = "lastAccess", skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snitt over lagrede records for et subject (0 når ingen finnes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAverages {
    pub avg_heart_rate: f64,
    pub avg_hrv: f64,
}

/// Kontrakten mot ekstern lagring.
pub trait RecordStore {
    fn create(&mut self, record: &DerivedRecord) -> Result<DerivedRecord, CoreError>;
    fn aggregate_by_subject(&self, subject_id: &str) -> Result<SubjectAverages, CoreError>;
    /// `None` når subject ikke har noen records
    fn last_access(&self, subject_id: &str) -> Result<Option<DateTime<Utc>>, CoreError>;
}

/// Referanseimplementasjon i minnet (tester, offline-modus).
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Vec<DerivedRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&mut self, record: &DerivedRecord) -> Result<DerivedRecord, CoreError> {
        validate_subject(&record.subject_id)?;
        self.records.push(record.clone());
        log::info!("record lagret for {} ({} totalt)", record.subject_id, self.records.len());
        Ok(record.clone())
    }

    fn aggregate_by_subject(&self, subject_id: &str) -> Result<SubjectAverages, CoreError> {
        let subject = validate_subject(subject_id)?;
        let mine: Vec<&DerivedRecord> = self.records.iter().filter(|r| r.subject_id == subject).collect();
        if mine.is_empty() {
            return Ok(SubjectAverages::default());
        }
        let n = mine.len() as f64;
        Ok(SubjectAverages {
            avg_heart_rate: mine.iter().map(|r| r.heart_rate.bpm).sum::<f64>() / n,
            avg_hrv: mine.iter().map(|r| r.hrv.sdnn_ms).sum::<f64>() / n,
        })
    }

    fn last_access(&self, subject_id: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
        let subject = validate_subject(subject_id)?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.subject_id == subject)
            .map(|r| r.timestamp)
            .max())
    }
}

/// Historikk for et subject: snitt + siste lagring.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSummary {
    pub avg_heart_rate: f64,
    pub avg_hrv: f64,
    pub last_access: Option<DateTime<Utc>>,
}

pub fn historical_summary<S: RecordStore + ?Sized>(
    store: &S,
    subject_id: &str,
) -> Result<HistoricalSummary, CoreError> {
    let avg = store.aggregate_by_subject(subject_id)?;
    let last_access = store.last_access(subject_id)?;
    Ok(HistoricalSummary {
        avg_heart_rate: avg.avg_heart_rate,
        avg_hrv: avg.avg_hrv,
        last_access,
    })
}
