// core/src/store_api.rs
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::Agent;

use crate::error::CoreError;
use crate::record::{
    validate_subject, AggregateResponse, CreateResponse, DerivedRecord, LastAccessResponse,
    RecordStore, SubjectAverages,
};
use crate::types::{HeartRateEstimate, Sample};

const RECORD_PATH: &str = "/api/handle-record";
const LAST_ACCESS_PATH: &str = "/api/last-access";
const NO_RECORDS: &str = "No records found";

/* -------------------------------------------------------------------------
   Wire-format: API-skjemaet lagrer HRV som `hrv.sdnn`, ikke `sdnnMs`
   ------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
struct WireHrv {
    sdnn: f64,
    confidence: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord<'a> {
    subject_id: &'a str,
    heart_rate: HeartRateEstimate,
    hrv: WireHrv,
    ppg_data: &'a [Sample],
    timestamp: DateTime<Utc>,
}

impl<'a> From<&'a DerivedRecord> for WireRecord<'a> {
    fn from(r: &'a DerivedRecord) -> Self {
        Self {
            subject_id: &r.subject_id,
            heart_rate: r.heart_rate,
            hrv: WireHrv { sdnn: r.hrv.sdnn_ms, confidence: r.hrv.confidence },
            ppg_data: &r.ppg_data,
            timestamp: r.timestamp,
        }
    }
}

/// Lagrings-API over HTTP – enkel blocking-versjon (ureq)
pub struct HttpRecordStore {
    agent: Agent,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(10))
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// API-et svarer med JSON også ved 4xx/5xx, så begge grener leses som body.
fn read_body<T: DeserializeOwned>(res: Result<ureq::Response, ureq::Error>) -> Result<T, CoreError> {
    let resp = match res {
        Ok(r) => r,
        Err(ureq::Error::Status(code, r)) => {
            log::warn!("[store] HTTP {code} fra {}", r.get_url());
            r
        }
        Err(e) => return Err(CoreError::Store(e.to_string())),
    };
    resp.into_json::<T>()
        .map_err(|e| CoreError::Store(format!("ugyldig svar: {e}")))
}

fn api_error(error: Option<String>) -> CoreError {
    CoreError::Store(error.unwrap_or_else(|| "ukjent feil".to_string()))
}

impl RecordStore for HttpRecordStore {
    fn create(&mut self, record: &DerivedRecord) -> Result<DerivedRecord, CoreError> {
        validate_subject(&record.subject_id)?;
        let res = self.agent.post(&self.url(RECORD_PATH)).send_json(WireRecord::from(record));
        let body: CreateResponse = read_body(res)?;

        if !body.success {
            return Err(api_error(body.error));
        }
        log::info!("[store] record lagret for {}", record.subject_id);
        let stored = body
            .data
            .and_then(|v| serde_json::from_value::<DerivedRecord>(v).ok())
            .unwrap_or_else(|| record.clone());
        Ok(stored)
    }

    fn aggregate_by_subject(&self, subject_id: &str) -> Result<SubjectAverages, CoreError> {
        let subject = validate_subject(subject_id)?;
        let res = self
            .agent
            .get(&self.url(RECORD_PATH))
            .query("subjectId", subject)
            .call();
        let body: AggregateResponse = read_body(res)?;

        if !body.success {
            return Err(api_error(body.error));
        }
        Ok(SubjectAverages {
            avg_heart_rate: body.avg_heart_rate.unwrap_or(0.0),
            avg_hrv: body.avg_hrv.unwrap_or(0.0),
        })
    }

    fn last_access(&self, subject_id: &str) -> Result<Option<DateTime<Utc>>, CoreError> {
        let subject = validate_subject(subject_id)?;
        let res = self
            .agent
            .get(&self.url(LAST_ACCESS_PATH))
            .query("subjectId", subject)
            .call();
        let body: LastAccessResponse = read_body(res)?;

        if body.success {
            return Ok(body.last_access);
        }
        // "No records found" er ikke en feil for kjernen
        match body.error.as_deref() {
            Some(NO_RECORDS) => {
                log::debug!("[store] ingen records for {subject}");
                Ok(None)
            }
            _ => Err(api_error(body.error)),
        }
    }
}
