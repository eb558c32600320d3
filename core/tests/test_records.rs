use chrono::{TimeZone, Utc};
use heartlens_core::cli::{cards, format_report};
use heartlens_core::record::{historical_summary, AggregateResponse, CreateResponse, UNKNOWN_SUBJECT};
use heartlens_core::*;

fn recorded_session(ticks: usize) -> Session {
    let mut s = Session::default();
    s.start();
    let mut i = 0usize;
    let mut src = || {
        let t = i as f64 / 30.0;
        i += 1;
        let p = (2.0 * std::f64::consts::PI * 1.2 * t).sin();
        Some(Frame { t, rgb: Rgb::new(140.0 + 2.0 * p, 95.0, 80.0) })
    };
    for _ in 0..ticks {
        s.tick(&mut src);
    }
    s
}

#[test]
fn record_has_api_shape() {
    let s = recorded_session(300);
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let rec = s.record("user-42", ts).unwrap();

    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["subjectId"], "user-42");
    assert!(v["heartRate"]["bpm"].as_f64().unwrap() > 60.0);
    assert!(v["heartRate"]["confidence"].is_number());
    assert!(v["hrv"]["sdnnMs"].is_number());
    assert!(v["hrv"]["confidence"].is_number());
    assert_eq!(v["ppgData"].as_array().unwrap().len(), s.buffer().len());
    assert!(v["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:00:00"));
}

#[test]
fn record_guards() {
    let ts = Utc::now();
    let s = recorded_session(60);
    assert!(matches!(s.record("", ts), Err(CoreError::MissingSubject)));
    assert!(matches!(s.record(UNKNOWN_SUBJECT, ts), Err(CoreError::MissingSubject)));

    // ingen samples ⇒ ingenting å lagre
    let empty = Session::default();
    assert!(matches!(empty.record("user-42", ts), Err(CoreError::EmptyRecord)));
}

#[test]
fn non_finite_estimates_are_stored_as_zero() {
    let analysis = WindowAnalysis {
        heart_rate: HeartRateEstimate { bpm: f64::NAN, confidence: 0.3 },
        hrv: HrvEstimate { sdnn_ms: f64::INFINITY, confidence: 0.2 },
        ..WindowAnalysis::default()
    };
    let rec = DerivedRecord::build("u1", &analysis, vec![Sample::new(0.0, 1.0)], Utc::now()).unwrap();
    assert_eq!(rec.heart_rate.bpm, 0.0);
    assert_eq!(rec.hrv.sdnn_ms, 0.0);
    assert_eq!(rec.heart_rate.confidence, 0.3);
}

fn rec(subject: &str, bpm: f64, sdnn: f64, day: u32) -> DerivedRecord {
    DerivedRecord {
        subject_id: subject.to_string(),
        heart_rate: HeartRateEstimate { bpm, confidence: 0.9 },
        hrv: HrvEstimate { sdnn_ms: sdnn, confidence: 0.5 },
        ppg_data: vec![Sample::new(0.0, 1.0)],
        timestamp: Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap(),
    }
}

#[test]
fn in_memory_store_aggregates_per_subject() {
    let mut store = InMemoryRecordStore::new();
    store.create(&rec("a", 70.0, 40.0, 1)).unwrap();
    store.create(&rec("a", 80.0, 60.0, 3)).unwrap();
    store.create(&rec("b", 100.0, 20.0, 2)).unwrap();
    assert_eq!(store.len(), 3);

    let avg = store.aggregate_by_subject("a").unwrap();
    assert!((avg.avg_heart_rate - 75.0).abs() < 1e-12);
    assert!((avg.avg_hrv - 50.0).abs() < 1e-12);

    // ukjent subject ⇒ nuller, ikke feil
    let none = store.aggregate_by_subject("c").unwrap();
    assert_eq!(none.avg_heart_rate, 0.0);
    assert_eq!(none.avg_hrv, 0.0);

    assert_eq!(
        store.last_access("a").unwrap(),
        Some(Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap())
    );
    assert_eq!(store.last_access("c").unwrap(), None);
    assert!(matches!(store.aggregate_by_subject("unknown"), Err(CoreError::MissingSubject)));
}

#[test]
fn historical_summary_from_store() {
    let mut store = InMemoryRecordStore::new();
    store.create(&rec("a", 60.0, 30.0, 4)).unwrap();

    let h = historical_summary(&store, "a").unwrap();
    assert_eq!(h.avg_heart_rate, 60.0);
    assert_eq!(h.avg_hrv, 30.0);
    assert!(h.last_access.is_some());
}

#[test]
fn api_responses_decode() {
    let created: CreateResponse = serde_json::from_str(
        r#"{"success":true,"data":{"_id":"x1","subjectId":"a","heartRate":{"bpm":70,"confidence":0.9},
            "hrv":{"sdnn":40,"confidence":0.5},"ppgData":[],"timestamp":"2024-05-01T08:00:00Z"}}"#,
    )
    .unwrap();
    assert!(created.success);
    let stored: DerivedRecord = serde_json::from_value(created.data.unwrap()).unwrap();
    assert_eq!(stored.hrv.sdnn_ms, 40.0);

    let agg: AggregateResponse =
        serde_json::from_str(r#"{"success":true,"avgHeartRate":null,"avgHRV":12.5}"#).unwrap();
    assert_eq!(agg.avg_heart_rate, None);
    assert_eq!(agg.avg_hrv, Some(12.5));
}

#[test]
fn report_shows_cards_with_confidence() {
    let s = recorded_session(300);
    let analysis = s.latest().unwrap();

    let cs = cards(analysis, None);
    assert_eq!(cs.len(), 3);
    assert!(cs.iter().all(|c| c.value.confidence().is_some()));

    let history = HistoricalSummary { avg_heart_rate: 71.0, avg_hrv: 0.0, last_access: None };
    let txt = format_report(analysis, Some(&history));
    assert!(txt.starts_with("--- Pulse Report ---"));
    assert!(txt.contains("Heart Rate"));
    assert!(txt.contains("BPM"));
    assert!(txt.contains("71.0 BPM"));
    assert!(txt.contains("confidence"));
}

#[test]
fn metric_value_display() {
    let hr = MetricValue::HeartRate(HeartRateEstimate { bpm: 74.19, confidence: 0.98 });
    assert_eq!(hr.to_string(), "74 BPM");
    let hrv = MetricValue::Hrv(HrvEstimate { sdnn_ms: 8.539, confidence: 0.4 });
    assert_eq!(hrv.to_string(), "8.5 ms");
    assert_eq!(MetricValue::HeartRate(HeartRateEstimate::NONE).to_string(), "--");
    assert_eq!(MetricValue::Quality(QualityEstimate::NONE).to_string(), "poor");

    let v = serde_json::to_value(hr).unwrap();
    assert_eq!(v["kind"], "heartRate");
    assert_eq!(v["confidence"], 0.98);
}

#[test]
fn metric_value_respects_width() {
    let hr = MetricValue::HeartRate(HeartRateEstimate { bpm: 74.0, confidence: 0.9 });
    assert_eq!(format!("{hr:>10}"), "    74 BPM");
    assert_eq!(format!("{:<4}|", MetricValue::Hrv(HrvEstimate::NONE)), "--  |");

    let card = heartlens_core::cli::Card { title: "Heart Rate", value: hr };
    assert_eq!(card.line(), "Heart Rate          74 BPM  (confidence 0.90)");
}
