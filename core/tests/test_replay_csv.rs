use heartlens_core::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Row {
    t: f64,
    r: f64,
    g: f64,
    b: f64,
}

fn load_frames(name: &str) -> Vec<Frame> {
    let path = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name);
    let mut rdr = csv::Reader::from_path(&path).expect("fant ikke fixture");
    rdr.deserialize::<Row>()
        .map(|row| {
            let row = row.expect("ugyldig rad");
            Frame { t: row.t, rgb: Rgb::new(row.r, row.g, row.b) }
        })
        .collect()
}

#[test]
fn replay_72bpm_fixture() {
    // ~12 sek ved 30 fps, 1.2 Hz puls + litt støy
    let frames = load_frames("frames_72bpm.csv");
    assert_eq!(frames.len(), 360);

    let mut session = Session::default();
    session.start();
    let mut it = frames.into_iter();
    let mut src = move || it.next();

    let stats = TickScheduler::new(&session).with_max_ticks(1_000).run(&mut session, &mut src);
    assert_eq!(stats.processed, 360);
    assert_eq!(stats.no_frame, 640);

    let a = session.latest().expect("analyse");
    assert!((a.heart_rate.bpm - 72.0).abs() <= 2.0, "bpm = {}", a.heart_rate.bpm);
    assert!(a.heart_rate.confidence > 0.8);
    assert!(a.hrv.confidence > 0.0);
    assert_eq!(a.quality.label, QualityLabel::Good);
    assert!(a.span_secs <= session.config().window_secs + 1e-9);
}

#[test]
fn replay_green_channel_is_weaker_but_same_rate() {
    // G har bare 0.3 i pulsamplitude, men samme periode
    let cfg = ProcessingConfig::with_mode(ChannelMode::GreenOnly);
    let mut session = Session::new(cfg);
    session.start();
    for f in load_frames("frames_72bpm.csv") {
        let mut one = Some(f);
        session.tick(&mut || one.take());
    }

    let a = session.latest().expect("analyse");
    assert!((a.heart_rate.bpm - 72.0).abs() <= 3.0, "bpm = {}", a.heart_rate.bpm);
}
