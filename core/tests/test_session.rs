use heartlens_core::*;
use std::f64::consts::PI;

/// Syntetisk kamera: puls i rødkanalen, faste G/B.
fn camera(freq_hz: f64, fps: f64) -> impl FnMut() -> Option<Frame> {
    let mut i = 0usize;
    move || {
        let t = i as f64 / fps;
        i += 1;
        let p = (2.0 * PI * freq_hz * t).sin();
        Some(Frame { t, rgb: Rgb::new(140.0 + 2.0 * p, 95.0, 80.0) })
    }
}

fn run_ticks(session: &mut Session, source: &mut dyn FrameSource, n: usize) {
    for _ in 0..n {
        session.tick(source);
    }
}

#[test]
fn idle_session_does_nothing() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);
    assert_eq!(s.tick(&mut cam), TickOutcome::Idle);
    assert!(s.buffer().is_empty());
    assert!(s.latest().is_none());
}

#[test]
fn recording_produces_rate_estimate() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);
    s.start();
    run_ticks(&mut s, &mut cam, 360);

    let a = s.latest().expect("analyse etter ticks");
    assert!((a.heart_rate.bpm - 72.0).abs() <= 2.0, "bpm = {}", a.heart_rate.bpm);
    assert!(a.heart_rate.confidence > 0.8);
}

#[test]
fn buffer_never_exceeds_window() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);
    s.start();
    for _ in 0..600 {
        s.tick(&mut cam);
        let newest = s.buffer().newest().unwrap().timestamp;
        let w = s.config().window_secs;
        assert!(s.buffer().raw().iter().all(|x| newest - x.timestamp <= w + 1e-9));
    }
}

#[test]
fn start_and_stop_are_idempotent() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);

    s.stop(); // idle → idle
    assert_eq!(s.state(), SessionState::Idle);

    s.start();
    run_ticks(&mut s, &mut cam, 30);
    s.start(); // allerede i opptak: ingen reset
    assert_eq!(s.buffer().len(), 30);

    s.stop();
    s.stop();
    assert_eq!(s.state(), SessionState::Idle);
}

#[test]
fn stop_freezes_last_estimates() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);
    s.start();
    run_ticks(&mut s, &mut cam, 300);
    s.stop();

    let frozen = s.latest().cloned();
    assert!(frozen.is_some());
    assert_eq!(s.tick(&mut cam), TickOutcome::Idle);
    assert_eq!(s.latest().cloned(), frozen);
}

#[test]
fn start_resets_buffer_and_estimates() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);
    s.start();
    run_ticks(&mut s, &mut cam, 100);
    s.stop();

    s.start();
    assert!(s.buffer().is_empty());
    assert!(s.latest().is_none());
}

#[test]
fn config_is_rejected_while_recording() {
    let mut s = Session::default();
    s.start();
    let res = s.set_config(ProcessingConfig::with_mode(ChannelMode::GreenOnly));
    assert!(matches!(res, Err(CoreError::ConfigWhileRecording)));
    assert_eq!(s.config().mode, ChannelMode::Default);

    s.stop();
    s.set_config(ProcessingConfig::with_mode(ChannelMode::GreenOnly)).unwrap();
    assert_eq!(s.config().mode, ChannelMode::GreenOnly);
}

#[test]
fn mode_switch_changes_values_not_timestamps() {
    let mut a = Session::default();
    let mut b = Session::new(ProcessingConfig::with_mode(ChannelMode::RedOnly));
    let mut cam_a = camera(1.2, 30.0);
    let mut cam_b = camera(1.2, 30.0);
    a.start();
    b.start();
    run_ticks(&mut a, &mut cam_a, 50);
    run_ticks(&mut b, &mut cam_b, 50);

    assert_eq!(a.buffer().timestamps(), b.buffer().timestamps());
    assert_ne!(a.buffer().raw_values(), b.buffer().raw_values());
    // 2R−G−B mot R: 2·140 − 95 − 80 = 105 mot 140 ved t=0
    assert!((a.buffer().raw()[0].value - 105.0).abs() < 1e-9);
    assert!((b.buffer().raw()[0].value - 140.0).abs() < 1e-9);
}

#[test]
fn invalid_frames_are_skipped() {
    let mut s = Session::default();
    s.start();

    let mut frames = vec![
        Frame { t: 0.0, rgb: Rgb::new(100.0, 90.0, 80.0) },
        Frame { t: 0.033, rgb: Rgb::new(100.5, 90.0, 80.0) },
        Frame { t: 0.050, rgb: Rgb::new(f64::NAN, 90.0, 80.0) },
        Frame { t: 0.020, rgb: Rgb::new(100.0, 90.0, 80.0) }, // bakover i tid
        Frame { t: 0.066, rgb: Rgb::new(101.0, 90.0, 80.0) },
    ]
    .into_iter();
    let mut src = move || frames.next();

    assert_eq!(s.tick(&mut src), TickOutcome::Processed);
    assert_eq!(s.tick(&mut src), TickOutcome::Processed);
    assert!(matches!(s.tick(&mut src), TickOutcome::Skipped(_)));
    assert!(matches!(s.tick(&mut src), TickOutcome::Skipped(_)));
    assert_eq!(s.tick(&mut src), TickOutcome::Processed);
    assert_eq!(s.tick(&mut src), TickOutcome::NoFrame);

    assert_eq!(s.buffer().len(), 3);
    assert!(s.is_recording());
}

#[test]
fn scheduler_stops_within_one_tick() {
    let mut s = Session::default();
    s.start();
    let stop = s.stop_handle();

    let mut cam = camera(1.2, 30.0);
    let mut produced = 0usize;
    let mut src = || {
        produced += 1;
        if produced == 90 {
            stop.request_stop();
        }
        cam()
    };

    let sched = TickScheduler::new(&s);
    let stats = sched.run(&mut s, &mut src);

    assert!(stats.ticks <= 91, "ticks = {}", stats.ticks);
    assert!(stats.processed >= 90);
    assert_eq!(s.state(), SessionState::Idle);
    assert!(s.latest().is_some());
}

#[test]
fn scheduler_respects_max_ticks() {
    let mut s = Session::default();
    s.start();
    let mut cam = camera(1.2, 30.0);

    let stats = TickScheduler::new(&s).with_max_ticks(45).run(&mut s, &mut cam);
    assert_eq!(stats, RunStats { ticks: 45, processed: 45, no_frame: 0, skipped: 0 });
    assert!(s.is_recording());
    assert_eq!(s.buffer().len(), 45);
}

#[test]
fn scheduler_on_idle_session_runs_nothing() {
    let mut s = Session::default();
    let mut cam = camera(1.2, 30.0);
    let stats = TickScheduler::new(&s).run(&mut s, &mut cam);
    assert_eq!(stats.ticks, 0);
}
