use crate::session::{FrameSource, Session, StopHandle, TickOutcome};

/// Oppsummering av en kjøring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: usize,
    pub processed: usize,
    pub no_frame: usize,
    pub skipped: usize,
}

/// Eksplisitt tick-driver. Stopp-flagget sjekkes før hver ny tick,
/// så en pågående tick fullføres og maks én ekstra tick kjøres etter stop.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    stop: StopHandle,
    max_ticks: Option<usize>,
}

impl TickScheduler {
    pub fn new(session: &Session) -> Self {
        Self { stop: session.stop_handle(), max_ticks: None }
    }

    /// Øvre grense på antall ticks (f.eks. ved avspilling av opptak)
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Skal neste tick planlegges?
    pub fn should_schedule(&self, session: &Session, ticks_done: usize) -> bool {
        session.is_recording()
            && !self.stop.is_stop_requested()
            && self.max_ticks.map_or(true, |m| ticks_done < m)
    }

    /// Kjør ticks til stopp er bedt om, økten er idle eller grensen er nådd.
    /// Kilder uten ende må stoppes via `StopHandle`.
    pub fn run<S: FrameSource + ?Sized>(&self, session: &mut Session, source: &mut S) -> RunStats {
        let mut stats = RunStats::default();
        while self.should_schedule(session, stats.ticks) {
            match session.tick(source) {
                TickOutcome::Processed => stats.processed += 1,
                TickOutcome::NoFrame => stats.no_frame += 1,
                TickOutcome::Skipped(_) => stats.skipped += 1,
                TickOutcome::Idle => break,
            }
            stats.ticks += 1;
        }

        if self.stop.is_stop_requested() {
            session.stop();
        }
        log::info!(
            "scheduler ferdig: {} ticks ({} prosessert, {} uten frame, {} hoppet over)",
            stats.ticks,
            stats.processed,
            stats.no_frame,
            stats.skipped
        );
        stats
    }
}
