use crate::analyzer::WindowAnalysis;
use crate::record::HistoricalSummary;
use crate::types::MetricValue;

/// Ett metrikk-kort: tittel + typet verdi.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: &'static str,
    pub value: MetricValue,
}

impl Card {
    pub fn line(&self) -> String {
        match self.value.confidence() {
            Some(c) => format!("{:<15} {:>10}  (confidence {:.2})", self.title, self.value, c),
            None => format!("{:<15} {:>10}", self.title, self.value),
        }
    }
}

pub fn cards(analysis: &WindowAnalysis, history: Option<&HistoricalSummary>) -> Vec<Card> {
    let mut out = vec![
        Card { title: "Heart Rate", value: MetricValue::HeartRate(analysis.heart_rate) },
        Card { title: "HRV", value: MetricValue::Hrv(analysis.hrv) },
        Card { title: "Signal Quality", value: MetricValue::Quality(analysis.quality) },
    ];
    if let Some(h) = history {
        out.push(Card {
            title: "Avg HR",
            value: MetricValue::Plain { value: h.avg_heart_rate, unit: Some("BPM") },
        });
        out.push(Card {
            title: "Avg HRV",
            value: MetricValue::Plain { value: h.avg_hrv, unit: Some("ms") },
        });
    }
    out
}

pub fn format_report(analysis: &WindowAnalysis, history: Option<&HistoricalSummary>) -> String {
    let mut lines = vec![
        "--- Pulse Report ---".to_string(),
        format!(
            "Vindu: {} samples over {:.1}s, {} daler",
            analysis.sample_count,
            analysis.span_secs,
            analysis.valleys.len()
        ),
    ];
    lines.extend(cards(analysis, history).iter().map(Card::line));
    if let Some(ts) = history.and_then(|h| h.last_access) {
        lines.push(format!("Last access: {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.join("\n")
}

pub fn print_report(analysis: &WindowAnalysis, history: Option<&HistoricalSummary>) {
    println!("{}", format_report(analysis, history));
}
