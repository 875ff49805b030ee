//! Report sinks: where rule evaluation results go.
//!
//! The engine hands every evaluated rule to a [`ReportSink`] as a
//! [`RuleReport`]. Two line-oriented sinks are provided:
//! - [`TextSink`]: `transmit: <group>[<index>] <record>: [<labels>]`
//! - [`JsonSink`]: one JSON object per rule

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::warn;

use crate::engine::{RuleReport, TickSummary};

/// Consumer of rule evaluation results.
pub trait ReportSink: Send + Sync {
    /// Called once per successfully evaluated rule, in evaluation order.
    fn report(&self, report: &RuleReport);

    /// Called after every tick, including ticks where nothing was due.
    fn tick_complete(&self, _summary: &TickSummary) {}
}

// ── Text ────────────────────────────────────────────────────────────

/// Human-readable one-line-per-rule output.
pub struct TextSink<W = io::Stdout> {
    out: Mutex<W>,
}

impl TextSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().expect("text sink lock poisoned")
    }

    /// Render a report as a single line (without the newline).
    pub fn format(report: &RuleReport) -> String {
        let labels: Vec<String> = report.labels.iter().map(ToString::to_string).collect();
        format!(
            "transmit: {}[{}] {}: [{}]",
            report.group,
            report.index,
            report.record,
            labels.join(", ")
        )
    }
}

impl<W: Write + Send> ReportSink for TextSink<W> {
    fn report(&self, report: &RuleReport) {
        write_line(&self.out, &Self::format(report));
    }
}

// ── JSON ────────────────────────────────────────────────────────────

/// Machine-readable output: one JSON object per line.
pub struct JsonSink<W = io::Stdout> {
    out: Mutex<W>,
}

impl JsonSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().expect("json sink lock poisoned")
    }
}

impl<W: Write + Send> ReportSink for JsonSink<W> {
    fn report(&self, report: &RuleReport) {
        match serde_json::to_string(report) {
            Ok(line) => write_line(&self.out, &line),
            Err(e) => warn!(group = %report.group, index = report.index, error = %e, "failed to serialize report"),
        }
    }
}

fn write_line<W: Write>(out: &Mutex<W>, line: &str) {
    let mut out = out.lock().expect("report sink lock poisoned");
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        warn!(error = %e, "failed to write report");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};
    use policy_core::ResourceLabel;

    use super::*;

    fn report(labels: Vec<ResourceLabel>) -> RuleReport {
        RuleReport {
            group: "network".to_string(),
            index: 1,
            record: "high_rx".to_string(),
            annotations: BTreeSet::from(["traffic".to_string()]),
            labels: labels.into_iter().collect(),
            evaluated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn text_line_lists_labels_in_order() {
        let sink = TextSink::new(Vec::new());
        sink.report(&report(vec![
            ResourceLabel::with_sub_resource("vm2", "tap0"),
            ResourceLabel::new("vm1"),
        ]));
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "transmit: network[1] high_rx: [vm1, vm2/tap0]\n");
    }

    #[test]
    fn text_line_with_no_labels() {
        assert_eq!(
            TextSink::<Vec<u8>>::format(&report(vec![])),
            "transmit: network[1] high_rx: []"
        );
    }

    #[test]
    fn json_line_per_report() {
        let sink = JsonSink::new(Vec::new());
        sink.report(&report(vec![ResourceLabel::with_sub_resource("vm1", "tap0")]));
        sink.report(&report(vec![]));

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["group"], "network");
        assert_eq!(first["index"], 1);
        assert_eq!(first["record"], "high_rx");
        assert_eq!(first["annotations"][0], "traffic");
        assert_eq!(first["labels"][0]["resource_id"], "vm1");
        assert_eq!(first["labels"][0]["sub_resource_id"], "tap0");
        assert_eq!(first["evaluated_at"], "2024-05-01T12:00:00Z");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["labels"].as_array().unwrap().len(), 0);
    }
}
