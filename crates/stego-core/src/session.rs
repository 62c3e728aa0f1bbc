//! Session-scoped scan history.
//!
//! The log is append-only for the lifetime of a session: records are never
//! mutated, removed, or deduplicated, so its length always equals the number
//! of successfully scored images since the session started.

use chrono::Local;
use serde::Serialize;

use crate::score::ScoreResult;

/// Where a scanned image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanSource {
    Upload,
    FolderScan,
}

impl std::fmt::Display for ScanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanSource::Upload => f.write_str("Upload"),
            ScanSource::FolderScan => f.write_str("Folder Scan"),
        }
    }
}

/// One successfully scored image, as logged in the session history.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub image_name: String,
    #[serde(flatten)]
    pub result: ScoreResult,
    pub explanation: &'static str,
    pub timestamp: String,
    pub source: ScanSource,
}

impl ScanRecord {
    /// Build a record stamped with the current local time.
    pub fn new(
        image_name: String,
        result: ScoreResult,
        explanation: &'static str,
        source: ScanSource,
    ) -> Self {
        Self {
            image_name,
            result,
            explanation,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source,
        }
    }
}

/// Counts derived from the current log contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub clean: usize,
    pub risky: usize,
}

impl ScanSummary {
    pub fn clean_percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.clean as f32 * 100.0 / self.total as f32
        }
    }

    pub fn risky_percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.risky as f32 * 100.0 / self.total as f32
        }
    }
}

/// Ordered, append-only history of scan records for one session.
#[derive(Debug, Default)]
pub struct SessionLog {
    records: Vec<ScanRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ScanRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recompute the summary from the log contents. No shadow counters are
    /// kept, so this is consistent after any sequence of appends.
    pub fn summary(&self) -> ScanSummary {
        let total = self.records.len();
        let risky = self
            .records
            .iter()
            .filter(|r| r.result.label.is_risky())
            .count();
        ScanSummary {
            total,
            clean: total - risky,
            risky,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{explanation, RiskLabel, ScoreResult};

    fn record(name: &str, label: RiskLabel) -> ScanRecord {
        ScanRecord::new(
            name.to_string(),
            ScoreResult {
                label,
                confidence: 80.0,
            },
            explanation(label),
            ScanSource::Upload,
        )
    }

    #[test]
    fn empty_log_summary_is_zero() {
        let log = SessionLog::new();
        assert_eq!(
            log.summary(),
            ScanSummary {
                total: 0,
                clean: 0,
                risky: 0
            }
        );
    }

    #[test]
    fn summary_counts_low_risk_as_clean() {
        let mut log = SessionLog::new();
        log.append(record("a.png", RiskLabel::LowRisk));
        log.append(record("b.png", RiskLabel::HighRisk));
        log.append(record("c.png", RiskLabel::MediumRisk));

        let summary = log.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.clean, 1);
        assert_eq!(summary.risky, 2);
    }

    #[test]
    fn clean_plus_risky_equals_total_for_any_mix() {
        let labels = [
            RiskLabel::HighRisk,
            RiskLabel::LowRisk,
            RiskLabel::LowRisk,
            RiskLabel::MediumRisk,
            RiskLabel::HighRisk,
            RiskLabel::LowRisk,
            RiskLabel::MediumRisk,
        ];

        let mut log = SessionLog::new();
        for (i, label) in labels.iter().enumerate() {
            log.append(record(&format!("img{i}.png"), *label));
            let summary = log.summary();
            assert_eq!(summary.clean + summary.risky, i + 1);
            assert_eq!(summary.total, log.len());
        }
    }

    #[test]
    fn summary_is_idempotent() {
        let mut log = SessionLog::new();
        log.append(record("a.png", RiskLabel::HighRisk));

        let first = log.summary();
        let second = log.summary();
        assert_eq!(first, second);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = SessionLog::new();
        for name in ["first.png", "second.jpg", "third.jpeg"] {
            log.append(record(name, RiskLabel::LowRisk));
        }

        let names: Vec<_> = log.records().iter().map(|r| r.image_name.as_str()).collect();
        assert_eq!(names, ["first.png", "second.jpg", "third.jpeg"]);
    }

    #[test]
    fn percentages_split_the_pie() {
        let mut log = SessionLog::new();
        log.append(record("a.png", RiskLabel::LowRisk));
        log.append(record("b.png", RiskLabel::HighRisk));
        log.append(record("c.png", RiskLabel::HighRisk));
        log.append(record("d.png", RiskLabel::MediumRisk));

        let summary = log.summary();
        assert!((summary.clean_percent() - 25.0).abs() < 1e-4);
        assert!((summary.risky_percent() - 75.0).abs() < 1e-4);
    }
}
