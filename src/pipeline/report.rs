// file: src/pipeline/report.rs
// description: per-pass outcome aggregation and summary logging

use crate::models::Outcome;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Outcomes in submission order.
    pub outcomes: Vec<(String, Outcome)>,
    pub duration: Duration,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, full_name: &str, outcome: Outcome) {
        self.outcomes.push((full_name.to_string(), outcome));
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created))
    }

    pub fn already_existing(&self) -> usize {
        self.count(|o| matches!(o, Outcome::AlreadyExists))
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failure)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn outcome_for(&self, full_name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == full_name)
            .map(|(_, outcome)| outcome)
    }

    /// Share of attempts that ended created or already mirrored.
    pub fn success_rate(&self) -> f64 {
        let settled = self.created() + self.already_existing() + self.failed();
        if settled == 0 {
            return 0.0;
        }
        ((self.created() + self.already_existing()) as f64 / settled as f64) * 100.0
    }

    pub fn log_summary(&self) {
        info!("=== Mirror Pass Summary ===");
        info!("Duration: {:.2}s", self.duration.as_secs_f64());
        info!("Repositories attempted: {}", self.attempted());
        info!("Created: {}", self.created());
        info!("Already mirrored: {}", self.already_existing());
        info!("Failed: {}", self.failed());
        if self.skipped() > 0 {
            info!("Skipped (dry run): {}", self.skipped());
        }
        info!("Success rate: {:.2}%", self.success_rate());
        info!("===========================");
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counters() {
        let mut report = SyncReport::new();
        report.record("a/one", Outcome::Created);
        report.record("a/two", Outcome::AlreadyExists);
        report.record(
            "a/three",
            Outcome::Failed {
                status: 500,
                body: String::new(),
            },
        );
        report.record("a/four", Outcome::TransportError("timeout".into()));

        assert_eq!(report.attempted(), 4);
        assert_eq!(report.created(), 1);
        assert_eq!(report.already_existing(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.skipped(), 0);
        assert!((report.success_rate() - 50.0).abs() < f64::EPSILON);
        assert_eq!(report.outcome_for("a/two"), Some(&Outcome::AlreadyExists));
        assert_eq!(report.outcome_for("a/missing"), None);
    }

    #[test]
    fn test_empty_report() {
        let report = SyncReport::new();
        assert_eq!(report.attempted(), 0);
        assert_eq!(report.success_rate(), 0.0);
    }
}
