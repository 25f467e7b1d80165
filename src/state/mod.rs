// State module - the report aggregate built up from lifecycle events

pub mod result;

pub use result::{FormattedError, TestResult, TestRunInfo};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a reporter learns about one task run.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_agents: Option<Vec<String>>,
    pub passed: usize,
    pub total: usize,
    pub skipped: usize,
    pub fixtures: Vec<Fixture>,
    pub warnings: Vec<String>,
}

/// A named group of tests, in the order the runner discovered it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub path: String,
    pub meta: Value,
    pub tests: Vec<TestResult>,
}

impl Fixture {
    pub fn new(name: impl Into<String>, path: impl Into<String>, meta: Value) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            meta,
            tests: Vec::new(),
        }
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the task start.
    pub fn start(&mut self, start_time: DateTime<Utc>, user_agents: Vec<String>, total: usize) {
        self.start_time = Some(start_time);
        self.user_agents = Some(user_agents);
        self.total = total;
    }

    /// Append a fixture; it becomes the current one.
    pub fn push_fixture(&mut self, fixture: Fixture) {
        self.fixtures.push(fixture);
    }

    pub fn current_fixture_mut(&mut self) -> Option<&mut Fixture> {
        self.fixtures.last_mut()
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record the task end.
    pub fn finish(&mut self, end_time: DateTime<Utc>, passed: usize, warnings: Vec<String>) {
        self.passed = passed;
        self.end_time = Some(end_time);
        self.warnings = warnings;
    }

    /// Number of tests recorded across all fixtures.
    pub fn test_count(&self) -> usize {
        self.fixtures.iter().map(|f| f.tests.len()).sum()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_new_report_is_empty() {
        let report = Report::new();
        assert!(report.start_time.is_none());
        assert!(report.user_agents.is_none());
        assert_eq!(report.total, 0);
        assert!(report.fixtures.is_empty());
    }

    #[test]
    fn test_key_order() {
        let mut report = Report::new();
        report.start(Utc.timestamp_opt(0, 0).unwrap(), vec!["Chrome".into()], 1);
        let text = report.to_json_pretty().unwrap();

        let keys = [
            "\"startTime\"",
            "\"endTime\"",
            "\"userAgents\"",
            "\"passed\"",
            "\"total\"",
            "\"skipped\"",
            "\"fixtures\"",
            "\"warnings\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("\"endTime\": null"));
    }

    #[test]
    fn test_current_fixture_is_last() {
        let mut report = Report::new();
        assert!(report.current_fixture_mut().is_none());
        report.push_fixture(Fixture::new("a", "a.js", json!({})));
        report.push_fixture(Fixture::new("b", "b.js", json!(null)));
        assert_eq!(report.current_fixture_mut().unwrap().name, "b");
    }
}
