// Test result structures

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::report::RenderableError;

/// An error as it is stored in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormattedError {
    /// The rendered error text.
    Rendered(String),
    /// A condensed message plus the failing action's position, when one
    /// could be read out of the rendered text. `None` means "no index".
    Indexed {
        message: String,
        #[serde(rename = "actionIndex")]
        action_index: Option<i64>,
    },
}

impl FormattedError {
    pub fn message(&self) -> &str {
        match self {
            Self::Rendered(text) => text,
            Self::Indexed { message, .. } => message,
        }
    }
}

/// Outcome of a single test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub meta: Value,
    pub errs: Vec<FormattedError>,
    pub duration_ms: u64,
    pub unstable: bool,
    pub screenshot_path: Option<String>,
    pub skipped: bool,
}

/// What the runner knows about a finished test.
#[derive(Clone, Default)]
pub struct TestRunInfo {
    pub errs: Vec<Arc<dyn RenderableError>>,
    pub duration_ms: u64,
    pub unstable: bool,
    pub screenshot_path: Option<String>,
    pub skipped: bool,
    pub warnings: Vec<String>,
}

impl TestRunInfo {
    pub fn passed(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn failed(errs: Vec<Arc<dyn RenderableError>>, duration_ms: u64) -> Self {
        Self {
            errs,
            duration_ms,
            ..Self::default()
        }
    }

    pub fn with_screenshot(mut self, path: impl Into<String>) -> Self {
        self.screenshot_path = Some(path.into());
        self
    }

    pub fn with_unstable(mut self, unstable: bool) -> Self {
        self.unstable = unstable;
        self
    }

    /// Build the stored result, keeping the already formatted errors.
    pub fn into_result(
        self,
        name: impl Into<String>,
        meta: Value,
        errs: Vec<FormattedError>,
    ) -> TestResult {
        TestResult {
            name: name.into(),
            meta,
            errs,
            duration_ms: self.duration_ms,
            unstable: self.unstable,
            screenshot_path: self.screenshot_path,
            skipped: self.skipped,
        }
    }
}

impl fmt::Debug for TestRunInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestRunInfo")
            .field("errs", &self.errs.len())
            .field("duration_ms", &self.duration_ms)
            .field("unstable", &self.unstable)
            .field("screenshot_path", &self.screenshot_path)
            .field("skipped", &self.skipped)
            .field("warnings", &self.warnings)
            .finish()
    }
}
