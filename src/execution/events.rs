// Lifecycle events - what a test runner reports, one JSON object per line

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::report::{MarkupError, RenderableError};
use crate::state::TestRunInfo;

/// Lifecycle event, tagged by its `event` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LifecycleEvent {
    /// The run begins
    TaskStart {
        #[serde(default)]
        start_time: Option<DateTime<Utc>>,
        #[serde(default)]
        user_agents: Vec<String>,
        test_count: usize,
        #[serde(default)]
        test_structure: Value,
        #[serde(default)]
        task_properties: Value,
    },

    /// A fixture begins; following tests belong to it
    FixtureStart {
        name: String,
        #[serde(default)]
        path: String,
        #[serde(default)]
        meta: Value,
    },

    /// A test begins
    TestStart {
        name: String,
        #[serde(default)]
        meta: Value,
    },

    /// A test finished
    TestDone {
        name: String,
        #[serde(default)]
        meta: Value,
        #[serde(default)]
        run_info: RunInfoPayload,
    },

    /// The run finished
    TaskDone {
        #[serde(default)]
        end_time: Option<DateTime<Utc>>,
        passed: usize,
        #[serde(default)]
        warnings: Vec<String>,
    },
}

/// Serialized form of [`TestRunInfo`]. Errors are markup strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunInfoPayload {
    pub errs: Vec<String>,
    pub duration_ms: u64,
    pub unstable: bool,
    pub screenshot_path: Option<String>,
    pub skipped: bool,
    pub warnings: Vec<String>,
}

impl From<RunInfoPayload> for TestRunInfo {
    fn from(payload: RunInfoPayload) -> Self {
        let errs = payload
            .errs
            .into_iter()
            .map(|markup| Arc::new(MarkupError::new(markup)) as Arc<dyn RenderableError>)
            .collect();

        TestRunInfo {
            errs,
            duration_ms: payload.duration_ms,
            unstable: payload.unstable,
            screenshot_path: payload.screenshot_path,
            skipped: payload.skipped,
            warnings: payload.warnings,
        }
    }
}

impl LifecycleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TaskStart { .. } => "taskStart",
            Self::FixtureStart { .. } => "fixtureStart",
            Self::TestStart { .. } => "testStart",
            Self::TestDone { .. } => "testDone",
            Self::TaskDone { .. } => "taskDone",
        }
    }
}
