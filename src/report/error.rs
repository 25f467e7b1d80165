// Errors surfaced by the reporter plugin host

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    /// `report_test_done` arrived before any `report_fixture_start`.
    #[error("no active fixture for test '{test}': report_fixture_start must precede report_test_done")]
    NoActiveFixture { test: String },

    #[error("failed to write to the output stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize the report: {0}")]
    Serialize(#[from] serde_json::Error),
}
