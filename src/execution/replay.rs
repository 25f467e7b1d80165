// Replay driver - feeds recorded lifecycle events to a reporter host in order

use anyhow::{Context, Result};
use std::io::BufRead;
use tracing::{debug, info};

use super::events::LifecycleEvent;
use crate::report::{HostError, ReporterPluginHost};
use crate::time;

/// Counts gathered while replaying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    /// Test starts the plugin chose not to handle
    pub unhandled_test_starts: usize,
}

/// Deliver one event to `host`. Returns `false` for a test start the plugin
/// does not implement.
pub fn dispatch(host: &mut ReporterPluginHost, event: LifecycleEvent) -> Result<bool, HostError> {
    match event {
        LifecycleEvent::TaskStart {
            start_time,
            user_agents,
            test_count,
            test_structure,
            task_properties,
        } => host.report_task_start(
            start_time.unwrap_or_else(time::now_utc),
            user_agents,
            test_count,
            &test_structure,
            &task_properties,
        )?,
        LifecycleEvent::FixtureStart { name, path, meta } => {
            host.report_fixture_start(&name, &path, &meta)?
        }
        LifecycleEvent::TestStart { name, meta } => {
            return host.report_test_start(&name, &meta);
        }
        LifecycleEvent::TestDone {
            name,
            meta,
            run_info,
        } => host.report_test_done(&name, run_info.into(), &meta)?,
        LifecycleEvent::TaskDone {
            end_time,
            passed,
            warnings,
        } => host.report_task_done(end_time.unwrap_or_else(time::now_utc), passed, warnings)?,
    }

    Ok(true)
}

/// Read newline-delimited JSON events from `reader` and play them against
/// `host`, stopping at the first malformed line or failing hook.
pub fn replay<R: BufRead>(reader: R, host: &mut ReporterPluginHost) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read event line {}", line_no))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: LifecycleEvent = serde_json::from_str(&line)
            .with_context(|| format!("Invalid lifecycle event on line {}", line_no))?;
        let kind = event.kind();
        debug!("line {}: {}", line_no, kind);

        let handled = dispatch(host, event)
            .with_context(|| format!("Reporter failed on {} (line {})", kind, line_no))?;

        summary.events += 1;
        if !handled {
            summary.unhandled_test_starts += 1;
        }
    }

    info!(
        "Replayed {} event(s) through reporter '{}'",
        summary.events,
        host.name()
    );

    Ok(summary)
}
