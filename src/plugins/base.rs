// Default lifecycle hooks: aggregate the report and dump it as JSON at the end

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::ReporterPlugin;
use crate::report::{HostContext, HostError};
use crate::state::{Fixture, FormattedError, TestRunInfo};

/// A plugin that keeps every default hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseReporter;

impl ReporterPlugin for BaseReporter {}

pub fn report_task_start(
    host: &mut HostContext,
    start_time: DateTime<Utc>,
    user_agents: Vec<String>,
    test_count: usize,
    _test_structure: &Value,
    _task_properties: &Value,
) -> Result<(), HostError> {
    host.report_mut().start(start_time, user_agents, test_count);
    Ok(())
}

pub fn report_fixture_start(
    host: &mut HostContext,
    name: &str,
    path: &str,
    meta: &Value,
) -> Result<(), HostError> {
    host.report_mut()
        .push_fixture(Fixture::new(name, path, meta.clone()));
    Ok(())
}

pub fn report_test_done(
    host: &mut HostContext,
    name: &str,
    info: TestRunInfo,
    meta: &Value,
) -> Result<(), HostError> {
    let errs = info
        .errs
        .iter()
        .map(|err| FormattedError::Rendered(host.format_error(err.as_ref(), "")))
        .collect();

    record_test(host, name, info, meta, errs)
}

/// Count a skip if needed and append the test to the current fixture.
pub fn record_test(
    host: &mut HostContext,
    name: &str,
    info: TestRunInfo,
    meta: &Value,
    errs: Vec<FormattedError>,
) -> Result<(), HostError> {
    // A rejected test must leave the counters untouched.
    if host.report_mut().current_fixture_mut().is_none() {
        return Err(HostError::NoActiveFixture {
            test: name.to_string(),
        });
    }

    if info.skipped {
        host.report_mut().record_skip();
    }

    host.push_test(info.into_result(name, meta.clone(), errs))
}

pub fn report_task_done(
    host: &mut HostContext,
    end_time: DateTime<Utc>,
    passed: usize,
    warnings: Vec<String>,
) -> Result<(), HostError> {
    host.report_mut().finish(end_time, passed, warnings);

    let json = host.report().to_json_pretty()?;
    host.write(&json);
    Ok(())
}
