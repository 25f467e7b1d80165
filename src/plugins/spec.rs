// Spec reporter - human-readable output grouped by fixture

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{ReporterPlugin, base};
use crate::report::{HostContext, HostError};
use crate::state::{FormattedError, TestRunInfo};

/// Prints each fixture as a heading and each test as a status line, then a
/// summary. The JSON report is still aggregated but not printed.
#[derive(Debug, Clone, Default)]
pub struct SpecReporter {
    current_test: Option<String>,
    failed: usize,
}

impl SpecReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReporterPlugin for SpecReporter {
    fn report_task_start(
        &mut self,
        host: &mut HostContext,
        start_time: DateTime<Utc>,
        user_agents: Vec<String>,
        test_count: usize,
        test_structure: &Value,
        task_properties: &Value,
    ) -> Result<(), HostError> {
        let header = host.palette().bold("Running tests in:");
        host.set_indent(1).use_word_wrap(true).write(&header).newline();

        for agent in &user_agents {
            let line = format!("- {}", host.palette().cyan(agent));
            host.write(&line).newline();
        }

        base::report_task_start(
            host,
            start_time,
            user_agents,
            test_count,
            test_structure,
            task_properties,
        )
    }

    fn report_fixture_start(
        &mut self,
        host: &mut HostContext,
        name: &str,
        path: &str,
        meta: &Value,
    ) -> Result<(), HostError> {
        let title = host.palette().bold(name);
        host.set_indent(1).use_word_wrap(true).newline().write(&title).newline().newline();

        base::report_fixture_start(host, name, path, meta)
    }

    fn report_test_start(
        &mut self,
        _host: &mut HostContext,
        name: &str,
        _meta: &Value,
    ) -> Option<Result<(), HostError>> {
        self.current_test = Some(name.to_string());
        Some(Ok(()))
    }

    fn report_test_done(
        &mut self,
        host: &mut HostContext,
        name: &str,
        info: TestRunInfo,
        meta: &Value,
    ) -> Result<(), HostError> {
        if self.current_test.as_deref().is_some_and(|started| started != name) {
            tracing::warn!(
                "Test '{}' finished while '{}' was running",
                name,
                self.current_test.as_deref().unwrap_or_default()
            );
        }
        self.current_test = None;

        let has_errors = !info.errs.is_empty();
        let symbols = host.symbols();
        let palette = host.palette().clone();

        let mut title = if info.skipped {
            format!("{} {}", palette.cyan("-"), palette.cyan(name))
        } else if has_errors {
            format!("{} {}", palette.red(symbols.err), palette.red(name))
        } else {
            format!("{} {}", palette.green(symbols.ok), name)
        };

        if info.unstable {
            title.push_str(&palette.yellow(" (unstable)"));
        }
        if let Some(path) = &info.screenshot_path {
            title.push_str(&format!(" (screenshots: {})", palette.grey_underline(path)));
        }

        host.set_indent(3).write(&title);

        let mut errs = Vec::with_capacity(info.errs.len());
        if has_errors {
            self.failed += 1;
            host.newline().set_indent(5);

            for (idx, err) in info.errs.iter().enumerate() {
                let prefix = palette.red(&format!("{}) ", idx + 1));
                let rendered = host.format_error(err.as_ref(), &prefix);
                host.newline().write(&rendered).newline();
                errs.push(FormattedError::Rendered(rendered));
            }
        }

        host.newline();
        base::record_test(host, name, info, meta, errs)
    }

    fn report_task_done(
        &mut self,
        host: &mut HostContext,
        end_time: DateTime<Utc>,
        passed: usize,
        warnings: Vec<String>,
    ) -> Result<(), HostError> {
        let report = host.report();
        let total = report.total;
        let skipped = report.skipped;
        let duration = report
            .start_time
            .map(|start| (end_time - start).num_milliseconds().max(0))
            .unwrap_or_default();
        let palette = host.palette().clone();

        let summary = if self.failed > 0 {
            palette.bold_red(&format!(
                "{}/{} failed ({}ms)",
                self.failed,
                total.saturating_sub(skipped),
                duration
            ))
        } else {
            palette.bold(&format!("{} passed ({}ms)", passed, duration))
        };

        host.set_indent(1).use_word_wrap(true).newline().write(&summary).newline();

        if skipped > 0 {
            let line = palette.cyan(&format!("{} skipped", skipped));
            host.write(&line).newline();
        }

        if !warnings.is_empty() {
            let heading = palette.bold(&format!("Warnings ({}):", warnings.len()));
            host.newline().write(&heading).newline();
            for warning in &warnings {
                host.set_indent(1).write("--").newline().set_indent(3);
                host.write(warning).newline();
            }
        }

        host.report_mut().finish(end_time, passed, warnings);
        Ok(())
    }
}
