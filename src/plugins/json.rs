// JSON reporter - the default plugin. Errors are condensed to two lines
// and tagged with the failing action's index.

use serde_json::Value;

use super::action_index::{extract_action_index, two_line_message};
use super::{ReporterPlugin, base};
use crate::report::{HostContext, HostError};
use crate::state::{FormattedError, TestRunInfo};

/// JSON reporter
#[derive(Debug, Clone, Default)]
pub struct JsonReporter;

impl JsonReporter {
    /// Create new JSON reporter
    pub fn new() -> Self {
        Self
    }

    /// Condense a rendered error and attach its action index.
    pub fn index_error(rendered: &str) -> FormattedError {
        FormattedError::Indexed {
            message: two_line_message(rendered),
            action_index: extract_action_index(rendered),
        }
    }
}

impl ReporterPlugin for JsonReporter {
    fn no_colors(&self) -> bool {
        true
    }

    fn report_test_done(
        &mut self,
        host: &mut HostContext,
        name: &str,
        info: TestRunInfo,
        meta: &Value,
    ) -> Result<(), HostError> {
        let errs = info
            .errs
            .iter()
            .map(|err| Self::index_error(&host.format_error(err.as_ref(), "")))
            .collect();

        base::record_test(host, name, info, meta, errs)
    }
}
