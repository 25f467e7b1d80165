pub mod action_index;
pub mod base;
pub mod json;
pub mod spec;

pub use base::BaseReporter;
pub use json::JsonReporter;
pub use spec::SpecReporter;

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::report::{HostContext, HostError, Palette};
use crate::state::TestRunInfo;

/// The capability set a reporter plugs into a host.
///
/// Every method has a default; a plugin overrides only what it needs.
/// Overriding a hook replaces the host behavior entirely. The defaults live
/// in [`base`] so an override can still call them explicitly.
pub trait ReporterPlugin: Send {
    /// Turn colors off even when the stream could show them.
    fn no_colors(&self) -> bool {
        false
    }

    /// Styles the host uses for output and for the error decorator.
    fn palette(&self, use_colors: bool) -> Palette {
        Palette::new(use_colors)
    }

    fn report_task_start(
        &mut self,
        host: &mut HostContext,
        start_time: DateTime<Utc>,
        user_agents: Vec<String>,
        test_count: usize,
        test_structure: &Value,
        task_properties: &Value,
    ) -> Result<(), HostError> {
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
        base::report_fixture_start(host, name, path, meta)
    }

    /// Optional hook. `None` means the plugin does not handle test starts.
    fn report_test_start(
        &mut self,
        _host: &mut HostContext,
        _name: &str,
        _meta: &Value,
    ) -> Option<Result<(), HostError>> {
        None
    }

    fn report_test_done(
        &mut self,
        host: &mut HostContext,
        name: &str,
        info: TestRunInfo,
        meta: &Value,
    ) -> Result<(), HostError> {
        base::report_test_done(host, name, info, meta)
    }

    fn report_task_done(
        &mut self,
        host: &mut HostContext,
        end_time: DateTime<Utc>,
        passed: usize,
        warnings: Vec<String>,
    ) -> Result<(), HostError> {
        base::report_task_done(host, end_time, passed, warnings)
    }
}

type PluginFactory = fn() -> Box<dyn ReporterPlugin>;

/// A reporter known to the registry.
#[derive(Debug, Clone)]
pub struct RegisteredPlugin {
    pub name: String,
    pub description: String,
    factory: PluginFactory,
}

impl RegisteredPlugin {
    pub fn create(&self) -> Box<dyn ReporterPlugin> {
        (self.factory)()
    }
}

/// Registry of reporters selectable by name
pub struct PluginRegistry {
    plugins: BTreeMap<String, RegisteredPlugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            plugins: BTreeMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(
            "json",
            "JSON report with condensed errors and action indexes (default)",
            || Box::new(JsonReporter::new()),
        );
        self.register(
            "base",
            "JSON report with fully rendered errors",
            || Box::new(BaseReporter),
        );
        self.register(
            "spec",
            "Human-readable report grouped by fixture",
            || Box::new(SpecReporter::new()),
        );
    }

    /// Register `factory` under `name`, replacing any reporter of that name.
    pub fn register(&mut self, name: &str, description: &str, factory: PluginFactory) {
        if self.plugins.contains_key(name) {
            tracing::warn!("Replacing registered reporter '{}'", name);
        }
        self.plugins.insert(
            name.to_string(),
            RegisteredPlugin {
                name: name.to_string(),
                description: description.to_string(),
                factory,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.plugins.get(name)
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn ReporterPlugin>> {
        self.get(name).map(RegisteredPlugin::create)
    }

    /// Registered reporters, sorted by name.
    pub fn list(&self) -> Vec<&RegisteredPlugin> {
        self.plugins.values().collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
