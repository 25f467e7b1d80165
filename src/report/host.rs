// Reporter plugin host - owns the output state and routes lifecycle hooks
// to the installed plugin

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::debug;

use super::decorator::{ErrorDecorator, Palette};
use super::error::HostError;
use super::stream::OutStream;
use super::unique_stream::{HostId, StreamController};
use super::RenderableError;
use crate::plugins::{BaseReporter, ReporterPlugin};
use crate::state::{Report, TestResult, TestRunInfo};
use crate::utils::text;

/// Pass/fail glyphs for the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub ok: &'static str,
    pub err: &'static str,
}

impl Symbols {
    pub const WINDOWS: Symbols = Symbols { ok: "√", err: "×" };
    pub const POSIX: Symbols = Symbols { ok: "✓", err: "✖" };

    pub fn for_platform() -> Self {
        if cfg!(windows) {
            Self::WINDOWS
        } else {
            Self::POSIX
        }
    }
}

/// Host settings that come from the caller rather than the plugin.
#[derive(Debug, Clone, Default)]
pub struct HostOptions {
    /// Disable colors regardless of the stream and the plugin.
    pub no_colors: bool,
    /// Pin the viewport width instead of measuring the stream.
    pub viewport_width: Option<usize>,
}

/// Everything a plugin may touch while handling a hook.
///
/// Rendering mode (indent, word wrap) and the stream are private; plugins
/// go through the methods below.
pub struct HostContext {
    id: HostId,
    name: String,
    stream: OutStream,
    stream_controller: Option<Arc<dyn StreamController>>,
    word_wrap_enabled: bool,
    indent: usize,
    use_colors: bool,
    viewport_width: usize,
    symbols: Symbols,
    palette: Palette,
    decorator: ErrorDecorator,
    report: Report,
    write_error: Option<io::Error>,
}

impl HostContext {
    pub fn id(&self) -> HostId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stream(&self) -> &OutStream {
        &self.stream
    }

    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    /// Width in columns, fixed at construction. `usize::MAX` when the
    /// stream is not a terminal.
    pub fn viewport_width(&self) -> usize {
        self.viewport_width
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn word_wrap_enabled(&self) -> bool {
        self.word_wrap_enabled
    }

    pub fn symbols(&self) -> Symbols {
        self.symbols
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn decorator(&self) -> &ErrorDecorator {
        &self.decorator
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    /// Append a test to the current fixture.
    ///
    /// Fails with [`HostError::NoActiveFixture`] when no fixture has started.
    pub fn push_test(&mut self, test: TestResult) -> Result<(), HostError> {
        match self.report.current_fixture_mut() {
            Some(fixture) => {
                fixture.tests.push(test);
                Ok(())
            }
            None => Err(HostError::NoActiveFixture { test: test.name }),
        }
    }

    pub fn indent_string(&self, text: &str, indent: usize) -> String {
        text::indent_string(text, indent)
    }

    pub fn word_wrap(&self, text: &str, indent: usize, width: usize) -> String {
        text::word_wrap(text, indent, width)
    }

    pub fn escape_html(&self, text: &str) -> String {
        text::escape_html(text)
    }

    /// Render `err` so that it fits the viewport after the current indent,
    /// with `prefix` standing in front of the first line.
    pub fn format_error(&self, err: &dyn RenderableError, prefix: &str) -> String {
        let prefix_width = text::visible_width(prefix);
        let max_msg_length = self
            .viewport_width
            .saturating_sub(self.indent)
            .saturating_sub(prefix_width);

        let msg = err.format_message(&self.decorator, max_msg_length);
        let msg = if self.word_wrap_enabled {
            text::word_wrap(&msg, prefix_width, max_msg_length)
        } else {
            text::indent_string(&msg, prefix_width)
        };

        let rest: String = msg.chars().skip(prefix_width).collect();
        format!("{prefix}{rest}")
    }

    pub fn newline(&mut self) -> &mut Self {
        self.write_to_unique_stream("\n");
        self
    }

    /// Write `text` at the current indent, wrapped if word wrap is on.
    ///
    /// Stream failures are held until the running hook returns, see
    /// [`HostContext::take_write_error`].
    pub fn write(&mut self, text: &str) -> &mut Self {
        let text = if self.word_wrap_enabled {
            text::word_wrap(text, self.indent, self.viewport_width)
        } else {
            text::indent_string(text, self.indent)
        };

        self.write_to_unique_stream(&text);
        self
    }

    pub fn use_word_wrap(&mut self, enabled: bool) -> &mut Self {
        self.word_wrap_enabled = enabled;
        self
    }

    pub fn set_indent(&mut self, indent: usize) -> &mut Self {
        self.indent = indent;
        self
    }

    /// The first write failure since the last call, if any.
    pub fn take_write_error(&mut self) -> Result<(), HostError> {
        match self.write_error.take() {
            Some(err) => Err(HostError::Io(err)),
            None => Ok(()),
        }
    }

    fn write_to_unique_stream(&mut self, text: &str) {
        let licensed = self
            .stream_controller
            .as_ref()
            .is_none_or(|controller| controller.ensure_unique_stream(self.stream.id(), self.id));

        if !licensed {
            return;
        }

        if let Err(err) = self.stream.write_str(text)
            && self.write_error.is_none()
        {
            self.write_error = Some(err);
        }
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("stream", &self.stream)
            .field("word_wrap_enabled", &self.word_wrap_enabled)
            .field("indent", &self.indent)
            .field("use_colors", &self.use_colors)
            .field("viewport_width", &self.viewport_width)
            .finish_non_exhaustive()
    }
}

/// A reporter: host state plus the plugin that decides what each lifecycle
/// hook does.
///
/// The runner must call the hooks in order and wait for each to return;
/// in particular `report_fixture_start` must precede any `report_test_done`
/// for that fixture.
pub struct ReporterPluginHost {
    ctx: HostContext,
    plugin: Box<dyn ReporterPlugin>,
}

impl ReporterPluginHost {
    /// Install `plugin` on a new host writing to `stream` (stdout if `None`).
    pub fn new(
        plugin: Box<dyn ReporterPlugin>,
        stream: Option<OutStream>,
        name: impl Into<String>,
    ) -> Self {
        Self::with_options(plugin, stream, name, HostOptions::default())
    }

    pub fn with_options(
        plugin: Box<dyn ReporterPlugin>,
        stream: Option<OutStream>,
        name: impl Into<String>,
        options: HostOptions,
    ) -> Self {
        let stream = stream.unwrap_or_else(OutStream::stdout);
        let use_colors = stream.is_stdout()
            && console::colors_enabled()
            && !plugin.no_colors()
            && !options.no_colors;

        let viewport_width = options
            .viewport_width
            .or_else(|| stream.columns())
            .unwrap_or(usize::MAX);

        let palette = plugin.palette(use_colors);
        let decorator = ErrorDecorator::new(&palette);
        let name = name.into();

        debug!(
            "Reporter '{}' attached (colors: {}, width: {})",
            name, use_colors, viewport_width
        );

        Self {
            ctx: HostContext {
                id: HostId::next(),
                name,
                stream,
                stream_controller: None,
                word_wrap_enabled: false,
                indent: 0,
                use_colors,
                viewport_width,
                symbols: Symbols::for_platform(),
                palette,
                decorator,
                report: Report::new(),
                write_error: None,
            },
            plugin,
        }
    }

    /// A host running the built-in default hooks only.
    pub fn base(stream: Option<OutStream>, name: impl Into<String>) -> Self {
        Self::new(Box::new(BaseReporter), stream, name)
    }

    pub fn with_stream_controller(mut self, controller: Arc<dyn StreamController>) -> Self {
        self.ctx.stream_controller = Some(controller);
        self
    }

    pub fn context(&self) -> &HostContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut HostContext {
        &mut self.ctx
    }

    pub fn into_report(self) -> Report {
        self.ctx.report
    }

    pub fn report_task_start(
        &mut self,
        start_time: DateTime<Utc>,
        user_agents: Vec<String>,
        test_count: usize,
        test_structure: &Value,
        task_properties: &Value,
    ) -> Result<(), HostError> {
        debug!("[{}] task start: {} test(s)", self.ctx.name, test_count);
        self.plugin.report_task_start(
            &mut self.ctx,
            start_time,
            user_agents,
            test_count,
            test_structure,
            task_properties,
        )?;
        self.ctx.take_write_error()
    }

    pub fn report_fixture_start(
        &mut self,
        name: &str,
        path: &str,
        meta: &Value,
    ) -> Result<(), HostError> {
        debug!("[{}] fixture start: {}", self.ctx.name, name);
        self.plugin
            .report_fixture_start(&mut self.ctx, name, path, meta)?;
        self.ctx.take_write_error()
    }

    /// Returns `false` when the plugin does not handle test starts.
    pub fn report_test_start(&mut self, name: &str, meta: &Value) -> Result<bool, HostError> {
        match self.plugin.report_test_start(&mut self.ctx, name, meta) {
            Some(result) => {
                debug!("[{}] test start: {}", self.ctx.name, name);
                result?;
                self.ctx.take_write_error()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn report_test_done(
        &mut self,
        name: &str,
        info: TestRunInfo,
        meta: &Value,
    ) -> Result<(), HostError> {
        debug!(
            "[{}] test done: {} ({} error(s), skipped: {})",
            self.ctx.name,
            name,
            info.errs.len(),
            info.skipped
        );
        self.plugin
            .report_test_done(&mut self.ctx, name, info, meta)?;
        self.ctx.take_write_error()
    }

    pub fn report_task_done(
        &mut self,
        end_time: DateTime<Utc>,
        passed: usize,
        warnings: Vec<String>,
    ) -> Result<(), HostError> {
        debug!("[{}] task done: {} passed", self.ctx.name, passed);
        self.plugin
            .report_task_done(&mut self.ctx, end_time, passed, warnings)?;
        self.ctx.take_write_error()
    }
}

impl Deref for ReporterPluginHost {
    type Target = HostContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for ReporterPluginHost {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

impl fmt::Debug for ReporterPluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterPluginHost")
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}
