// Reporter host lifecycle tests

use chrono::{DateTime, TimeZone, Utc};
use console::Style;
use reporthost::plugins::{BaseReporter, JsonReporter, ReporterPlugin};
use reporthost::report::{
    HostContext, HostError, MarkupError, OutStream, Palette, ReporterPluginHost,
};
use reporthost::state::{FormattedError, TestRunInfo};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::Arc;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn boom() -> Arc<dyn reporthost::report::RenderableError> {
    Arc::new(String::from("boom"))
}

#[test]
fn test_full_run_produces_report() {
    // Arrange
    let (stream, buffer) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");

    // Act
    host.report_task_start(at(0), vec!["Chrome 120".into()], 3, &json!([]), &json!({}))
        .unwrap();
    host.report_fixture_start("Login", "tests/login.js", &json!({ "owner": "web" }))
        .unwrap();
    host.report_test_done("signs in", TestRunInfo::passed(120), &json!({}))
        .unwrap();
    host.report_test_done("rejects bad password", TestRunInfo::failed(vec![boom()], 80), &json!({}))
        .unwrap();
    host.report_fixture_start("Cart", "tests/cart.js", &json!(null))
        .unwrap();
    host.report_test_done("adds item", TestRunInfo::skipped(), &json!({}))
        .unwrap();
    host.report_task_done(at(5), 1, vec!["slow selector".into()])
        .unwrap();

    // Assert
    let report = host.report();
    assert_eq!(report.start_time, Some(at(0)));
    assert_eq!(report.end_time, Some(at(5)));
    assert_eq!(report.user_agents, Some(vec!["Chrome 120".to_string()]));
    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.warnings, vec!["slow selector"]);
    assert_eq!(report.fixtures.len(), 2);
    assert_eq!(report.fixtures[0].tests.len(), 2);
    assert_eq!(report.fixtures[1].tests[0].name, "adds item");
    assert!(report.fixtures[1].tests[0].skipped);

    let written: Value = serde_json::from_str(&buffer.contents()).unwrap();
    assert_eq!(written["fixtures"][0]["path"], "tests/login.js");
    assert_eq!(written["fixtures"][0]["tests"][1]["errs"][0], "boom");
    assert_eq!(written["fixtures"][0]["tests"][0]["durationMs"], 120);
}

#[test]
fn test_two_fixture_scenario() {
    // Arrange
    let (stream, _) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");

    // Act
    host.report_task_start(at(0), vec!["chromeHeadless".into()], 3, &json!([]), &json!({}))
        .unwrap();
    host.report_fixture_start("f1", "f1.js", &json!({})).unwrap();
    host.report_test_done("a", TestRunInfo::passed(10), &json!({}))
        .unwrap();
    host.report_test_done("b", TestRunInfo::skipped(), &json!({}))
        .unwrap();
    host.report_fixture_start("f2", "f2.js", &json!({})).unwrap();
    host.report_test_done("c", TestRunInfo::passed(10), &json!({}))
        .unwrap();
    host.report_task_done(at(9), 2, vec![]).unwrap();

    // Assert
    let report = host.into_report();
    assert_eq!(report.start_time, Some(at(0)));
    assert_eq!(report.end_time, Some(at(9)));
    assert_eq!(report.user_agents, Some(vec!["chromeHeadless".to_string()]));
    assert_eq!((report.passed, report.total, report.skipped), (2, 3, 1));
    let sizes: Vec<_> = report.fixtures.iter().map(|f| f.tests.len()).collect();
    assert_eq!(sizes, vec![2, 1]);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_report_keys_keep_their_order() {
    // Arrange
    let (stream, _) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");
    host.report_task_start(at(0), vec![], 0, &json!([]), &json!({}))
        .unwrap();
    host.report_task_done(at(1), 0, vec![]).unwrap();

    // Act
    let json = host.report().to_json_pretty().unwrap();

    // Assert
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
    let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
}

#[test]
fn test_skips_counted_per_test_done() {
    let (stream, _) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");
    host.report_fixture_start("F", "f.js", &json!({})).unwrap();

    for name in ["a", "b", "c"] {
        host.report_test_done(name, TestRunInfo::skipped(), &json!({}))
            .unwrap();
    }
    host.report_test_done("d", TestRunInfo::passed(1), &json!({}))
        .unwrap();

    assert_eq!(host.report().skipped, 3);
    assert_eq!(host.report().test_count(), 4);
}

#[test]
fn test_test_done_without_fixture_fails() {
    // Arrange
    let (stream, _) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");

    // Act
    let err = host
        .report_test_done("orphan", TestRunInfo::passed(1), &json!({}))
        .unwrap_err();

    // Assert
    match err {
        HostError::NoActiveFixture { test } => assert_eq!(test, "orphan"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(host.report().test_count(), 0);
}

#[derive(Default)]
struct CountingPlugin {
    fixtures: usize,
}

impl ReporterPlugin for CountingPlugin {
    fn report_fixture_start(
        &mut self,
        host: &mut HostContext,
        name: &str,
        _path: &str,
        _meta: &Value,
    ) -> Result<(), HostError> {
        self.fixtures += 1;
        host.write(&format!("fixture {}: {}", self.fixtures, name))
            .newline();
        Ok(())
    }
}

#[test]
fn test_override_replaces_default_hook() {
    // Arrange
    let (stream, buffer) = OutStream::buffer();
    let mut host =
        ReporterPluginHost::new(Box::new(CountingPlugin::default()), Some(stream), "counting");

    // Act
    host.report_fixture_start("First", "a.js", &json!({})).unwrap();
    host.report_fixture_start("Second", "b.js", &json!({})).unwrap();

    // Assert
    assert_eq!(buffer.contents(), "fixture 1: First\nfixture 2: Second\n");
    assert!(host.report().fixtures.is_empty());
}

struct MagentaPlugin;

impl ReporterPlugin for MagentaPlugin {
    fn palette(&self, _use_colors: bool) -> Palette {
        let mut palette = Palette::new(true);
        palette.styles_mut().bold_red = Style::new().magenta();
        palette.styles_mut().bold = Style::new().underlined();
        palette
    }
}

#[test]
fn test_plugin_palette_reaches_format_error() {
    // Arrange
    let (stream, _) = OutStream::buffer();
    let host = ReporterPluginHost::new(Box::new(MagentaPlugin), Some(stream), "magenta");
    let err = MarkupError::new(r#"<div class="message">Boom</div> in <strong>step</strong>"#);

    // Act
    let formatted = host.format_error(&err, "");

    // Assert
    let magenta = Style::new().magenta().force_styling(true);
    let underlined = Style::new().underlined().force_styling(true);
    assert_eq!(
        formatted,
        format!("{} in {}", magenta.apply_to("Boom"), underlined.apply_to("step"))
    );
    assert_eq!(host.palette().bold("x"), underlined.apply_to("x").to_string());
}

#[test]
fn test_test_start_is_optional() {
    let (stream, buffer) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");

    let handled = host.report_test_start("t", &json!({})).unwrap();

    assert!(!handled);
    assert!(buffer.is_empty());
}

#[test]
fn test_json_reporter_indexes_markup_errors() {
    // Arrange
    let markup = concat!(
        r#"<div class="message">Element not found</div>"#,
        "\n\nBrowser: Chrome 120\n\n",
        r#"<div class="code-frame">"#,
        r#"<div class="code-line"><div class="code-line-num">11</div><div class="code-line-src">await t.maximizeWindow()</div></div>"#,
        r#"<div class="code-line-last"><div class="code-line-num-base">12</div><div class="code-line-src">.click('#go') // ReadyTest 4</div></div>"#,
        "</div>"
    );
    let (stream, _) = OutStream::buffer();
    let mut host = ReporterPluginHost::new(Box::new(JsonReporter::new()), Some(stream), "json");
    host.report_fixture_start("F", "f.js", &json!({})).unwrap();

    // Act
    let info = TestRunInfo::failed(vec![Arc::new(MarkupError::new(markup))], 40);
    host.report_test_done("t", info, &json!({})).unwrap();

    // Assert
    let errs = &host.report().fixtures[0].tests[0].errs;
    assert_eq!(
        errs[0],
        FormattedError::Indexed {
            message: "Element not found\n\nBrowser: Chrome 120\n".into(),
            action_index: Some(4),
        }
    );
    let serialized = serde_json::to_value(&errs[0]).unwrap();
    assert_eq!(serialized["actionIndex"], 4);
}

#[test]
fn test_json_reporter_never_uses_colors() {
    let host = ReporterPluginHost::new(Box::new(JsonReporter::new()), None, "json");
    assert!(!host.use_colors());
}

#[test]
fn test_report_written_at_current_indent() {
    // Arrange
    let (stream, buffer) = OutStream::buffer();
    let mut host = ReporterPluginHost::base(Some(stream), "base");
    host.set_indent(2);

    // Act
    host.report_task_done(at(0), 0, vec![]).unwrap();

    // Assert
    let contents = buffer.contents();
    assert!(contents.starts_with("  {"));
    assert!(
        contents
            .lines()
            .filter(|line| !line.is_empty())
            .all(|line| line.starts_with("  "))
    );
}

#[test]
fn test_text_helpers_are_exposed() {
    let (stream, _) = OutStream::buffer();
    let host = ReporterPluginHost::new(Box::new(BaseReporter), Some(stream), "base");

    assert_eq!(host.indent_string("a\nb", 2), "  a\n  b");
    assert_eq!(host.word_wrap("one two three", 0, 8), "one two \nthree");
    assert_eq!(host.escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
}

#[test]
fn test_format_error_places_prefix_on_first_line() {
    let (stream, _) = OutStream::buffer();
    let host = ReporterPluginHost::base(Some(stream), "base");
    let err = String::from("first\nsecond");

    let rendered = host.format_error(&err, "1) ");

    assert_eq!(rendered, "1) first\n   second");
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_surfaces_from_hook() {
    // Arrange
    let stream = OutStream::from_writer(FailingWriter);
    let mut host = ReporterPluginHost::base(Some(stream), "base");

    // Act
    let result = host.report_task_done(at(0), 0, vec![]);

    // Assert
    match result {
        Err(HostError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected an io error, got {:?}", other.err()),
    }
    assert!(host.take_write_error().is_ok());
}
