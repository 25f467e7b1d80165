// Replay command - play recorded lifecycle events through a reporter

use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::cli::args::ReplayArgs;
use crate::config::Config;
use crate::execution;
use crate::plugins::PluginRegistry;
use crate::report::{OutStream, ReporterPluginHost};

pub fn handle_replay(cli: &Cli, args: &ReplayArgs, config: &Config) -> Result<()> {
    let registry = PluginRegistry::new();
    let reporter = config.resolve_reporter(args.reporter.as_deref());

    let plugin = registry.create(&reporter).ok_or_else(|| {
        let available: Vec<_> = registry.list().iter().map(|p| p.name.as_str()).collect();
        anyhow!(
            "Unknown reporter '{}'. Available: {}",
            reporter,
            available.join(", ")
        )
    })?;

    let output_path = args
        .output
        .clone()
        .or_else(|| config.general.output.as_ref().map(PathBuf::from));

    let stream = match &output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            info!("Writing report to {}", path.display());
            Some(OutStream::from_writer(file))
        }
        None => None,
    };

    let mut options = config.host_options(cli.no_color);
    if args.width.is_some() {
        options.viewport_width = args.width;
    }

    let mut host = ReporterPluginHost::with_options(plugin, stream, reporter.as_str(), options);
    host.set_indent(args.indent.unwrap_or(config.output.indent))
        .use_word_wrap(args.word_wrap || config.output.word_wrap);

    let summary = if args.events == Path::new("-") {
        execution::replay(io::stdin().lock(), &mut host)?
    } else {
        let file = File::open(&args.events)
            .with_context(|| format!("Failed to open event file: {}", args.events.display()))?;
        execution::replay(BufReader::new(file), &mut host)?
    };

    if summary.unhandled_test_starts > 0 {
        debug!(
            "Reporter '{}' ignored {} test start event(s)",
            reporter, summary.unhandled_test_starts
        );
    }

    Ok(())
}
