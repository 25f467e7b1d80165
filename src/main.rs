// Main entry point for reporthost

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use reporthost::cli::{Cli, Commands};
use reporthost::commands;
use reporthost::config;

fn main() -> Result<()> {
    // Load configuration from file (if exists)
    let config = config::Config::load();

    let cli = Cli::parse();

    reporthost::logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting reporthost v{}", env!("CARGO_PKG_VERSION"));
    }

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    // Handle config flag
    if cli.config {
        print_config(config.as_ref());
        return Ok(());
    }

    // Handle init_config flag
    if let Some(config_file) = cli.init_config {
        let config = config::Config::default();
        std::fs::write(&config_file, config.to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    // Handle completion flag
    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    let config = config.unwrap_or_default();

    match &cli.command {
        Some(Commands::Replay(args)) => commands::handle_replay(&cli, args, &config),
        Some(Commands::List(args)) => commands::handle_list(args),
        Some(Commands::Tags) => commands::handle_tags(!cli.no_color && config.output.color),
        None => {
            warn!("No command given. Use 'reporthost --help' for usage.");
            Ok(())
        }
    }
}

fn print_config(config: Option<&config::Config>) {
    println!("Current configuration:");

    if let Some(cfg) = config {
        println!("\n  Configuration file loaded:");
        println!("    Reporter: {}", cfg.general.reporter);
        if let Some(ref output) = cfg.general.output {
            println!("    Output: {}", output);
        }
        println!(
            "    Color: {}",
            if cfg.output.color {
                "enabled"
            } else {
                "disabled"
            }
        );
        println!("    Word wrap: {}", cfg.output.word_wrap);
        println!("    Indent: {}", cfg.output.indent);
        match cfg.output.viewport_width {
            Some(width) => println!("    Viewport width: {}", width),
            None => println!("    Viewport width: terminal"),
        }
    } else {
        println!("\n  No configuration file loaded");
        println!("  Create one with: reporthost --init-config .reporthostrc.toml");
    }

    println!("\n  Environment variables:");
    match std::env::var(config::ENV_REPORTHOST_REPORTER) {
        Ok(reporter) => println!("    {}: {}", config::ENV_REPORTHOST_REPORTER, reporter),
        Err(_) => println!(
            "    {}: not set (default: {})",
            config::ENV_REPORTHOST_REPORTER,
            config::default_reporter()
        ),
    }

    print_precedence();
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Environment variables");
    println!("  3. Configuration file");
    println!("  4. Built-in defaults (lowest)");
}
