// List command - show the registered reporters

use anyhow::Result;

use crate::cli::args::ListArgs;
use crate::plugins::PluginRegistry;

pub fn handle_list(args: &ListArgs) -> Result<()> {
    let registry = PluginRegistry::new();
    let plugins = registry.list();

    if args.format == "json" {
        let reporters: Vec<serde_json::Value> = plugins
            .iter()
            .map(|plugin| {
                serde_json::json!({
                    "name": plugin.name,
                    "description": plugin.description,
                })
            })
            .collect();

        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "reporters": reporters }))?
        );
    } else {
        let width = plugins.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for plugin in plugins {
            println!("{:width$}  {}", plugin.name, plugin.description, width = width);
        }
    }

    Ok(())
}
