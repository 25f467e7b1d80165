// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::report::HostOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Reporter plugin to use
    #[serde(default = "default_reporter")]
    pub reporter: String,

    /// File to write the report to (stdout when unset)
    #[serde(default)]
    pub output: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            reporter: default_reporter(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Wrap long lines at the viewport width
    #[serde(default)]
    pub word_wrap: bool,

    /// Base indent for everything the reporter writes
    #[serde(default)]
    pub indent: usize,

    /// Fixed viewport width instead of the terminal's
    #[serde(default)]
    pub viewport_width: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            word_wrap: false,
            indent: 0,
            viewport_width: None,
        }
    }
}

// Default values
pub const ENV_REPORTHOST_REPORTER: &str = "REPORTHOST_REPORTER";

pub fn default_reporter() -> String {
    String::from("json")
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .reporthostrc (current directory)
        // 2. ~/.reporthostrc (home directory)
        // 3. .reporthostrc.toml (current directory)
        // 4. ~/.reporthostrc.toml (home directory)

        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir()?;

        let paths = [
            cwd.join(".reporthostrc"),
            home.join(".reporthostrc"),
            cwd.join(".reporthostrc.toml"),
            home.join(".reporthostrc.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content)
            .map_err(|e| tracing::warn!("Ignoring invalid configuration: {}", e))
            .ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Reporter name: `cli` if given, then the environment, then the file.
    pub fn resolve_reporter(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| std::env::var(ENV_REPORTHOST_REPORTER).ok())
            .unwrap_or_else(|| self.general.reporter.clone())
    }

    /// Host options implied by this configuration.
    pub fn host_options(&self, no_color_flag: bool) -> HostOptions {
        HostOptions {
            no_colors: no_color_flag || !self.output.color,
            viewport_width: self.output.viewport_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[general]
reporter = "spec"
output = "report.json"

[output]
color = false
word_wrap = true
indent = 2
viewport_width = 100
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.general.reporter, "spec");
        assert_eq!(config.general.output, Some("report.json".to_string()));
        assert!(!config.output.color);
        assert!(config.output.word_wrap);
        assert_eq!(config.output.indent, 2);
        assert_eq!(config.output.viewport_width, Some(100));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[output]\nindent = 4\n").expect("Failed to parse config");
        assert_eq!(config.general.reporter, "json");
        assert!(config.output.color);
        assert_eq!(config.output.indent, 4);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("[output]\nindent = \"wide\"\n").is_none());
    }

    #[test]
    fn test_host_options() {
        let config = Config::default();
        assert!(!config.host_options(false).no_colors);
        assert!(config.host_options(true).no_colors);
    }

    #[test]
    fn test_cli_reporter_wins() {
        let config = Config::default();
        assert_eq!(config.resolve_reporter(Some("spec")), "spec");
    }
}
