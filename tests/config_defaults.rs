use reporthost::config::{Config, default_reporter};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    assert_eq!(config.general.reporter, "json");
    assert_eq!(default_reporter(), "json");
    assert!(config.general.output.is_none());
    assert!(config.output.color);
    assert!(!config.output.word_wrap);
    assert_eq!(config.output.indent, 0);
    assert!(config.output.viewport_width.is_none());
}

#[test]
fn test_generated_config_parses_back() {
    let toml = Config::default().to_toml();

    let parsed = Config::parse(&toml).expect("generated config should parse");
    assert_eq!(parsed.general.reporter, "json");
    assert!(parsed.output.color);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[general]\nreporter = \"spec\"\n\n[output]\nviewport_width = 72").unwrap();

    let config = Config::load_from_file(file.path()).expect("config should load");
    assert_eq!(config.general.reporter, "spec");
    assert_eq!(config.output.viewport_width, Some(72));
    assert_eq!(config.host_options(false).viewport_width, Some(72));
}

#[test]
fn test_missing_file_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::load_from_file(&dir.path().join("absent.toml")).is_none());
}
