//! Tests for the show-config CLI command

use crate::common::StoreFixture;
use sitesearch::cli::commands::config::{execute, ConfigArgs};
use sitesearch::cli::OutputFormat;
use sitesearch::core::config::Config;

#[test]
fn test_show_config_human() {
    let result = execute(ConfigArgs { toml: false }, &StoreFixture::config(), OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_json() {
    let result = execute(ConfigArgs { toml: false }, &Config::default(), OutputFormat::Json);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_toml_round_trips() {
    let config = StoreFixture::config();
    let result = execute(ConfigArgs { toml: true }, &config, OutputFormat::Human);
    assert!(result.is_ok());

    let rendered = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed.sites.len(), 1);
    assert_eq!(parsed.languages.known, config.languages.known);
}
