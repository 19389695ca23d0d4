//! Tests for the normalize CLI command

use sitesearch::cli::commands::normalize::{execute, NormalizeArgs};
use sitesearch::cli::OutputFormat;
use sitesearch::core::config::Config;

#[test]
fn test_normalize_human() {
    let args = NormalizeArgs {
        phrase: "coffee-shop (downtown)".to_string(),
    };
    assert!(execute(args, &Config::default(), OutputFormat::Human).is_ok());
}

#[test]
fn test_normalize_json() {
    let args = NormalizeArgs {
        phrase: "?!".to_string(),
    };
    assert!(execute(args, &Config::default(), OutputFormat::Json).is_ok());
}

#[test]
fn test_normalize_custom_reserved_characters() {
    let mut config = Config::default();
    config.search.reserved_characters = Some("#".to_string());
    let args = NormalizeArgs {
        phrase: "c#-sharp".to_string(),
    };
    assert!(execute(args, &config, OutputFormat::Json).is_ok());
}
