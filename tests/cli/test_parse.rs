//! Tests for command-line parsing

use clap::Parser;
use sitesearch::cli::{Cli, Commands, OutputFormat};
use sitesearch::core::storage::IndexBackend;

#[test]
fn test_parse_search() {
    let cli = Cli::try_parse_from([
        "sitesearch",
        "--format",
        "json",
        "search",
        "coffee shop",
        "--content",
        "content.json",
        "--site",
        "store1",
        "--param",
        "category=a|b",
        "--param",
        "radius=5",
        "--offset",
        "-3",
        "--lat",
        "55.6",
        "--lon",
        "-12.5",
        "--backend",
        "tantivy",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    let Commands::Search(args) = cli.command else {
        panic!("expected search command");
    };
    assert_eq!(args.phrase.as_deref(), Some("coffee shop"));
    assert_eq!(args.site.as_deref(), Some("store1"));
    assert_eq!(args.params.len(), 2);
    assert_eq!(args.offset, -3);
    assert_eq!(args.lon, Some(-12.5));
    assert_eq!(args.backend, IndexBackend::Tantivy);
}

#[test]
fn test_parse_lat_requires_lon() {
    let result = Cli::try_parse_from([
        "sitesearch",
        "search",
        "coffee",
        "--content",
        "content.json",
        "--lat",
        "55.6",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_bad_param() {
    let result = Cli::try_parse_from([
        "sitesearch",
        "search",
        "--content",
        "content.json",
        "--param",
        "novalue",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_normalize_and_show_config() {
    let cli = Cli::try_parse_from(["sitesearch", "normalize", "a-b"]).unwrap();
    assert!(matches!(cli.command, Commands::Normalize(_)));
    assert_eq!(cli.format, OutputFormat::Human);

    let cli = Cli::try_parse_from(["sitesearch", "show-config", "--config", "x.toml"]).unwrap();
    assert!(matches!(cli.command, Commands::ShowConfig(_)));
    assert!(cli.config.is_some());
}
