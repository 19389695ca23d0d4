//! Config command - show current configuration

use crate::cli::output::{colors, print_header};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;

/// Arguments for the show-config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub toml: bool,
}

/// Execute the show-config command
pub fn execute(
    args: ConfigArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.toml {
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    match format {
        OutputFormat::Human => print_human(config),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }

    Ok(())
}

fn print_human(config: &Config) {
    let xdg = XdgDirs::new();

    print_header("Configuration:");
    println!("  config_file: {}", xdg.config_file().display());
    println!("  search:");
    println!("    default_page_size: {}", config.search.default_page_size);
    println!(
        "    max_page_size: {}",
        config
            .search
            .max_page_size
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unlimited".to_string())
    );
    println!("    geolocation_marker: {}", config.search.geolocation_marker);
    println!("    shell_site: {}", colors::site(&config.search.shell_site));
    println!("    scope_query_field: {}", config.search.scope_query_field);
    println!("  index:");
    println!("    default: {}", colors::site(&config.index.default));
    println!("  languages: {:?}", config.languages.known);
    println!("  multisite:");
    println!(
        "    default_site: {}",
        config.multisite.default_site.as_deref().unwrap_or("(none)")
    );
    println!(
        "    settings_item_name: {}",
        config.multisite.settings_item_name
    );

    if !config.sites.is_empty() {
        println!("  sites:");
        for (name, site) in &config.sites {
            println!(
                "    {}: home {} index {}",
                colors::site(name),
                colors::item_id(&site.home),
                site.index.as_deref().unwrap_or(&config.index.default)
            );
        }
    }

    if !config.facets.is_empty() {
        println!("  facets:");
        for (param, facet) in &config.facets {
            println!("    {}: {:?} {:?}", param, facet.kind, facet.field);
        }
    }

    println!("  sorting.default: {}", config.sorting.default);
    println!(
        "  boosting: {} (name {}, context {})",
        if config.boosting.enabled { "on" } else { "off" },
        config.boosting.name_weight,
        config.boosting.context_weight
    );
    println!(
        "  logging: {}{}",
        config.logging.level,
        if config.logging.json { " (json)" } else { "" }
    );
}
