//! Search command - run a site search against a content fixture

use crate::cli::output::{colors, print_warning, quoted};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::content::ContentFixture;
use crate::core::search::{is_geolocation_request, ContentQuery};
use crate::core::services::Services;
use crate::core::storage::IndexBackend;
use crate::core::types::{Coordinates, ItemId, SearchRequest};
use clap::Args;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search phrase (reserved characters are stripped)
    pub phrase: Option<String>,

    /// Content fixture (JSON with items and search documents)
    #[arg(long, short = 'c', env = "SITESEARCH_CONTENT")]
    pub content: PathBuf,

    /// Scope item ids, `|`-separated
    #[arg(long)]
    pub scope: Option<String>,

    /// Language selector, `,` or `|` separated
    #[arg(long, short = 'l')]
    pub language: Option<String>,

    /// Sort key: relevance, name, updated or distance, optionally `,asc`/`,desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Page size (defaults to search.default_page_size)
    #[arg(long, short = 'k', allow_negative_numbers = true)]
    pub page_size: Option<i64>,

    /// Results to skip
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub offset: i64,

    /// Site the search is issued on
    #[arg(long, short = 's')]
    pub site: Option<String>,

    /// Id of the page the search is issued from
    #[arg(long)]
    pub item: Option<String>,

    /// Latitude of the visitor
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the visitor
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Request parameter consumed by facets (repeatable)
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Search points of interest under the site item
    #[arg(long)]
    pub geolocation: bool,

    /// Print the composed query instead of running it
    #[arg(long)]
    pub explain: bool,

    /// Index backend the fixture is loaded into
    #[arg(long, default_value = "memory", value_parser = parse_backend)]
    pub backend: IndexBackend,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn parse_backend(raw: &str) -> Result<IndexBackend, String> {
    raw.parse().map_err(|e| format!("{e}"))
}

/// One materialized result
#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    pub id: ItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponseOutput {
    pub phrase: Option<String>,
    pub site: Option<String>,
    pub total_results: usize,
    pub results: Vec<SearchResultItem>,
}

/// Explain response
#[derive(Debug, Serialize)]
pub struct ExplainOutput {
    pub index: String,
    pub filter: String,
    pub query: ContentQuery,
}

/// Build the search request from command-line arguments
pub fn build_request(args: &SearchArgs, config: &Config) -> SearchRequest {
    let params: HashMap<String, String> = args.params.iter().cloned().collect();
    let geolocation =
        args.geolocation || is_geolocation_request(&params, &config.search.geolocation_marker);

    let coordinates = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => None,
    };

    SearchRequest {
        phrase: args.phrase.clone(),
        scope: args.scope.clone(),
        language: args.language.clone(),
        sort_order: args.sort.clone(),
        page_size: args.page_size.unwrap_or(config.search.default_page_size),
        offset: args.offset,
        coordinates,
        site: args.site.clone(),
        context_item_id: args.item.clone(),
        geolocation,
        params,
    }
}

/// The configured cap, when it cuts the requested page size
pub fn capped_page_size(request: &SearchRequest, config: &Config) -> Option<usize> {
    let max = config.search.max_page_size?;
    let requested = u64::try_from(request.page_size).ok()?;
    (requested > max as u64).then_some(max)
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let fixture = ContentFixture::from_file(&args.content)?;
    let request = build_request(&args, &config);
    if let Some(max) = capped_page_size(&request, &config) {
        print_warning(&format!(
            "page size {} exceeds search.max_page_size, returning at most {}",
            request.page_size, max
        ));
    }
    let services = Services::from_fixture(config, &fixture, args.backend)?;

    if args.explain {
        let (query, index) = services.search.query(&request)?;
        let output = ExplainOutput {
            index,
            filter: query.predicate().to_string(),
            query,
        };
        print_explain(&output, format)?;
        return Ok(());
    }

    let results = services.search.search(&request)?;
    let scores: HashMap<ItemId, f32> = results
        .remaining_hits()
        .iter()
        .map(|hit| (hit.item_id.clone(), hit.score))
        .collect();

    let items: Vec<SearchResultItem> = results
        .enumerate()
        .map(|(i, item)| SearchResultItem {
            rank: i + 1,
            score: scores.get(&item.id).copied(),
            id: item.id,
            name: item.name,
        })
        .collect();

    if items.len() < scores.len() {
        print_warning(&format!(
            "{} index entries refer to missing items",
            scores.len() - items.len()
        ));
    }

    let output = SearchResponseOutput {
        phrase: request.phrase.clone(),
        site: request.site.clone(),
        total_results: items.len(),
        results: items,
    };

    match format {
        OutputFormat::Human => print_human(&output),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }

    Ok(())
}

fn print_human(output: &SearchResponseOutput) {
    let phrase = output.phrase.as_deref().unwrap_or("");
    let site = output.site.as_deref().unwrap_or("(default)");

    if output.results.is_empty() {
        println!(
            "No results found for {} on site '{}'",
            colors::label(&quoted(phrase)),
            colors::site(site)
        );
        return;
    }

    println!(
        "Found {} result(s) on '{}':\n",
        colors::number(&output.total_results.to_string()),
        colors::site(site)
    );

    for result in &output.results {
        let score = result
            .score
            .map(|s| format!("(score: {s:.2})"))
            .unwrap_or_default();
        println!(
            "[{}] {} {} {}",
            colors::rank(&result.rank.to_string()),
            result.name,
            colors::item_id(&result.id.to_string()),
            colors::dim(&score)
        );
    }
}

fn print_explain(output: &ExplainOutput, format: OutputFormat) -> serde_json::Result<()> {
    match format {
        OutputFormat::Human => {
            println!("{} {}", colors::label("Index:"), colors::site(&output.index));
            println!("{} {}", colors::label("Filter:"), colors::filter(&output.filter));
            for boost in output.query.boosts() {
                println!(
                    "{} {} {}",
                    colors::label("Boost:"),
                    colors::filter(&boost.predicate.to_string()),
                    colors::number(&format!("x{}", boost.weight))
                );
            }
            println!("{} {:?}", colors::label("Order:"), output.query.order());
            println!(
                "{} skip {}, take {}",
                colors::label("Page:"),
                output.query.skip_count(),
                output
                    .query
                    .take_count()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "all".to_string())
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(output)?),
    }
    Ok(())
}
