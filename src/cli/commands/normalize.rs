//! Normalize command - show how a phrase is cleaned before matching

use crate::cli::output::{colors, quoted};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::search::PhraseNormalizer;
use clap::Args;
use serde::Serialize;

/// Arguments for the normalize command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Phrase to normalize
    pub phrase: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeOutput {
    pub phrase: String,
    pub normalized: String,
    pub terms: Vec<String>,
}

/// Execute the normalize command
pub fn execute(
    args: NormalizeArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = config
        .search
        .reserved_characters
        .as_deref()
        .map(PhraseNormalizer::with_characters)
        .unwrap_or_default();

    let normalized = normalizer.normalize(Some(&args.phrase));
    let output = NormalizeOutput {
        terms: normalized.split_whitespace().map(str::to_string).collect(),
        normalized,
        phrase: args.phrase,
    };

    match format {
        OutputFormat::Human => {
            println!("{} {}", colors::label("Phrase:"), quoted(&output.phrase));
            println!("{} {}", colors::label("Normalized:"), quoted(&output.normalized));
            if output.terms.is_empty() {
                println!("{} {}", colors::label("Terms:"), colors::dim("(none)"));
            } else {
                println!("{} {}", colors::label("Terms:"), output.terms.join(", "));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }

    Ok(())
}
