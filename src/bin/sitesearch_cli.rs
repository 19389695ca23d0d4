//! sitesearch CLI - compose and run site searches from the command line
//!
//! # Examples
//!
//! ```bash
//! # Search a content fixture
//! sitesearch search "coffee shop" --content content.json --site store1
//!
//! # Show the composed query without running it
//! sitesearch search "coffee" --content content.json --site store1 --explain
//!
//! # See how a phrase is cleaned
//! sitesearch normalize "coffee-shop (downtown)"
//!
//! # Show configuration
//! sitesearch show-config
//! ```

use clap::Parser;
use sitesearch::cli::{exit_code, run, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(exit_code(e.as_ref()));
    }
}
