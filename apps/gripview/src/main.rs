//! # gripview - Debugger Object Inspector
//!
//! The main binary for the gripview inspection engine.
//!
//! This application provides:
//! - Snapshot inspection (the lazy tree of a recorded debugger session)
//! - Bucket layouts of large arrays
//! - Source-mapped expression renaming
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    apps/gripview (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │   CLI       │    │   Config    │    │    Renderers     │   │
//! │  │  (clap)     │    │   (toml)    │    │  (text / json)   │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘   │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                   ┌────────┴─────────┐                         │
//! │                   ▼                  ▼                         │
//! │          ┌───────────────┐  ┌───────────────────┐              │
//! │          │ gripview-core │  │ gripview-bindings │              │
//! │          │  (THE TREE)   │  │   (tree-sitter)   │              │
//! │          └───────────────┘  └───────────────────┘              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! gripview inspect -s snapshot.json -d 2
//! gripview buckets -l 12345
//! gripview rename -e "first * second" -s scopes.json
//! ```

use clap::Parser;
use gripview::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // GRIPVIEW_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRIPVIEW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gripview=info".into());

    // Logs go to stderr so stdout stays clean for --json-mode.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the gripview startup banner.
fn print_banner() {
    println!(
        r#"
  gripview v{}
  Lazy object inspection for debugger snapshots
"#,
        env!("CARGO_PKG_VERSION")
    );
}
