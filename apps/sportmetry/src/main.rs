//! # Sportmetry
//!
//! The command-line front end of the Sportmetry assessment engines.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                apps/sportmetry (THE BINARY)              │
//! │                                                          │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────┐  │
//! │  │    CLI      │   │ File loading │   │    Labels    │  │
//! │  │   (clap)    │   │ (JSON, TOML) │   │   (hu/en)    │  │
//! │  └──────┬──────┘   └──────┬───────┘   └──────┬───────┘  │
//! │         └─────────────────┼──────────────────┘          │
//! │                           ▼                             │
//! │                 ┌──────────────────┐                    │
//! │                 │ sportmetry-core  │                    │
//! │                 │   (THE LOGIC)    │                    │
//! │                 └──────────────────┘                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! sportmetry anthro --records cohort.json --tables reference.json --lang en
//! sportmetry sociogram --roster team.json --responses answers.json --questions 1,2
//! sportmetry verify --input cohort.spmx
//! ```

use clap::Parser;
use sportmetry::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // SPORTMETRY_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("SPORTMETRY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sportmetry=info".into());

    // Logs go to stderr so that report output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
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

/// Print the Sportmetry startup banner.
fn print_banner() {
    println!(
        r#"
  Sportmetry v{}

  Anthropometry • Sociometry • Readiness
"#,
        env!("CARGO_PKG_VERSION")
    );
}
