//! # Sportmetry CLI Module
//!
//! This module implements the CLI interface for Sportmetry.
//!
//! ## Available Commands
//!
//! - `anthro` - Compute anthropometric metrics for a cohort
//! - `sociogram` - Analyze a sociometric choice network
//! - `lookup` - Run one reference-table range lookup
//! - `readiness` - Score I-PRRS readiness and AFAQ fear avoidance
//! - `motivation` - Score a forced-choice sport motivation questionnaire
//! - `verify` - Validate a canonical report file and print its BLAKE3 hash

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use sportmetry_core::SportmetryError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Sportmetry - athlete assessment toolkit
///
/// Deterministic anthropometric, sociometric and questionnaire scoring
/// over plain JSON inputs.
#[derive(Parser, Debug)]
#[command(name = "sportmetry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the TOML configuration (falls back to $SPORTMETRY_CONFIG)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute anthropometric metrics for every record of a cohort
    Anthro {
        /// JSON array of measurement records
        #[arg(short, long)]
        records: PathBuf,

        /// JSON reference tables ({"boys": [...], "girls": [...]})
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file format (json, canonical)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,

        /// Label language (hu, en)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Analyze a sociometric choice network
    Sociogram {
        /// JSON array of member names
        #[arg(short, long)]
        roster: PathBuf,

        /// JSON array of choice responses
        #[arg(short = 'R', long)]
        responses: PathBuf,

        /// Questions aggregated into the network (comma-separated)
        #[arg(short = 'Q', long, value_delimiter = ',', required = true)]
        questions: Vec<u32>,

        /// Sympathy-type questions for significance scoring
        #[arg(long, value_delimiter = ',')]
        sympathy: Vec<u32>,

        /// Functional-type questions for significance scoring
        #[arg(long, value_delimiter = ',')]
        functional: Vec<u32>,

        /// Also report every question on its own
        #[arg(long)]
        per_question: bool,

        /// Write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file format (json, canonical)
        #[arg(short = 'f', long, default_value = "json")]
        format: String,

        /// Label language (hu, en)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Run one reference-table range lookup
    Lookup {
        /// JSON reference tables ({"boys": [...], "girls": [...]})
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Sex token selecting the table
        #[arg(short, long)]
        sex: String,

        /// Key and value columns as `key:value`
        #[arg(short = 'p', long)]
        column_pair: String,

        /// Query value
        #[arg(short = 'x', long, allow_negative_numbers = true)]
        value: f64,
    },

    /// Score I-PRRS readiness and AFAQ fear avoidance
    Readiness {
        /// JSON answers ({"iprrs": [...], "afaq": [...]})
        #[arg(short, long)]
        answers: PathBuf,

        /// Label language (hu, en)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Score a forced-choice sport motivation questionnaire
    Motivation {
        /// JSON item key ([{"first": "extrinsic", "second": "amotivation"}, ...])
        #[arg(short, long)]
        items: PathBuf,

        /// JSON array of answers (1, 2 or null)
        #[arg(short, long)]
        answers: PathBuf,

        /// Label language (hu, en)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Validate a canonical report file
    Verify {
        /// Canonical report file
        #[arg(short, long)]
        input: PathBuf,

        /// Expected BLAKE3 hex digest
        #[arg(long)]
        hash: Option<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), SportmetryError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    if cli.verbose {
        tracing::info!("Engine configuration: {:?}", config.engine);
    }

    match cli.command {
        Commands::Anthro {
            records,
            tables,
            output,
            format,
            lang,
        } => {
            let options = OutputOptions::new(output, &format, lang.as_deref(), &config)?;
            let tables = resolve_tables(tables, &config)?;
            cmd_anthro(&config, json_mode, &records, &tables, &options)
        }
        Commands::Sociogram {
            roster,
            responses,
            questions,
            sympathy,
            functional,
            per_question,
            output,
            format,
            lang,
        } => {
            let options = OutputOptions::new(output, &format, lang.as_deref(), &config)?;
            let request = build_request(&questions, &sympathy, &functional, per_question);
            cmd_sociogram(&config, json_mode, &roster, &responses, &request, &options)
        }
        Commands::Lookup {
            tables,
            sex,
            column_pair,
            value,
        } => {
            let tables = resolve_tables(tables, &config)?;
            cmd_lookup(json_mode, &tables, &sex, &column_pair, value)
        }
        Commands::Readiness { answers, lang } => {
            let lang = resolve_lang(lang.as_deref(), &config)?;
            cmd_readiness(json_mode, &answers, lang)
        }
        Commands::Motivation {
            items,
            answers,
            lang,
        } => {
            let lang = resolve_lang(lang.as_deref(), &config)?;
            cmd_motivation(json_mode, &items, &answers, lang)
        }
        Commands::Verify { input, hash } => cmd_verify(json_mode, &input, hash.as_deref()),
    }
}

/// `--tables` or the configured default.
fn resolve_tables(tables: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf, SportmetryError> {
    tables.or_else(|| config.tables.clone()).ok_or_else(|| {
        SportmetryError::IoError(
            "No reference tables given. Use --tables or set `tables` in the config".to_string(),
        )
    })
}
