//! Command line argument parsing for the Pilum CLI using clap.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Pilum - index JSONL documents and search them from the command line
#[derive(Parser, Debug, Clone)]
#[command(name = "pilum")]
#[command(about = "Index JSONL documents and search them from the command line")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PilumArgs {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PilumArgs {
    /// Get the effective verbosity level: 0 quiet, 1 normal, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// The log level matching the verbosity flags.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity() {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index the documents of a JSONL file
    Index(IndexArgs),

    /// Search an index
    Search(SearchArgs),
}

/// Arguments for indexing documents
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_DIR")]
    pub index_path: PathBuf,

    /// JSONL file with one document per line
    #[arg(value_name = "DOCS_JSONL")]
    pub docs_path: PathBuf,

    /// Schema file (JSON); required when the index does not exist yet
    #[arg(short, long, env = "PILUM_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Discard any existing index in INDEX_DIR
    #[arg(short, long)]
    pub create: bool,

    /// Commit after every N documents
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub commit_every: Option<u64>,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Arguments for searching an index
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_DIR")]
    pub index_path: PathBuf,

    /// Term clause, FIELD=TERM (repeatable)
    #[arg(short, long = "term", value_name = "FIELD=TERM")]
    pub terms: Vec<TermArg>,

    /// Numeric range clause, FIELD=LOW..HIGH, `*` for an open end (repeatable)
    #[arg(short, long = "range", value_name = "FIELD=LOW..HIGH")]
    pub ranges: Vec<RangeArg>,

    /// Hits shown per page
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    pub hits_per_page: u64,

    /// Print only doc ids and scores
    #[arg(long)]
    pub raw: bool,

    /// Page through the results reading commands from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Scoring function
    #[arg(long, default_value = "tf-idf")]
    pub scorer: ScorerKind,

    /// Fail on clauses naming a field the index does not know
    #[arg(long)]
    pub strict_fields: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

/// Analyzer selection shared by indexing and searching.
///
/// Analyzers are not stored in the index, so searches should be given the
/// same selection the documents were indexed with.
#[derive(Parser, Debug, Clone)]
pub struct AnalysisArgs {
    /// Analyzer for a text field, FIELD=NAME (standard, simple, whitespace, keyword)
    #[arg(short, long = "analyzer", value_name = "FIELD=NAME")]
    pub analyzers: Vec<FieldAnalyzerArg>,

    /// Analyzer for text fields without an explicit one
    #[arg(long, default_value = "standard")]
    pub default_analyzer: String,
}

/// A `FIELD=TERM` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct TermArg {
    pub field: String,
    pub term: String,
}

impl FromStr for TermArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, term) = split_field(s)?;
        Ok(TermArg {
            field: field.to_string(),
            term: term.to_string(),
        })
    }
}

/// A `FIELD=LOW..HIGH` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeArg {
    pub field: String,
    pub low: f64,
    pub high: f64,
}

impl FromStr for RangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, bounds) = split_field(s)?;
        let (low, high) = bounds
            .split_once("..")
            .ok_or_else(|| format!("expected LOW..HIGH, got '{bounds}'"))?;

        Ok(RangeArg {
            field: field.to_string(),
            low: parse_bound(low, f64::NEG_INFINITY)?,
            high: parse_bound(high, f64::INFINITY)?,
        })
    }
}

/// A `FIELD=NAME` analyzer assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAnalyzerArg {
    pub field: String,
    pub analyzer: String,
}

impl FromStr for FieldAnalyzerArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, analyzer) = split_field(s)?;
        Ok(FieldAnalyzerArg {
            field: field.to_string(),
            analyzer: analyzer.to_string(),
        })
    }
}

fn split_field(s: &str) -> Result<(&str, &str), String> {
    match s.split_once('=') {
        Some((field, rest)) if !field.is_empty() => Ok((field, rest)),
        _ => Err(format!("expected FIELD=VALUE, got '{s}'")),
    }
}

fn parse_bound(bound: &str, open: f64) -> Result<f64, String> {
    let bound = bound.trim();
    if bound.is_empty() || bound == "*" {
        return Ok(open);
    }
    let value: f64 = bound
        .parse()
        .map_err(|_| format!("invalid numeric bound '{bound}'"))?;
    if value.is_nan() {
        return Err("range bounds must not be NaN".to_string());
    }
    Ok(value)
}

/// Scoring functions selectable from the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    /// sqrt(tf) * idf^2
    TfIdf,
    /// Every match scores 1
    Constant,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
