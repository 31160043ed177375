//! Command-line interface definition using clap.
//!
//! This module defines [`Args`], the argument structure of the `chatflat`
//! binary, and the conversions from arguments to library types:
//!
//! ```rust
//! use clap::Parser;
//! use chatflat::cli::Args;
//!
//! let args = Args::parse_from(["chatflat", "export", "-k", "rust,java", "-k", "go", "-s", "2025-01-01"]);
//!
//! let params = args.filter_params();
//! assert_eq!(params.keywords.as_deref(), Some("rust,java,go"));
//! assert_eq!(params.start_date.as_deref(), Some("2025-01-01"));
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::core::filter::FilterParams;

/// File looked up when the input is a directory.
pub const DEFAULT_EXPORT_FILE: &str = "result.json";

/// Default output path.
pub const DEFAULT_OUTPUT: &str = "chatflat_output.txt";

/// Flatten a Telegram chat export into one dated line per message.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatflat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatflat ./ChatExport_2025-06-24
    chatflat result.json -o chat.txt
    chatflat result.json -s 2025-06-01 -e 2025-06-30
    chatflat result.json -k release,deploy -x draft
    chatflat -i ./ChatExport_2025-06-24 --keyword release --exclude draft")]
pub struct Args {
    /// Export file, or a directory containing result.json
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Same as INPUT; takes precedence when both are given
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_path: Option<PathBuf>,

    /// Path to output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Keep messages on or after this date (YYYY-MM-DD)
    #[arg(short = 's', long = "start-date", value_name = "DATE")]
    pub start_date: Option<String>,

    /// Keep messages on or before this date (YYYY-MM-DD)
    #[arg(short = 'e', long = "end-date", value_name = "DATE")]
    pub end_date: Option<String>,

    /// Keep messages containing any of these comma-separated keywords
    #[arg(short = 'k', long = "keyword", visible_alias = "keywords", value_name = "KEYWORDS")]
    pub keywords: Vec<String>,

    /// Drop messages containing any of these comma-separated keywords
    #[arg(
        short = 'x',
        long = "exclude",
        visible_alias = "exclude-keywords",
        value_name = "KEYWORDS"
    )]
    pub exclude_keywords: Vec<String>,

    /// Print details and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The export file to read: the input itself, or `result.json` inside it
    /// when the input is a directory.
    pub fn input_file(&self) -> PathBuf {
        resolve_input(self.input_path.as_deref().unwrap_or(&self.input))
    }

    /// Filter parameters from the date and keyword flags.
    ///
    /// Repeated keyword flags are joined into one comma-separated list.
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            keywords: join_lists(&self.keywords),
            exclude_keywords: join_lists(&self.exclude_keywords),
        }
    }
}

/// Resolves a directory argument to the export file inside it.
pub fn resolve_input(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.join(DEFAULT_EXPORT_FILE)
    } else {
        input.to_path_buf()
    }
}

fn join_lists(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}
