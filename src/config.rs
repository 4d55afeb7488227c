use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::logger::level_from_verbosity;

/// Command line flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "gofront")]
#[command(about = "Scanner, parser and name resolver for a Go subset", long_about = None)]
pub struct Args {
    /// Print the token stream, stopping at the first illegal token
    #[arg(long, conflicts_with_all = ["ast", "resolve"])]
    pub lex: bool,

    /// Print the syntax tree of every top-level declaration
    #[arg(long, conflicts_with = "resolve")]
    pub ast: bool,

    /// Resolve names and report declaration errors (the default)
    #[arg(long)]
    pub resolve: bool,

    /// Source file to read
    #[arg(long, value_name = "FILE", default_value = "input.txt")]
    pub source: PathBuf,

    /// Print tokens and trees as JSON
    #[arg(long)]
    pub json: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Lex,
    Ast,
    Resolve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tree,
    Json,
}

/// What one run of the front end does.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    pub mode: Mode,
    pub format: OutputFormat,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn new(source: impl Into<PathBuf>, mode: Mode) -> Self {
        Config {
            source: source.into(),
            mode,
            format: OutputFormat::Tree,
            log_level: LevelFilter::WARN,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mode = if args.lex {
            Mode::Lex
        } else if args.ast {
            Mode::Ast
        } else {
            Mode::Resolve
        };

        let format = if args.json {
            OutputFormat::Json
        } else {
            OutputFormat::Tree
        };

        Config {
            source: args.source,
            mode,
            format,
            log_level: level_from_verbosity(args.verbose),
        }
    }
}
