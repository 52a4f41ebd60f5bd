use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::batch::ErrorPolicy;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
PAIRS FILE:
  One comparison per line, two whitespace-separated paths to .py files.
  Blank lines and lines starting with '#' are ignored.

CONFIGURATION FILE (.pyplag.toml):
  Looked up from the pairs file's directory upwards. [tool.pyplag] in
  pyproject.toml is also read. Command-line flags take precedence.

  [pyplag]
  on_error = \"abort\"          # abort | skip
  precision = 2               # Decimal places per score
  highlight = 0.8             # Report scores >= this in red
  max_chars = 200000          # Refuse larger canonical forms
  jobs = 4                    # Worker threads (default: one per core)
  check_extensions = true     # Require *.py sources and *.txt files
  relative_to_manifest = false
";

/// Options that control how a batch is compared.
#[derive(Args, Debug, Default, Clone)]
pub struct BatchArgs {
    /// What to do when a pair cannot be scored [default: abort].
    #[arg(long, value_enum)]
    pub on_error: Option<ErrorPolicy>,

    /// Decimal places written per score [default: 2].
    #[arg(long)]
    pub precision: Option<usize>,

    /// Refuse files whose canonical form is longer than N characters.
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,

    /// Number of worker threads (defaults to one per core).
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Highlight scores at or above this value in the report [default: 0.8].
    #[arg(long)]
    pub highlight: Option<f64>,

    /// Resolve relative paths in the pairs file against its directory
    /// instead of the current directory.
    #[arg(long)]
    pub relative_to_manifest: bool,

    /// Accept file names without the `.py` / `.txt` extensions.
    #[arg(long)]
    pub no_extension_check: bool,
}

/// Options for output formatting and verbosity.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Print the full report as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output for debugging (shows files being compared).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: write the scores file and print nothing else.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pyplag - Structural similarity scores for pairs of Python files",
    long_about = None,
    after_help = CONFIG_HELP,
    subcommand_negates_reqs = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    /// Single-file and single-pair helpers.
    pub command: Option<Commands>,

    /// Text file listing the pairs to compare.
    #[arg(required = true, value_name = "PAIRS_FILE")]
    pub pairs_file: Option<PathBuf>,

    /// Text file the scores are written to, one per line.
    #[arg(required = true, value_name = "SCORES_FILE")]
    pub scores_file: Option<PathBuf>,

    /// Batch comparison options.
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Subcommand, Debug)]
/// Available subcommands.
pub enum Commands {
    /// Print the canonical form of one Python file
    Dump {
        /// The file to canonicalize.
        file: PathBuf,

        /// Accept a file name without the `.py` extension.
        #[arg(long)]
        no_extension_check: bool,
    },
    /// Score a single pair of Python files
    Compare {
        /// First file.
        left: PathBuf,

        /// Second file.
        right: PathBuf,

        /// Decimal places for the score [default: 2].
        #[arg(long)]
        precision: Option<usize>,

        /// Output JSON with the edit distance and both lengths.
        #[arg(long)]
        json: bool,

        /// Accept file names without the `.py` extension.
        #[arg(long)]
        no_extension_check: bool,
    },
}
