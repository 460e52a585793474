use clap::{Parser, ValueEnum};
use kbrender::FormatHint;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kbrender")]
#[command(version)]
#[command(about = "Render help-center article content as styled terminal text")]
#[command(
    long_about = "kbrender - renders knowledge-base article content (rich-text editor JSON or\n\
    markdown) into styled output.\n\n\
    The input format is detected from the content unless --format is given.\n\n\
    Examples:\n  \
    kbrender article.md                # Styled terminal output\n  \
    kbrender state.json -o json        # Render descriptors as JSON\n  \
    kbrender --article refund.json     # Article payload with lexicalContent\n  \
    cat notes.md | kbrender -o plain   # Plain text from stdin"
)]
pub struct Cli {
    /// Input file, or '-' for stdin
    ///
    /// If no file is specified and stdin is piped, input is read from stdin.
    pub file: Option<PathBuf>,

    /// Input format (detected from the content when omitted)
    ///
    ///   document - rich-text editor JSON with a root node
    ///   markdown - markdown subset
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<FormatHint>,

    /// Treat the input as an article JSON payload
    ///
    /// The payload carries `content` (markdown) and optionally
    /// `lexicalContent` (editor JSON). The editor JSON wins when non-empty.
    #[arg(long = "article", conflicts_with = "format")]
    pub article: bool,

    /// Output format
    ///
    ///   ansi  - styled terminal text (default)
    ///   plain - unstyled text
    ///   json  - rendered block descriptors
    #[arg(short = 'o', long = "output", default_value = "ansi")]
    pub output: OutputFormat,

    /// Theme to render with (Light, Dark)
    ///
    /// Overrides the theme saved in the config file.
    #[arg(long = "theme", value_name = "THEME")]
    pub theme: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    ///
    /// RUST_LOG takes precedence when set.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Styled terminal output
    Ansi,
    /// Plain text output
    Plain,
    /// JSON output
    Json,
}

impl Cli {
    /// Log level used when RUST_LOG is not set
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
