//! # kbrender
//!
//! Renders help-center article content to the terminal.
//!
//! ## Usage
//!
//! Styled output for a markdown or editor JSON file:
//! ```sh
//! kbrender article.md
//! ```
//!
//! Rendered block descriptors as JSON:
//! ```sh
//! kbrender state.json -o json
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, OutputFormat};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use kbrender::{Article, Config, RenderedOutput, ThemeName, render, render_article};
use std::io::{self, Write};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    init_tracing(args.log_level());

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    // Apply theme override from CLI if provided
    if let Some(ref theme_name) = args.theme {
        if theme_name.parse::<ThemeName>().is_err() {
            warn!(theme = %theme_name, "unknown theme, using {}", ThemeName::default());
        }
        config.ui.theme = theme_name.clone();
    }
    let theme = config.theme();

    let content = cli::read_input(args.file.as_deref())?;
    let output = if args.article {
        let article: Article =
            serde_json::from_str(&content).wrap_err("input is not an article payload")?;
        debug!(title = ?article.title, "rendering article");
        render_article(&article, &theme)
    } else {
        render(&content, args.format.or(config.render.default_format), &theme)
    };

    write_output(&output, args.output)
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn write_output(output: &RenderedOutput, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout().lock();
    match format {
        OutputFormat::Ansi => kbrender::adapters::ansi::write_ansi(output, stdout)?,
        OutputFormat::Plain => {
            let mut stdout = stdout;
            writeln!(stdout, "{}", output.plain_text())?;
        }
        OutputFormat::Json => {
            let mut stdout = stdout;
            serde_json::to_writer_pretty(&mut stdout, output)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
