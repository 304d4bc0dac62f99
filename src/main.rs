//! Markpane - a split-pane terminal editor with live preview.
//!
//! # Usage
//!
//! ```bash
//! markpane notes.md
//! markpane data.csv --separator semicolon
//! markpane --mode html --sample
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use markpane::app::{App, ContentMode, LayoutMode};
use markpane::config::{self, ConfigLayer, ThemeMode, global_config_path, save_layer};
use markpane::highlight::{HighlightBackground, set_background_mode};
use markpane::tabular::Separator;

/// A split-pane terminal editor with live markdown, CSV, and HTML preview
#[derive(Parser, Debug)]
#[command(name = "markpane", version, about, long_about = None)]
struct Cli {
    /// File to load into the editor
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Content mode (inferred from the file extension when omitted)
    #[arg(short, long, value_enum)]
    mode: Option<ContentMode>,

    /// Initial pane layout
    #[arg(short, long, value_enum, default_value = "split")]
    layout: LayoutMode,

    /// Field separator for csv mode
    #[arg(short, long, value_enum)]
    separator: Option<Separator>,

    /// Delay in milliseconds between the last edit and diagram rendering
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Draw diagrams with plain ASCII instead of box-drawing characters
    #[arg(long)]
    ascii_diagrams: bool,

    /// Force syntax highlight theme background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Start with the sample document for the chosen mode
    #[arg(long)]
    sample: bool,

    /// Save the current flags as defaults in the global config
    #[arg(long)]
    save: bool,
}

/// Extension-based mode inference for files loaded from the CLI.
fn infer_mode(path: &Path) -> ContentMode {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv" | "tsv") => ContentMode::Csv,
        Some("html" | "htm") => ContentMode::Html,
        _ => ContentMode::Markdown,
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cli_layer = ConfigLayer {
        separator: cli.separator,
        debounce_ms: cli.debounce_ms,
        ascii_diagrams: cli.ascii_diagrams.then_some(true),
        theme: cli.theme,
    };
    if cli.save {
        save_layer(&global_config_path(), &cli_layer)?;
    }
    let settings = config::resolve(&cli_layer);

    match settings.theme {
        ThemeMode::Auto => set_background_mode(None),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let mode = cli
        .mode
        .or_else(|| cli.file.as_deref().map(infer_mode))
        .unwrap_or(ContentMode::Markdown);

    let initial_text = if let Some(path) = &cli.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else if cli.sample {
        markpane::samples::for_mode(mode).to_string()
    } else {
        String::new()
    };

    let mut app = App::new(initial_text, mode)
        .with_layout(cli.layout)
        .with_separator(settings.separator)
        .with_debounce_ms(settings.debounce_ms)
        .with_ascii_diagrams(settings.ascii_diagrams);

    app.run().context("Application error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_inferred_from_extension() {
        assert_eq!(infer_mode(Path::new("data.csv")), ContentMode::Csv);
        assert_eq!(infer_mode(Path::new("page.html")), ContentMode::Html);
        assert_eq!(infer_mode(Path::new("notes.md")), ContentMode::Markdown);
        assert_eq!(infer_mode(Path::new("no_extension")), ContentMode::Markdown);
    }
}
