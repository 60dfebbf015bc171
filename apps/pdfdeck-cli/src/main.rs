//! PDF toolbox CLI.
//!
//! One subcommand per tool: the page-set transforms from pdfdeck-core plus
//! Gemini-assisted reading from pdfdeck-ai. Outputs land in the storage
//! directory (platform data dir unless `--storage-dir` says otherwise).
//! AI subcommands need an API key, from `pdfdeck settings set-key` or the
//! `GEMINI_API_KEY` environment variable, and recorded consent.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pdfdeck_core::{NumberPosition, PageRange, RotationAngle, WatermarkPosition};

mod commands;
mod state;

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pdfdeck")]
#[command(version, about = "PDF toolbox with Gemini-assisted reading")]
struct Cli {
    /// Storage directory for outputs (defaults to the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge PDF files into one document.
    Merge {
        /// Input files, merged in the order given
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
        /// Output file name
        #[arg(short, long, default_value = "merged")]
        output: String,
    },
    /// Split a PDF into one document per page range.
    Split {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Page range, repeatable; one output per range (e.g. -r 1-3 -r 4-10)
        #[arg(short, long = "range", value_name = "RANGE", required = true)]
        ranges: Vec<PageRange>,
        /// Output name per range (default: <input>_part_N)
        #[arg(short, long = "output", value_name = "NAME")]
        outputs: Vec<String>,
    },
    /// Copy selected pages into a new document.
    Extract {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Pages to copy (e.g. "1-3, 5, 8-10")
        #[arg(short, long, value_name = "PAGES")]
        pages: String,
        /// Output file name (default: <input>_extracted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Delete pages, keeping the rest in order.
    Remove {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Pages to delete (e.g. "2, 4-6")
        #[arg(short, long, value_name = "PAGES")]
        pages: String,
        /// Output file name (default: <input>_removed)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Reorder pages, optionally rotating some of them.
    Organize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Complete page order (e.g. "3,1,2")
        #[arg(long, value_name = "PAGES")]
        order: String,
        /// Rotation for an original page, repeatable (e.g. --rotate 2:90)
        #[arg(long = "rotate", value_name = "PAGE:ANGLE")]
        rotations: Vec<String>,
        /// Output file name (default: <input>_organized)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rotate pages in place.
    Rotate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Pages to rotate: "all" or a list like "1-3, 5"
        #[arg(short, long, default_value = "all", value_name = "PAGES")]
        pages: String,
        /// Rotation in degrees: 90, 180, or 270
        #[arg(short, long, value_name = "ANGLE")]
        angle: RotationAngle,
        /// Output file name (default: <input>_rotated)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Stamp a page-number label onto every page.
    PageNumbers {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Label template; {n} is the page number, {total} the page count
        #[arg(short, long, default_value = "{n}")]
        format: String,
        /// Label anchor
        #[arg(long, default_value = "bottom-center", value_name = "POSITION")]
        position: NumberPosition,
        /// Number of the first page
        #[arg(long, default_value_t = 1, value_name = "N")]
        start: u32,
        /// Output file name (default: <input>_numbered)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Stamp a text watermark onto selected pages.
    Watermark {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Watermark text
        #[arg(short, long)]
        text: String,
        /// Opacity between 0 and 1
        #[arg(long, default_value_t = 0.3)]
        opacity: f64,
        /// Placement
        #[arg(long, default_value = "center", value_name = "POSITION")]
        position: WatermarkPosition,
        /// Rotation of the text in degrees
        #[arg(long, default_value_t = 0.0, value_name = "DEGREES")]
        rotation: f64,
        /// Pages to stamp: "all" or a list like "1-3, 5"
        #[arg(short, long, default_value = "all", value_name = "PAGES")]
        pages: String,
        /// Output file name (default: <input>_watermarked)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show page count, page sizes, and file details.
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// List the available tools.
    Tools,
    /// Extract the text content of a PDF.
    ExtractText {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write the text here instead of printing it
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Summarize a PDF with Gemini.
    Summarize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Translate a PDF's text with Gemini.
    Translate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Target language (e.g. "French")
        #[arg(long = "to", value_name = "LANGUAGE")]
        language: String,
    },
    /// Generate study questions about a PDF with Gemini.
    Questions {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// How many questions to ask for
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Ask a question about a PDF; its text is sent along as context.
    Ask {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "PROMPT")]
        prompt: String,
    },
    /// List the Gemini models available to the configured key.
    Models,
    /// Show or change stored settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Show the current settings.
    Show,
    /// Store the Gemini API key.
    SetKey {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Remove the stored API key.
    ClearKey,
    /// Select the Gemini model.
    SetModel {
        #[arg(value_name = "MODEL")]
        model: String,
    },
    /// Allow or forbid sending document text to Gemini.
    Consent {
        #[arg(value_name = "true|false", action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Keep stdout for command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut state = AppState::init(cli.storage_dir)?;

    match cli.command {
        Commands::Merge { files, output } => commands::pdf::merge(&state, &files, output),
        Commands::Split {
            file,
            ranges,
            outputs,
        } => commands::pdf::split(&state, &file, ranges, outputs),
        Commands::Extract {
            file,
            pages,
            output,
        } => commands::pdf::extract(&state, &file, &pages, output),
        Commands::Remove {
            file,
            pages,
            output,
        } => commands::pdf::remove(&state, &file, &pages, output),
        Commands::Organize {
            file,
            order,
            rotations,
            output,
        } => commands::pdf::organize(&state, &file, &order, &rotations, output),
        Commands::Rotate {
            file,
            pages,
            angle,
            output,
        } => commands::pdf::rotate(&state, &file, &pages, angle, output),
        Commands::PageNumbers {
            file,
            format,
            position,
            start,
            output,
        } => commands::pdf::page_numbers(&state, &file, format, position, start, output),
        Commands::Watermark {
            file,
            text,
            opacity,
            position,
            rotation,
            pages,
            output,
        } => commands::pdf::watermark(
            &state, &file, text, opacity, position, rotation, &pages, output,
        ),
        Commands::Info { file, json } => commands::pdf::info(&file, json),
        Commands::Tools => commands::pdf::tools(),
        Commands::ExtractText { file, output } => commands::ai::extract_text(&file, output),
        Commands::Summarize { file } => commands::ai::summarize(&state, &file).await,
        Commands::Translate { file, language } => {
            commands::ai::translate(&state, &file, &language).await
        }
        Commands::Questions { file, count } => {
            commands::ai::questions(&state, &file, count).await
        }
        Commands::Ask { file, prompt } => commands::ai::ask(&state, &file, &prompt).await,
        Commands::Models => commands::ai::models(&state).await,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&state),
            SettingsAction::SetKey { key } => commands::settings::set_key(&mut state, key),
            SettingsAction::ClearKey => commands::settings::clear_key(&mut state),
            SettingsAction::SetModel { model } => commands::settings::set_model(&mut state, model),
            SettingsAction::Consent { enabled } => commands::settings::consent(&mut state, enabled),
        },
    }
}
