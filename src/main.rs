//! Crux CLI - text and PDF summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use crux::flow::MAX_CHARS;
use crux::logging::{self, LogTarget};
use crux::{ui, Backend, Config, DocumentSummaryFlow, TextSummaryFlow};
use dialoguer::Confirm;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "crux")]
#[command(author, version, about = "TUI for text and PDF summarisation", long_about = None)]
struct Cli {
    /// Path to a crux.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Open the TUI with this PDF already selected
    #[arg(long)]
    file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise text from an argument, $EDITOR or stdin
    Text {
        /// Text to summarise
        text: Option<String>,
        /// Compose the text in $EDITOR
        #[arg(long, conflicts_with = "text")]
        edit: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise a PDF document
    Document {
        /// Path to the PDF
        path: PathBuf,
        /// Skip the extracted text
        #[arg(long)]
        summary_only: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Text { text, edit, json }) => {
            let (config, backend, _guard) = setup(cli.config, LogTarget::Stderr)?;
            summarise_text(&config, &backend, text, edit, json).await?;
        }
        Some(Commands::Document {
            path,
            summary_only,
            json,
        }) => {
            let (config, backend, _guard) = setup(cli.config, LogTarget::Stderr)?;
            summarise_document(&config, &backend, path, summary_only, json).await?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "crux", &mut io::stdout());
        }
        None => {
            // Default: Launch the TUI
            let (config, backend, _guard) = setup(cli.config, LogTarget::File)?;
            ui::run(&config, backend, cli.file).await?;
        }
    }

    Ok(())
}

/// Load config, start logging and build the backend client
fn setup(
    config_path: Option<PathBuf>,
    target: LogTarget,
) -> anyhow::Result<(Config, Backend, Option<WorkerGuard>)> {
    let config = Config::load(config_path.as_deref())?;
    let guard = logging::init(&config.logging, target)?;
    let backend = Backend::from_config(&config.backend)?;
    tracing::debug!(base_url = %config.backend.base_url, "backend configured");
    Ok((config, backend, guard))
}

async fn summarise_text(
    config: &Config,
    backend: &Backend,
    text: Option<String>,
    edit: bool,
    json: bool,
) -> anyhow::Result<()> {
    let content = fit_to_cap(read_text_input(text, edit)?)?;
    let mut flow = TextSummaryFlow::new().with_error_detail(config.backend.show_error_detail);

    eprintln!(
        "{}",
        format!("Summarising {} characters...", content.chars().count()).dimmed()
    );

    if flow.submit(&content, backend).await.is_err() {
        anyhow::bail!("{}", flow.error_message().red());
    }

    if json {
        if let Some(result) = flow.phase().result() {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        return Ok(());
    }

    println!("{}", "💡 Summary:".bold());
    println!("  {}", flow.summary());
    Ok(())
}

async fn summarise_document(
    config: &Config,
    backend: &Backend,
    path: PathBuf,
    summary_only: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut flow = DocumentSummaryFlow::new().with_error_detail(config.backend.show_error_detail);

    if flow.select_path(&path).is_err() {
        anyhow::bail!("{}", flow.error_message().red());
    }
    if let Some(file) = flow.selected_file() {
        eprintln!(
            "{}",
            format!("Uploading {} ({} bytes)...", file.name, file.size()).dimmed()
        );
    }

    if flow.submit(backend).await.is_err() {
        anyhow::bail!("{}", flow.error_message().red());
    }

    if json {
        if let Some(result) = flow.phase().result() {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        return Ok(());
    }

    if flow.phase().result().map_or(true, |r| r.is_empty()) {
        println!("{}", "The backend returned an empty result.".yellow());
        return Ok(());
    }

    if let Some(text) = flow.extracted_text().filter(|_| !summary_only) {
        println!("{}", "📄 Extracted Text:".bold());
        println!("{}\n", text.trim_end());
    }
    if let Some(summary) = flow.summary() {
        println!("{}", "💡 Summary:".bold());
        println!("  {}", summary);
    }
    Ok(())
}

/// Text from the argument, the editor, or piped stdin, in that order
fn read_text_input(text: Option<String>, edit: bool) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if edit {
        return Ok(edit::edit("")?);
    }
    if !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    anyhow::bail!("no text given: pass TEXT, use --edit, or pipe text on stdin")
}

/// Offer to truncate over-long text when someone is at the terminal.
///
/// Piped input is passed through unchanged and rejected by the flow.
fn fit_to_cap(content: String) -> anyhow::Result<String> {
    let len = content.chars().count();
    if len <= MAX_CHARS || !atty::is(atty::Stream::Stdin) {
        return Ok(content);
    }

    let truncate = Confirm::new()
        .with_prompt(format!(
            "Text is {} characters; keep only the first {}?",
            len, MAX_CHARS
        ))
        .default(true)
        .interact()?;

    Ok(if truncate {
        content.chars().take(MAX_CHARS).collect()
    } else {
        content
    })
}
