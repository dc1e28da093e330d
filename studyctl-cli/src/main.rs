//! studyctl CLI - participant log batch conversion
//!
//! This is the entry point for the studyctl command-line tool, which converts
//! per-participant study logs (JSON stored as .txt) into derived artifacts:
//! - `messages`: one timestamped chat-message CSV per participant
//! - `texts`: one cleaned plain-text file per participant (final editor content)
//! - `merge`: join extracted texts into an existing CSV dataset by ID column

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use studyctl_core::{
    export_messages, extract_texts, merge_text_column, ExportOptions, ExtractOptions, MergeOptions,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "studyctl",
    author,
    version,
    about = "Convert participant study logs (JSON) into per-participant CSV and plain-text files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export each log's chat messages to {id}_messages.csv
    Messages(MessagesArgs),
    /// Extract each log's final editor content to {id}.txt
    Texts(TextsArgs),
    /// Merge extracted texts into a CSV dataset by identifier column
    Merge(MergeArgs),
}

#[derive(Parser, Debug)]
struct MessagesArgs {
    /// Input directory containing raw .txt logs
    #[arg(long = "in", value_name = "DIR")]
    input: PathBuf,

    /// Output directory for per-participant CSV files
    #[arg(long = "out", value_name = "DIR")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct TextsArgs {
    /// Input directory containing raw .txt logs
    #[arg(long = "in", value_name = "DIR")]
    input: PathBuf,

    /// Output directory for per-participant plain-text files
    #[arg(long = "out", value_name = "DIR")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Existing CSV dataset to augment
    #[arg(long, value_name = "PATH")]
    dataset: PathBuf,

    /// Directory holding extracted {id}.txt files
    #[arg(long = "texts", value_name = "DIR")]
    text_dir: PathBuf,

    /// Output path for the augmented dataset
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Column holding participant identifiers
    #[arg(long = "id-column", value_name = "NAME", default_value = "code")]
    id_column: String,

    /// Column to append with the matched text
    #[arg(long = "text-column", value_name = "NAME", default_value = "text")]
    text_column: String,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

fn main() -> Result<()> {
    init_tracing().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Messages(args) => run_messages(args)?,
        Commands::Texts(args) => run_texts(args)?,
        Commands::Merge(args) => run_merge(args)?,
    }
    Ok(())
}

fn run_messages(args: MessagesArgs) -> Result<()> {
    info!("exporting messages {:?} -> {:?}", args.input, args.output);

    let summary = export_messages(&ExportOptions {
        input_dir: args.input,
        output_dir: args.output,
    })
    .context("failed to export messages")?;

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "message export finished"
    );
    Ok(())
}

fn run_texts(args: TextsArgs) -> Result<()> {
    info!("extracting texts {:?} -> {:?}", args.input, args.output);

    let summary = extract_texts(&ExtractOptions {
        input_dir: args.input,
        output_dir: args.output,
    })
    .context("failed to extract texts")?;

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "text extraction finished"
    );
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<()> {
    info!(
        "merging texts from {:?} into {:?} -> {:?}",
        args.text_dir, args.dataset, args.output
    );

    let summary = merge_text_column(&MergeOptions {
        dataset: args.dataset,
        text_dir: args.text_dir,
        output: args.output,
        id_column: args.id_column,
        text_column: args.text_column,
    })
    .context("failed to merge texts into dataset")?;

    info!(
        rows = summary.rows,
        matched = summary.matched,
        "merge finished"
    );
    Ok(())
}
