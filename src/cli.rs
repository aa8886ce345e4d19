use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "heading-anchors",
    version,
    about = "Clean exported editor HTML, stabilize heading ids and repair in-page links"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a document, write it back out and export its heading index.
    Process(ProcessArgs),
    /// Print the heading index and broken links of a document without writing files.
    Index(IndexArgs),
}

/// Settings shared by every command that assigns heading ids.
#[derive(Args, Debug, Clone, Default)]
pub struct AnchorArgs {
    /// Prefix for the `link` column; links are bare fragments when empty.
    #[arg(long, default_value = "")]
    pub page_url: String,

    /// Keep editor-generated heading ids instead of replacing them with slugs.
    #[arg(long, default_value_t = false)]
    pub keep_existing_ids: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Spreadsheet with a Headings and a Broken Links sheet. Defaults to
    /// `<output stem>.headings.xlsx` next to the output.
    #[arg(long)]
    pub xlsx_out: Option<PathBuf>,

    /// Defaults to the workbook path with a `.json` extension.
    #[arg(long)]
    pub index_out: Option<PathBuf>,

    /// Defaults to `<output stem>.report.json` next to the output.
    #[arg(long)]
    pub report_out: Option<PathBuf>,

    #[command(flatten)]
    pub anchors: AnchorArgs,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    #[arg(long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub anchors: AnchorArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
