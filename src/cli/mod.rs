pub mod generate;
pub mod init;
pub mod preview;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "salesreport",
    about = "Turn a point-of-sale CSV export into a categorized PDF sales report."
)]
pub struct Cli {
    /// More log output (-v info, -vv debug). SALESREPORT_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default settings file to ~/.config/salesreport/settings.json.
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
    /// Build the PDF report for a CSV export.
    Generate(GenerateArgs),
    /// Print the grouped transactions, subtotals and grand total.
    Preview {
        /// Path to the CSV export
        file: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the CSV export
    pub file: String,
    /// Output file path (default: <output_dir>/<prefix>-<first date>.pdf)
    #[arg(long)]
    pub output: Option<String>,
    /// Title line, e.g. the organization name
    #[arg(long)]
    pub title: Option<String>,
    /// Subtitle line under the title
    #[arg(long)]
    pub subtitle: Option<String>,
}
