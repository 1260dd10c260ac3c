use chrono::NaiveDate;
use clap::{Parser, ValueHint};
use std::path::PathBuf;

/* Argument Stucture
 *
 * [--config <file>] [--credentials <file>] [--date <YYYY-MM-DD>]
 *     [generate | preview | holidays]
 */

#[derive(Parser)]
#[clap(version, about = "Render an invoice into a Google Sheets worksheet")]
pub struct Opts {
    /// Invoice data: company, client, line items, formatting and notes
    #[clap(short, long, default_value = "invoice_config.json",
        value_hint = ValueHint::FilePath)]
    pub config: PathBuf,

    /// Spreadsheet id and service account credentials
    #[clap(long, default_value = "google-creds.json",
        value_hint = ValueHint::FilePath)]
    pub credentials: PathBuf,

    /// Reference date for offsets and the holiday window (default: today)
    #[clap(short, long)]
    pub date: Option<NaiveDate>,

    #[clap(subcommand)]
    pub subcommand: Option<Command>,
}

#[derive(Parser, Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Create or refresh the invoice worksheet (default)
    Generate,

    /// Print the two batch requests without contacting the spreadsheet
    Preview,

    /// Show statutory holidays in the billing window and the notes block
    Holidays,
}
