/*
 * Render an invoice into a Google Sheets worksheet
 *
 * Pipeline:
 *  - Load invoice_config.json against one reference date
 *      - invoice date and per-item week labels are offsets from it
 *  - List statutory holidays in the two weeks ending on that date
 *  - Compose the notes block
 *  - Plan the grid regions from the number of line items
 *  - Build two batches:
 *      - values and formatting
 *      - merges and column widths
 *  - Find or create the "Invoice <n>" worksheet
 *  - Send both batches, print the worksheet URL
 */

mod auth;
mod batch;
mod billing;
mod calendar;
mod cli;
mod config;
mod error;
mod holidays;
mod layout;
mod logging;
mod notes;
mod render;
mod run;
mod sheets;

use chrono::Local;
use clap::Parser;
use crate::cli::Opts;

fn main() {
    let opts = Opts::parse();
    logging::init();

    let now = opts.date.unwrap_or_else(|| Local::now().date_naive());
    if let Err(error) = run::run_cmd(&opts, now) {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
