use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::auth::Credentials;
use crate::cli::{Command, Opts};
use crate::config::{self, LoadedConfig};
use crate::error::{AuthError, ConfigError, GatewayError, LayoutError};
use crate::holidays::{holidays_in_window, HolidayEntry};
use crate::notes::build_notes;
use crate::render::build_batches;
use crate::sheets::{Gateway, SheetsClient};

const QUOTA_HINT: &str =
    "Google Sheets API allows 60 requests per minute per user.";

pub fn run_cmd(opts: &Opts, now: NaiveDate) -> Result<(), RunError> {
    let loaded = load_config(&opts.config, now)?;

    match opts.subcommand.unwrap_or(Command::Generate) {
        Command::Generate => {
            let url = connect_and_generate(&opts.credentials, &loaded, now)?;
            println!("Invoice created successfully!");
            println!("URL: {}", url);
            Ok(())
        }
        Command::Preview => preview(&loaded, now),
        Command::Holidays => show_holidays(&loaded, now),
    }
}

fn load_config(path: &Path, now: NaiveDate) -> Result<LoadedConfig, RunError> {
    config::load(path, now).map_err(|error| {
        if let ConfigError::NotFound { path, .. } = &error {
            eprintln!("Please create {} with your invoice data.", path.display());
        }
        RunError::from(error)
    })
}

fn connect_and_generate(
    credentials: &Path,
    loaded: &LoadedConfig,
    now: NaiveDate,
) -> Result<String, RunError> {
    let creds = Credentials::load(credentials)?;
    let mut client = SheetsClient::connect(&creds).map_err(report)?;
    generate(&mut client, loaded, now)
}

fn window(loaded: &LoadedConfig, now: NaiveDate) -> (Vec<HolidayEntry>, String) {
    let holidays = holidays_in_window(loaded.notes.jurisdiction, now);
    let notes = build_notes(&loaded.notes, &holidays);
    (holidays, notes)
}

/// Render the invoice and write it to its worksheet, returning the URL.
///
/// Everything that can fail without the backend is done before the first
/// gateway call.
pub fn generate<G: Gateway>(
    gateway: &mut G,
    loaded: &LoadedConfig,
    now: NaiveDate,
) -> Result<String, RunError> {
    let invoice = &loaded.invoice;
    let (holidays, notes) = window(loaded, now);
    info!(
        jurisdiction = %loaded.notes.jurisdiction,
        holidays = holidays.len(),
        "holiday window computed"
    );

    let batches = build_batches(invoice, &loaded.formatting, &notes)?;

    let worksheet = gateway
        .ensure_worksheet(&invoice.worksheet_title())
        .map_err(report)?;
    info!(title = %worksheet.title, lookup = %worksheet.lookup, "writing invoice");

    gateway
        .apply_batch(&worksheet, &batches.values)
        .map_err(report)?;
    gateway
        .apply_batch(&worksheet, &batches.structure)
        .map_err(report)?;

    Ok(worksheet.url)
}

fn report(error: GatewayError) -> RunError {
    if error.is_rate_limit() {
        eprintln!("Rate limit exceeded. Please wait a minute and try again.");
        eprintln!("{}", QUOTA_HINT);
    } else {
        eprintln!("Error creating invoice: {}", error);
    }
    RunError::from(error)
}

fn preview(loaded: &LoadedConfig, now: NaiveDate) -> Result<(), RunError> {
    let (_, notes) = window(loaded, now);
    let batches = build_batches(&loaded.invoice, &loaded.formatting, &notes)?;

    eprintln!("{}\n", loaded.invoice);
    for batch in [&batches.values, &batches.structure] {
        let body = serde_json::to_string_pretty(&batch.to_body(0))?;
        println!("{}", body);
    }
    Ok(())
}

fn show_holidays(loaded: &LoadedConfig, now: NaiveDate) -> Result<(), RunError> {
    let (holidays, notes) = window(loaded, now);

    println!(
        "Statutory holidays ({}) in the two weeks ending {}:\n",
        loaded.notes.jurisdiction, now
    );
    if holidays.is_empty() {
        println!("None");
    }
    for holiday in holidays.iter() {
        println!("{}: {}", holiday.date, holiday.name);
    }
    println!("\n{}", notes);
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("{source}")]
    Layout {
        #[from]
        source: LayoutError,
    },

    #[error("{source}")]
    Auth {
        #[from]
        source: AuthError,
    },

    #[error("{source}")]
    Gateway {
        #[from]
        source: GatewayError,
    },

    #[error("Error encoding request: {source}")]
    Encode {
        #[from]
        source: serde_json::Error,
    },
}
