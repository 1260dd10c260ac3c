use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::batch::Color;
use crate::billing::{InvoiceRecord, LineItem};
use crate::calendar::DateOffsets;
use crate::error::ConfigError;
use crate::holidays::Jurisdiction;

/// Both tokens resolve to the line item's single `week_offset` date.
const WEEK_PLACEHOLDERS: [&str; 2] = ["{week1_date}", "{week2_date}"];

pub const DEFAULT_ACCENT: Color = Color::rgb(0.706, 0.373, 0.024);
pub const DEFAULT_FONT_FAMILY: &str = "Roboto";

#[derive(Deserialize, Debug, Clone)]
pub struct InvoiceConfig {
    pub company: CompanySection,
    pub client: ClientSection,
    pub invoice: InvoiceSection,
    pub line_items: Vec<LineItemSection>,
    #[serde(default)]
    pub formatting: FormattingConfig,
    #[serde(default)]
    pub notes: NotesConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CompanySection {
    pub name: String,
    pub service_description: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ClientSection {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct InvoiceSection {
    pub number: u64,
    pub po_number: String,
    #[serde(default)]
    pub date_offset_days: i64,
    pub currency_symbol: String,
    pub tax_rate: Decimal,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LineItemSection {
    pub description: String,
    #[serde(default)]
    pub week_offset: i64,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FormattingConfig {
    #[serde(rename = "company_name_color")]
    pub accent: Color,
    pub font_family: String,
    pub company_name_size: u32,
    pub invoice_title_size: u32,
    pub total_size: u32,
    pub regular_text_size: u32,
    pub label_text_size: u32,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            company_name_size: 20,
            invoice_title_size: 20,
            total_size: 20,
            regular_text_size: 10,
            label_text_size: 12,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NotesConfig {
    pub include_holidays: bool,
    pub custom_notes: String,
    pub jurisdiction: Jurisdiction,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            include_holidays: true,
            custom_notes: String::new(),
            jurisdiction: Jurisdiction::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub invoice: InvoiceRecord,
    pub formatting: FormattingConfig,
    pub notes: NotesConfig,
}

pub fn load(path: &Path, now: NaiveDate) -> Result<LoadedConfig, ConfigError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;
    let config: InvoiceConfig =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), items = config.line_items.len(), "config parsed");
    config.resolve(now)
}

impl InvoiceConfig {
    /// Resolve every relative date against `now` into an invoice record.
    pub fn resolve(self, now: NaiveDate) -> Result<LoadedConfig, ConfigError> {
        let date = offset(now, self.invoice.date_offset_days, "invoice date")?;

        let items = self
            .line_items
            .into_iter()
            .map(|item| item.resolve(now))
            .collect::<Result<Vec<_>, _>>()?;
        checked_total(&items)?;

        let invoice = InvoiceRecord {
            company_name: self.company.name,
            service_description: self.company.service_description,
            client_name: self.client.name,
            number: self.invoice.number,
            po_number: self.invoice.po_number,
            date,
            items,
            currency_symbol: self.invoice.currency_symbol,
            tax_rate: self.invoice.tax_rate,
        };

        Ok(LoadedConfig {
            invoice,
            formatting: self.formatting,
            notes: self.notes,
        })
    }
}

impl LineItemSection {
    fn resolve(self, now: NaiveDate) -> Result<LineItem, ConfigError> {
        let label = offset(now, self.week_offset, "week")?.day_label();
        let description = WEEK_PLACEHOLDERS
            .iter()
            .fold(self.description, |text, token| text.replace(token, &label));
        if self.quantity.checked_mul(self.unit_price).is_none() {
            return Err(ConfigError::AmountOutOfRange { description });
        }
        Ok(LineItem::new(description, self.quantity, self.unit_price))
    }
}

/// Line amounts and their sum must fit a `Decimal` once loaded.
fn checked_total(items: &[LineItem]) -> Result<Decimal, ConfigError> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total
            .checked_add(item.amount())
            .ok_or_else(|| ConfigError::AmountOutOfRange {
                description: item.description.clone(),
            })
    })
}

fn offset(now: NaiveDate, days: i64, field: &str) -> Result<NaiveDate, ConfigError> {
    now.offset_days(days)
        .ok_or_else(|| ConfigError::DateOutOfRange {
            field: field.to_string(),
            days,
        })
}
