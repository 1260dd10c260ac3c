use std::fmt;

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calendar::INVOICE_DATE;

#[derive(Debug, PartialEq, Clone)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(description: String, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description,
            quantity,
            unit_price,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {} @ {}: {}",
            self.description,
            self.quantity,
            self.unit_price,
            self.amount()
        )
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceRecord {
    pub company_name: String,
    pub service_description: String,
    pub client_name: String,
    pub number: u64,
    pub po_number: String,
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
    pub currency_symbol: String,
    /// Carried from the config but not applied to any rendered figure.
    pub tax_rate: Decimal,
}

impl InvoiceRecord {
    pub fn grand_total(&self) -> Decimal {
        self.items.iter().map(LineItem::amount).sum()
    }

    pub fn date_label(&self) -> String {
        self.date.format(INVOICE_DATE).to_string()
    }

    pub fn worksheet_title(&self) -> String {
        format!("Invoice {}", self.number)
    }

    pub fn money(&self, amount: Decimal) -> Money<'_> {
        Money(&self.currency_symbol, amount)
    }
}

impl fmt::Display for InvoiceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invoice: #{} (PO {})\n\
             Date: {}\n\
             For: {}\n\n",
            self.number,
            self.po_number,
            self.date_label(),
            self.client_name,
        )?;

        for item in self.items.iter() {
            writeln!(f, "{}", item)?;
        }

        write!(
            f,
            "\nTotal: {} (tax rate {} not applied)",
            self.money(self.grand_total()),
            self.tax_rate.normalize()
        )
    }
}

/// An amount with thousands separators and two decimals, e.g. `$1,000.00`.
#[derive(Debug, Clone, Copy)]
pub struct Money<'a>(&'a str, Decimal);

impl fmt::Display for Money<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rounded = self
            .1
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let magnitude = rounded.abs();
        let whole = magnitude.trunc().to_u128().ok_or(fmt::Error)?;
        let cents = (magnitude.fract() * Decimal::ONE_HUNDRED)
            .to_u8()
            .ok_or(fmt::Error)?;
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            self.0,
            whole.to_formatted_string(&Locale::en),
            cents
        )
    }
}
