use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Day label used for line item placeholders and holiday listings.
pub const DAY_LABEL: &str = "%B %d";
/// Invoice date as printed under the title.
pub const INVOICE_DATE: &str = "%m/%d/%Y";

pub trait DateOffsets {
    fn offset_days(&self, days: i64) -> Option<Self>
    where
        Self: Sized;

    fn next_weekday(&self) -> Option<Self>
    where
        Self: Sized;

    fn is_weekend(&self) -> bool;

    fn day_label(&self) -> String;
}

impl DateOffsets for NaiveDate {
    fn offset_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        if days < 0 {
            self.checked_sub_days(magnitude)
        } else {
            self.checked_add_days(magnitude)
        }
    }

    /// First Monday to Friday strictly after this date.
    fn next_weekday(&self) -> Option<Self> {
        let mut date = self.succ_opt()?;
        while date.is_weekend() {
            date = date.succ_opt()?;
        }
        Some(date)
    }

    fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn day_label(&self) -> String {
        self.format(DAY_LABEL).to_string()
    }
}

/// The `n`th (1-based) `weekday` of a month.
pub fn nth_weekday(
    year: i32,
    month: u32,
    weekday: Weekday,
    n: u8,
) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// Last `weekday` strictly before `date`.
pub fn weekday_before(date: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let back = (7 + date.weekday().num_days_from_monday()
        - weekday.num_days_from_monday()
        - 1)
        % 7
        + 1;
    date.checked_sub_days(Days::new(back.into()))
}

/// Easter Sunday in the Gregorian calendar (anonymous computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
