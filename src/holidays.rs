use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, VariantNames};

use crate::calendar::{easter_sunday, nth_weekday, weekday_before, DateOffsets};

/// Days looked back from the reference date, both ends inclusive.
pub const WINDOW_DAYS: i64 = 14;

#[derive(
    Display,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Clone,
    Copy,
    Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    /// Holidays observed across all of Canada
    #[default]
    Canada,
    /// Federally regulated employers (Canada Labour Code)
    Federal,
    /// Ontario Employment Standards Act
    Ontario,
}

#[derive(Debug, PartialEq, Clone)]
pub struct HolidayEntry {
    pub date: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Fixed { month: u32, day: u32 },
    Easter(i64),
    Nth { month: u32, weekday: Weekday, n: u8 },
    Before { month: u32, day: u32, weekday: Weekday },
}

impl Rule {
    fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            Rule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            Rule::Easter(offset) => easter_sunday(year)?.offset_days(offset),
            Rule::Nth { month, weekday, n } => {
                nth_weekday(year, month, weekday, n)
            }
            Rule::Before {
                month,
                day,
                weekday,
            } => weekday_before(NaiveDate::from_ymd_opt(year, month, day)?, weekday),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Holiday {
    name: &'static str,
    rule: Rule,
    since: i32,
}

impl Holiday {
    const fn new(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            since: i32::MIN,
        }
    }

    const fn fixed(name: &'static str, month: u32, day: u32) -> Self {
        Self::new(name, Rule::Fixed { month, day })
    }

    const fn since(self, year: i32) -> Self {
        Self { since: year, ..self }
    }
}

const NEW_YEARS: Holiday = Holiday::fixed("New Year's Day", 1, 1);
const FAMILY_DAY: Holiday = Holiday::new(
    "Family Day",
    Rule::Nth {
        month: 2,
        weekday: Weekday::Mon,
        n: 3,
    },
);
const GOOD_FRIDAY: Holiday = Holiday::new("Good Friday", Rule::Easter(-2));
const VICTORIA_DAY: Holiday = Holiday::new(
    "Victoria Day",
    Rule::Before {
        month: 5,
        day: 25,
        weekday: Weekday::Mon,
    },
);
const CANADA_DAY: Holiday = Holiday::fixed("Canada Day", 7, 1);
const LABOUR_DAY: Holiday = Holiday::new(
    "Labour Day",
    Rule::Nth {
        month: 9,
        weekday: Weekday::Mon,
        n: 1,
    },
);
const TRUTH_AND_RECONCILIATION: Holiday =
    Holiday::fixed("National Day for Truth and Reconciliation", 9, 30)
        .since(2021);
const THANKSGIVING: Holiday = Holiday::new(
    "Thanksgiving",
    Rule::Nth {
        month: 10,
        weekday: Weekday::Mon,
        n: 2,
    },
);
const REMEMBRANCE_DAY: Holiday = Holiday::fixed("Remembrance Day", 11, 11);
const CHRISTMAS: Holiday = Holiday::fixed("Christmas Day", 12, 25);
const BOXING_DAY: Holiday = Holiday::fixed("Boxing Day", 12, 26);

const NATIONAL: &[Holiday] =
    &[NEW_YEARS, GOOD_FRIDAY, CANADA_DAY, LABOUR_DAY, CHRISTMAS];

const FEDERAL: &[Holiday] = &[
    NEW_YEARS,
    GOOD_FRIDAY,
    VICTORIA_DAY,
    CANADA_DAY,
    LABOUR_DAY,
    TRUTH_AND_RECONCILIATION,
    THANKSGIVING,
    REMEMBRANCE_DAY,
    CHRISTMAS,
    BOXING_DAY,
];

const ONTARIO: &[Holiday] = &[
    NEW_YEARS,
    FAMILY_DAY,
    GOOD_FRIDAY,
    VICTORIA_DAY,
    CANADA_DAY,
    LABOUR_DAY,
    THANKSGIVING,
    CHRISTMAS,
    BOXING_DAY,
];

impl Jurisdiction {
    fn holidays(&self) -> &'static [Holiday] {
        match self {
            Jurisdiction::Canada => NATIONAL,
            Jurisdiction::Federal => FEDERAL,
            Jurisdiction::Ontario => ONTARIO,
        }
    }

    /// Every statutory holiday of `year`, including weekday observances of
    /// fixed-date holidays that fall on a weekend.
    pub fn calendar(&self, year: i32) -> BTreeMap<NaiveDate, String> {
        let mut calendar = BTreeMap::new();
        let mut weekend_fixed = Vec::new();

        for holiday in self.holidays().iter().filter(|h| year >= h.since) {
            if let Some(date) = holiday.rule.date_in(year) {
                add(&mut calendar, date, holiday.name);
                if matches!(holiday.rule, Rule::Fixed { .. }) && date.is_weekend()
                {
                    weekend_fixed.push((date, holiday.name));
                }
            }
        }

        weekend_fixed.sort_by_key(|(date, _)| *date);
        for (date, name) in weekend_fixed {
            let mut observed = date.next_weekday();
            while let Some(day) = observed.filter(|d| calendar.contains_key(d))
            {
                observed = day.next_weekday();
            }
            if let Some(day) = observed {
                calendar.insert(day, format!("{} (observed)", name));
            }
        }
        calendar
    }
}

fn add(calendar: &mut BTreeMap<NaiveDate, String>, date: NaiveDate, name: &str) {
    calendar
        .entry(date)
        .and_modify(|existing: &mut String| {
            existing.push_str("; ");
            existing.push_str(name);
        })
        .or_insert_with(|| name.to_string());
}

/// Statutory holidays in `[now - 14 days, now]`, oldest first.
pub fn holidays_in_window(
    jurisdiction: Jurisdiction,
    now: NaiveDate,
) -> Vec<HolidayEntry> {
    let start = now.offset_days(-WINDOW_DAYS).unwrap_or(NaiveDate::MIN);

    let calendar: BTreeMap<NaiveDate, String> = (start.year()..=now.year())
        .flat_map(|year| jurisdiction.calendar(year))
        .collect();

    calendar
        .range(start..=now)
        .map(|(date, name)| HolidayEntry {
            date: date.day_label(),
            name: name.clone(),
        })
        .collect()
}
