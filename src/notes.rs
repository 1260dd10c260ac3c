use crate::config::NotesConfig;
use crate::holidays::HolidayEntry;

const HEADER: &str = "Notes:";
const HOLIDAY_HEADING: &str = "Canadian Statutory Holidays (Paid Days Off):";

/// Compose the text of the notes block.
pub fn build_notes(config: &NotesConfig, holidays: &[HolidayEntry]) -> String {
    let mut content = HEADER.to_string();

    if config.include_holidays && !holidays.is_empty() {
        content.push_str("\n\n");
        content.push_str(HOLIDAY_HEADING);
        for holiday in holidays {
            content.push_str(&format!("\n• {}: {}", holiday.date, holiday.name));
        }
    }

    let trailing = if !config.custom_notes.is_empty() {
        Some(config.custom_notes.clone())
    } else {
        holiday_billing_note(holidays)
    };

    if let Some(text) = trailing {
        content.push_str("\n\n");
        content.push_str(&text);
    }

    content
}

/// "Note: Holiday hours for A, B and C are included in regular billing."
pub fn holiday_billing_note(holidays: &[HolidayEntry]) -> Option<String> {
    let (last, rest) = holidays.split_last()?;
    let names = if rest.is_empty() {
        last.name.clone()
    } else {
        let leading: Vec<&str> = rest.iter().map(|h| h.name.as_str()).collect();
        format!("{} and {}", leading.join(", "), last.name)
    };
    Some(format!(
        "Note: Holiday hours for {} are included in regular billing.",
        names
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holiday(date: &str, name: &str) -> HolidayEntry {
        HolidayEntry {
            date: date.to_string(),
            name: name.to_string(),
        }
    }

    fn config(include_holidays: bool, custom_notes: &str) -> NotesConfig {
        NotesConfig {
            include_holidays,
            custom_notes: custom_notes.to_string(),
            ..NotesConfig::default()
        }
    }

    #[test]
    fn no_holidays_no_custom_text() {
        assert_eq!(build_notes(&config(true, ""), &[]), "Notes:");
    }

    #[test]
    fn one_holiday() {
        let holidays = [holiday("July 01", "Canada Day")];
        assert_eq!(
            build_notes(&config(true, ""), &holidays),
            "Notes:\n\n\
             Canadian Statutory Holidays (Paid Days Off):\n\
             • July 01: Canada Day\n\n\
             Note: Holiday hours for Canada Day are included in regular billing."
        );
    }

    #[test]
    fn two_holidays() {
        let holidays = [
            holiday("December 25", "Christmas Day"),
            holiday("December 26", "Boxing Day"),
        ];
        assert_eq!(
            holiday_billing_note(&holidays).unwrap(),
            "Note: Holiday hours for Christmas Day and Boxing Day \
             are included in regular billing."
        );
    }

    #[test]
    fn three_holidays() {
        let holidays = [
            holiday("December 25", "Christmas Day"),
            holiday("December 26", "Boxing Day"),
            holiday("December 27", "Christmas Day (observed)"),
        ];
        assert_eq!(
            holiday_billing_note(&holidays).unwrap(),
            "Note: Holiday hours for Christmas Day, Boxing Day and \
             Christmas Day (observed) are included in regular billing."
        );
    }

    #[test]
    fn custom_text_replaces_generated_note() {
        let holidays = [holiday("July 01", "Canada Day")];
        let notes = build_notes(&config(true, "Payment due in 30 days."), &holidays);
        assert!(notes.contains("• July 01: Canada Day"));
        assert!(notes.ends_with("\n\nPayment due in 30 days."));
        assert!(!notes.contains("Holiday hours"));
    }

    #[test]
    fn custom_text_without_holidays() {
        assert_eq!(
            build_notes(&config(true, "Thank you!"), &[]),
            "Notes:\n\nThank you!"
        );
    }

    #[test]
    fn listing_disabled_keeps_generated_note() {
        let holidays = [holiday("July 01", "Canada Day")];
        assert_eq!(
            build_notes(&config(false, ""), &holidays),
            "Notes:\n\n\
             Note: Holiday hours for Canada Day are included in regular billing."
        );
    }

    #[test]
    fn deterministic() {
        let holidays = [holiday("July 01", "Canada Day")];
        assert_eq!(
            build_notes(&config(true, ""), &holidays),
            build_notes(&config(true, ""), &holidays)
        );
    }
}
