use chrono::NaiveDate;
use prayerstats_types::HijriDate;

pub const INVALID_DATE: &str = "Invalid Date";

const DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%d %b %Y", "%d %B %Y"];

pub fn ordinal(n: u32) -> String {
    let suffix = if (n % 100) / 10 == 1 {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

/// Accepts the provider's `DD-MM-YYYY` or its readable `01 Jan 2024` form.
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s.trim(), format).ok())
}

/// `Jan 1st`, or [`INVALID_DATE`] when the string is not a recognised date.
pub fn format_date_with_ordinal(s: &str) -> String {
    use chrono::Datelike as _;

    match parse_display_date(s) {
        Some(date) => format!("{} {}", date.format("%b"), ordinal(date.day())),
        None => String::from(INVALID_DATE),
    }
}

pub fn abbreviated_hijri_month(number: u32, name: &str) -> String {
    let abbreviation = match number {
        1 => "Muh",
        2 => "Saf",
        3 => "Ra١",
        4 => "Ra٢",
        5 => "Ju١",
        6 => "Ju٢",
        7 => "Raj",
        8 => "Shb",
        9 => "Ram",
        10 => "Shw",
        11 => "Duq",
        12 => "Duh",
        _ => return abbreviation_from_name(name).unwrap_or(name).to_owned(),
    };
    abbreviation.to_owned()
}

fn abbreviation_from_name(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["muharram"]) {
        Some("Muh")
    } else if has(&["safar"]) {
        Some("Saf")
    } else if has(&["rabi al-awwal", "rabi' al-awwal", "rabie al awwal", "rabi ul awwal"]) {
        Some("Ra١")
    } else if has(&["rabi al-thani", "rabi' al-thani", "rabie al-thani", "rabi ul thani"]) {
        Some("Ra٢")
    } else if has(&["jumada al-ula", "jumada al-awwal", "jumada ul-ula"]) {
        Some("Ju١")
    } else if has(&["jumada al-akhirah", "jumada al-thani", "jumada ath-thaniyah"]) {
        Some("Ju٢")
    } else if has(&["rajab"]) {
        Some("Raj")
    } else if has(&["sha'ban", "shaban", "shaaban"]) {
        Some("Shb")
    } else if has(&["ramadan"]) {
        Some("Ram")
    } else if has(&["shawwal"]) {
        Some("Shw")
    } else if has(&["dhu al-qa'dah", "dhul qadah", "dhu'l-qa'dah", "dhul-qadah"]) {
        Some("Duq")
    } else if has(&["dhu al-hijjah", "dhul hijjah", "dhu'l-hijjah", "dhul-hijjah"]) {
        Some("Duh")
    } else {
        None
    }
}

/// `Ram 1st`
pub fn format_hijri_with_ordinal(hijri: &HijriDate) -> String {
    format!(
        "{} {}",
        abbreviated_hijri_month(hijri.month.number, &hijri.month.name),
        ordinal(hijri.day)
    )
}

/// Drops a trailing ` YYYY` from a readable date: `01 Jan 2024` -> `01 Jan`.
pub fn strip_year(s: &str) -> &str {
    match s.rsplit_once(' ') {
        Some((head, year)) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => head,
        _ => s,
    }
}
