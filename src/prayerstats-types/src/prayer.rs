use std::fmt::Display;

use strum::{EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

/// Cyclic order used for interval computation. Isha appears at both ends so
/// that the walk yields `Isha_to_Fajr` first and `Maghrib_to_Isha` last.
pub const INTERVAL_SEQUENCE: [Prayer; 7] = [
    Prayer::Isha,
    Prayer::Fajr,
    Prayer::Sunrise,
    Prayer::Dhuhr,
    Prayer::Asr,
    Prayer::Maghrib,
    Prayer::Isha,
];

impl Prayer {
    pub fn all() -> impl Iterator<Item = Prayer> {
        Self::iter()
    }

    pub fn name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }
}

impl Display for Prayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn all_prayers_in_day_order() {
        let names = Prayer::all().map(Prayer::name).collect::<Vec<_>>();
        assert_eq!(names, ["Fajr", "Sunrise", "Dhuhr", "Asr", "Maghrib", "Isha"]);
    }

    #[test]
    fn parse_provider_keys() {
        assert_eq!(Prayer::from_str("Maghrib").unwrap(), Prayer::Maghrib);
        assert!(Prayer::from_str("Imsak").is_err());
        assert!(Prayer::from_str("Midnight").is_err());
    }

    #[test]
    fn sequence_wraps_around_isha() {
        assert_eq!(INTERVAL_SEQUENCE.first(), INTERVAL_SEQUENCE.last());
        assert_eq!(INTERVAL_SEQUENCE.windows(2).count(), 6);
    }
}
