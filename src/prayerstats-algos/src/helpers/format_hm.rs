use super::time_math::MINUTES_PER_DAY;

pub trait FormatHM {
    fn format_hm(&self) -> String;
}

/// Whole minutes since midnight (or a sub-day duration).
impl FormatHM for i64 {
    fn format_hm(&self) -> String {
        let minutes = self.rem_euclid(MINUTES_PER_DAY);
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Decimal hours, as plotted on the chart axis.
impl FormatHM for f64 {
    fn format_hm(&self) -> String {
        super::time_math::hours_to_minutes(*self).format_hm()
    }
}

/// Inverse of [`FormatHM`] for `HH:MM` strings within a day.
pub fn parse_hm(s: &str) -> Option<i64> {
    let (h, m) = s.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h = h.parse::<i64>().ok()?;
    let m = m.parse::<i64>().ok()?;
    ((0..24).contains(&h) && (0..60).contains(&m)).then_some(h * 60 + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_minutes() {
        assert_eq!(0_i64.format_hm(), "00:00");
        assert_eq!(870_i64.format_hm(), "14:30");
        assert_eq!(1439_i64.format_hm(), "23:59");
        assert_eq!(1440_i64.format_hm(), "00:00");
        assert_eq!((-20_i64).format_hm(), "23:40");
    }

    #[test]
    fn format_decimal_hours() {
        assert_eq!(5.5_f64.format_hm(), "05:30");
        assert_eq!((6.0 + 58.0 / 60.0).format_hm(), "06:58");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_hm("24:00"), None);
        assert_eq!(parse_hm("7:05"), None);
        assert_eq!(parse_hm("07-05"), None);
    }

    #[test]
    fn round_trip_every_minute() {
        for minutes in 0..MINUTES_PER_DAY {
            let s = minutes.format_hm();
            assert_eq!(parse_hm(&s), Some(minutes));
            assert_eq!(parse_hm(&s).unwrap().format_hm(), s);
        }
    }
}
