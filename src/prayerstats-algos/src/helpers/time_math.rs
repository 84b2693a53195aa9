pub const MINUTES_PER_DAY: i64 = 1440;

/// Decimal hours to whole minutes, rounding half away from zero.
pub fn hours_to_minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

/// Minutes elapsed going forward from `from` to `to` on a 24h clock.
pub fn forward_minutes(from: i64, to: i64) -> i64 {
    (to - from + MINUTES_PER_DAY).rem_euclid(MINUTES_PER_DAY)
}

pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        values.iter().sum::<i64>() as f64 / values.len() as f64
    }
}

/// Truncating integer mean.
pub fn floor_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        0
    } else {
        values.iter().sum::<i64>().div_euclid(values.len() as i64)
    }
}

/// Population standard deviation around `center`.
pub fn std_dev(values: &[i64], center: f64) -> f64 {
    if values.is_empty() {
        0_f64
    } else {
        let variance = values
            .iter()
            .map(|x| (*x as f64 - center).powi(2))
            .sum::<f64>()
            / values.len() as f64;

        variance.sqrt()
    }
}

pub fn round_minutes(v: f64) -> i64 {
    v.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_to_minutes_rounds_half_away() {
        assert_eq!(hours_to_minutes(5.5), 330);
        assert_eq!(hours_to_minutes(0.5 / 60.0), 1);
        assert_eq!(hours_to_minutes(23.0 + 59.0 / 60.0), 1439);
    }

    #[test]
    fn forward_minutes_wraps_midnight() {
        // 23:50 -> 00:10
        assert_eq!(forward_minutes(1430, 10), 20);
        assert_eq!(forward_minutes(300, 1170), 870);
        assert_eq!(forward_minutes(600, 600), 0);
    }

    #[test]
    fn forward_minutes_is_bounded() {
        for from in (0..MINUTES_PER_DAY).step_by(37) {
            for to in (0..MINUTES_PER_DAY).step_by(41) {
                let d = forward_minutes(from, to);
                assert!((0..MINUTES_PER_DAY).contains(&d));
            }
        }
    }

    #[test]
    fn mean_empty() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(floor_mean(&[]), 0);
    }

    #[test]
    fn floor_mean_truncates() {
        assert_eq!(floor_mean(&[1, 2]), 1);
        assert_eq!(mean(&[1, 2]), 1.5);
    }

    #[test]
    fn std_dev_population() {
        // [300, 320, 310] -> variance 200/3
        let values = [300, 320, 310];
        let sd = std_dev(&values, mean(&values));
        assert!((sd - (200.0_f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(round_minutes(sd), 8);
    }

    #[test]
    fn std_dev_zero_variance() {
        assert_eq!(std_dev(&[480, 480, 480], 480.0), 0.0);
    }

    #[test]
    fn round_minutes_half_away_from_zero() {
        assert_eq!(round_minutes(2.5), 3);
        assert_eq!(round_minutes(-2.5), -3);
        assert_eq!(round_minutes(2.49), 2);
    }
}
