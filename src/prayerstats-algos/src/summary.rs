use crate::helpers::time_math::{mean, round_minutes, std_dev};

/// Extremes and spread of a minute series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSummary {
    pub min: i64,
    pub max: i64,
    pub mean: i64,
    pub range: i64,
    pub stdev: i64,
    /// First position holding `min`.
    pub min_index: usize,
    /// First position holding `max`.
    pub max_index: usize,
}

impl StatSummary {
    pub fn from_minutes(values: &[i64]) -> Option<Self> {
        let min = values.iter().copied().min()?;
        let max = values.iter().copied().max()?;
        let min_index = values.iter().position(|v| *v == min)?;
        let max_index = values.iter().position(|v| *v == max)?;

        let mean = mean(values);
        Some(Self {
            min,
            max,
            mean: round_minutes(mean),
            range: max - min,
            stdev: round_minutes(std_dev(values, mean)),
            min_index,
            max_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(StatSummary::from_minutes(&[]), None);
    }

    #[test]
    fn summary_of_three() {
        let summary = StatSummary::from_minutes(&[300, 320, 310]).unwrap();
        assert_eq!(summary.min, 300);
        assert_eq!(summary.max, 320);
        assert_eq!(summary.range, 20);
        assert_eq!(summary.mean, 310);
        assert_eq!(summary.stdev, 8);
        assert_eq!((summary.min_index, summary.max_index), (0, 1));
    }

    #[test]
    fn ties_pick_first_occurrence() {
        let summary = StatSummary::from_minutes(&[5, 1, 9, 1, 9]).unwrap();
        assert_eq!(summary.min_index, 1);
        assert_eq!(summary.max_index, 2);
    }

    #[test]
    fn single_value() {
        let summary = StatSummary::from_minutes(&[480]).unwrap();
        assert_eq!((summary.range, summary.stdev, summary.mean), (0, 0, 480));
    }
}
