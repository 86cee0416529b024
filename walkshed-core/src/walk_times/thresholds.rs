use crate::{Error, Minutes};

/// Trip time buckets used when none are configured
pub const DEFAULT_TRIP_TIMES: [Minutes; 7] = [5.0, 10.0, 15.0, 20.0, 30.0, 45.0, 60.0];

/// Strictly increasing, non-empty list of positive trip times in minutes
#[derive(Debug, Clone, PartialEq)]
pub struct TripTimeThresholds(Vec<Minutes>);

impl TripTimeThresholds {
    /// Sorts the values ascending and drops duplicates.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the list is empty or holds a value
    /// that is not a positive finite number
    pub fn new(values: impl IntoIterator<Item = Minutes>) -> Result<Self, Error> {
        let mut values: Vec<Minutes> = values.into_iter().collect();
        if values.is_empty() {
            return Err(Error::Configuration(
                "Trip time threshold list is empty".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|t| !t.is_finite() || **t <= 0.0) {
            return Err(Error::Configuration(format!(
                "Trip time thresholds must be positive numbers, got {bad}"
            )));
        }

        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(Self(values))
    }

    /// Largest threshold, the search bound
    pub fn max(&self) -> Minutes {
        self.0[self.0.len() - 1]
    }

    pub fn min(&self) -> Minutes {
        self.0[0]
    }

    /// Smallest threshold that `distance` fits into, if any
    pub fn bucket(&self, distance: Minutes) -> Option<Minutes> {
        self.0
            .iter()
            .copied()
            .find(|&threshold| distance <= threshold)
    }

    pub fn as_slice(&self) -> &[Minutes] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TripTimeThresholds {
    fn default() -> Self {
        Self(DEFAULT_TRIP_TIMES.to_vec())
    }
}

impl TryFrom<Vec<Minutes>> for TripTimeThresholds {
    type Error = Error;

    fn try_from(values: Vec<Minutes>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl TryFrom<&[Minutes]> for TripTimeThresholds {
    type Error = Error;

    fn try_from(values: &[Minutes]) -> Result<Self, Self::Error> {
        Self::new(values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsorted_input_is_sorted_and_deduplicated() {
        let thresholds = TripTimeThresholds::new([10.0, 5.0, 15.0, 5.0]).unwrap();
        assert_eq!(thresholds.as_slice(), &[5.0, 10.0, 15.0]);
        assert_eq!(thresholds.min(), 5.0);
        assert_eq!(thresholds.max(), 15.0);
        assert_eq!(thresholds.len(), 3);
    }

    #[test]
    fn bucket_is_smallest_satisfied_threshold() {
        let thresholds = TripTimeThresholds::try_from(vec![5.0, 10.0, 15.0]).unwrap();

        assert_eq!(thresholds.bucket(0.0), Some(5.0));
        assert_eq!(thresholds.bucket(5.0), Some(5.0));
        assert_eq!(thresholds.bucket(5.000_001), Some(10.0));
        assert_eq!(thresholds.bucket(15.0), Some(15.0));
        assert_eq!(thresholds.bucket(15.1), None);
    }

    #[test]
    fn invalid_lists_are_rejected() {
        assert!(TripTimeThresholds::new(Vec::new()).is_err());
        assert!(TripTimeThresholds::new([5.0, 0.0]).is_err());
        assert!(TripTimeThresholds::new([-5.0]).is_err());
        assert!(TripTimeThresholds::new([f64::NAN, 5.0]).is_err());
        assert!(TripTimeThresholds::new([f64::INFINITY]).is_err());
    }

    #[test]
    fn default_matches_trip_time_constants() {
        let thresholds = TripTimeThresholds::default();
        assert_eq!(thresholds.as_slice(), &DEFAULT_TRIP_TIMES);
        assert_eq!(thresholds.max(), 60.0);
    }
}
