use serde::Deserialize;

use super::indexer::{DEFAULT_EDGE_WEIGHT, GraphIndexer};
use super::time_weights::DEFAULT_TRAVEL_SPEED;
use crate::walk_times::{DEFAULT_TRIP_TIMES, DispatchOptions, TripTimeThresholds};
use crate::{Error, Minutes};

/// What the dispatcher does when a partition of origins fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Discard every partition and report the first failure
    #[default]
    FailFast,
    /// Keep the partitions that completed and report the failed ones
    Salvage,
}

/// Batch parameters for a walk time computation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct WalkTimeConfig {
    /// Trip time thresholds in minutes, any order
    pub thresholds: Vec<Minutes>,
    /// Weight of edges without a usable walking time
    pub default_edge_weight: Minutes,
    /// Worker threads; `None` picks one less than the available cores,
    /// 0 or 1 runs serially
    pub worker_count: Option<usize>,
    /// Walking speed used when the graph carries lengths only
    pub travel_speed_kmh: f64,
    pub failure_policy: FailurePolicy,
}

impl Default for WalkTimeConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_TRIP_TIMES.to_vec(),
            default_edge_weight: DEFAULT_EDGE_WEIGHT,
            worker_count: None,
            travel_speed_kmh: DEFAULT_TRAVEL_SPEED,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl WalkTimeConfig {
    /// # Errors
    ///
    /// Returns a configuration error for an empty or invalid threshold list
    pub fn trip_times(&self) -> Result<TripTimeThresholds, Error> {
        TripTimeThresholds::new(self.thresholds.iter().copied())
    }

    /// # Errors
    ///
    /// Returns a configuration error for a non-positive default weight
    pub fn indexer(&self) -> Result<GraphIndexer, Error> {
        GraphIndexer::new(self.default_edge_weight)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            worker_count: self.worker_count,
            failure_policy: self.failure_policy,
        }
    }

    /// Checks every field before any graph work starts
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found
    pub fn validate(&self) -> Result<(), Error> {
        self.trip_times()?;
        self.indexer()?;
        if !self.travel_speed_kmh.is_finite() || self.travel_speed_kmh <= 0.0 {
            return Err(Error::Configuration(format!(
                "Travel speed must be a positive number, got {}",
                self.travel_speed_kmh
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config: WalkTimeConfig =
            serde_json::from_str(r#"{ "worker-count": 3, "failure-policy": "salvage" }"#).unwrap();

        assert_eq!(config.thresholds, DEFAULT_TRIP_TIMES.to_vec());
        assert_eq!(config.default_edge_weight, DEFAULT_EDGE_WEIGHT);
        assert_eq!(config.worker_count, Some(3));
        assert_eq!(config.failure_policy, FailurePolicy::Salvage);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builds_components_from_settings() {
        let config = WalkTimeConfig {
            thresholds: vec![15.0, 5.0],
            default_edge_weight: 2.5,
            worker_count: Some(2),
            ..WalkTimeConfig::default()
        };

        assert_eq!(config.trip_times().unwrap().as_slice(), &[5.0, 15.0]);
        assert_eq!(config.indexer().unwrap().default_edge_weight(), 2.5);
        assert_eq!(config.dispatch_options(), DispatchOptions::with_workers(2));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<WalkTimeConfig>(r#"{ "threshold": [5] }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let empty = WalkTimeConfig {
            thresholds: vec![],
            ..WalkTimeConfig::default()
        };
        assert!(matches!(empty.validate(), Err(Error::Configuration(_))));

        let weight = WalkTimeConfig {
            default_edge_weight: 0.0,
            ..WalkTimeConfig::default()
        };
        assert!(weight.validate().is_err());

        let speed = WalkTimeConfig {
            travel_speed_kmh: -4.5,
            ..WalkTimeConfig::default()
        };
        assert!(speed.validate().is_err());
    }
}
