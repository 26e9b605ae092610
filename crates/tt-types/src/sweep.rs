//! Sweep data model: the submitted specification, the parameter triple each
//! worker runs, and the results workers report back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::TtResult;
use crate::validation_error;

/// Named measurement -> numeric value (e.g. intersection label -> average delay).
pub type Measurements = BTreeMap<String, f64>;

/// One point of the parameter grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub accel: f64,
    pub tau: f64,
    pub startup_delay: f64,
}

impl Combination {
    pub fn new(accel: f64, tau: f64, startup_delay: f64) -> Self {
        Self {
            accel,
            tau,
            startup_delay,
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accel={}, tau={}, startup_delay={}",
            self.accel, self.tau, self.startup_delay
        )
    }
}

/// The experiment a client submits: target measurements plus the three
/// parameter domains whose Cartesian product is swept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    /// Target value per measurement key.
    pub expected_delays: Measurements,
    pub accel_values: Vec<f64>,
    pub tau_values: Vec<f64>,
    pub startup_delay_values: Vec<f64>,
}

impl SweepSpec {
    pub fn new(
        expected_delays: Measurements,
        accel_values: Vec<f64>,
        tau_values: Vec<f64>,
        startup_delay_values: Vec<f64>,
    ) -> Self {
        Self {
            expected_delays,
            accel_values,
            tau_values,
            startup_delay_values,
        }
    }

    /// Target values the scorer compares every result against.
    pub fn target(&self) -> &Measurements {
        &self.expected_delays
    }

    /// Reject non-finite numbers and blank measurement keys.
    pub fn validate(&self) -> TtResult<()> {
        validate_measurements("expected_delays", &self.expected_delays)?;
        validate_domain("accel_values", &self.accel_values)?;
        validate_domain("tau_values", &self.tau_values)?;
        validate_domain("startup_delay_values", &self.startup_delay_values)?;
        Ok(())
    }
}

/// What a worker reports after running one combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResult {
    #[serde(flatten)]
    pub combination: Combination,
    pub intersection_avg_delays: Measurements,
}

impl WorkerResult {
    pub fn new(combination: Combination, intersection_avg_delays: Measurements) -> Self {
        Self {
            combination,
            intersection_avg_delays,
        }
    }

    pub fn measurements(&self) -> &Measurements {
        &self.intersection_avg_delays
    }

    pub fn validate(&self) -> TtResult<()> {
        let c = &self.combination;
        for (name, value) in [
            ("accel", c.accel),
            ("tau", c.tau),
            ("startup_delay", c.startup_delay),
        ] {
            if !value.is_finite() {
                return Err(validation_error!("{name} must be finite, got {value}"));
            }
        }
        validate_measurements("intersection_avg_delays", &self.intersection_avg_delays)
    }
}

/// Everything the coordinator knows about the active sweep.
///
/// `Default` is the reset state: no spec, zero expected jobs, no results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepState {
    pub spec: Option<SweepSpec>,
    pub expected_count: usize,
    /// In report-arrival order.
    pub results: Vec<WorkerResult>,
}

fn validate_domain(field: &str, values: &[f64]) -> TtResult<()> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(validation_error!("{field} contains non-finite value {bad}"));
    }
    Ok(())
}

fn validate_measurements(field: &str, values: &Measurements) -> TtResult<()> {
    for (key, value) in values {
        if key.trim().is_empty() {
            return Err(validation_error!("{field} contains a blank key"));
        }
        if !value.is_finite() {
            return Err(validation_error!("{field}[{key}] must be finite, got {value}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TtError;

    fn targets() -> Measurements {
        [("I2".to_string(), 50.0), ("I3".to_string(), 20.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn spec_deserializes_from_wire_names() {
        let json = r#"{
            "expected_delays": {"I2": 50.0, "I3": 20.0},
            "accel_values": [1.0, 2.0],
            "tau_values": [1.0],
            "startup_delay_values": [0.0, 1.0]
        }"#;
        let spec: SweepSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.target(), &targets());
        assert_eq!(spec.accel_values, vec![1.0, 2.0]);
        assert_eq!(spec.startup_delay_values, vec![0.0, 1.0]);
    }

    #[test]
    fn worker_result_uses_flat_wire_shape() {
        let result = WorkerResult::new(Combination::new(2.0, 1.0, 0.5), targets());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["accel"], 2.0);
        assert_eq!(value["tau"], 1.0);
        assert_eq!(value["startup_delay"], 0.5);
        assert_eq!(value["intersection_avg_delays"]["I3"], 20.0);
        assert!(value.get("combination").is_none());
    }

    #[test]
    fn worker_result_missing_field_is_rejected() {
        let json = r#"{"accel": 1.0, "tau": 1.0, "intersection_avg_delays": {}}"#;
        assert!(serde_json::from_str::<WorkerResult>(json).is_err());
    }

    #[test]
    fn validation_rejects_non_finite_domain() {
        let spec = SweepSpec::new(targets(), vec![1.0, f64::NAN], vec![1.0], vec![0.0]);
        assert!(matches!(spec.validate(), Err(TtError::Validation(_))));
    }

    #[test]
    fn validation_rejects_blank_measurement_key() {
        let mut delays = targets();
        delays.insert("  ".to_string(), 1.0);
        let result = WorkerResult::new(Combination::new(1.0, 1.0, 0.0), delays);
        assert!(result.validate().is_err());
    }

    #[test]
    fn empty_domains_are_valid() {
        let spec = SweepSpec::new(targets(), vec![], vec![1.0], vec![0.0]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn default_state_is_empty() {
        let state = SweepState::default();
        assert_eq!(state.spec, None);
        assert_eq!(state.expected_count, 0);
        assert!(state.results.is_empty());
    }
}
