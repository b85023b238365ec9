//! Rotation policy: the tunable constants of the fairness rules.

use serde::{Deserialize, Serialize};

/// Constants used by the scorer, selector and cycle detector.
///
/// Every field has a default, so a partial JSON config is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Largest allowed gap between the busiest and the idlest member.
    pub max_spread: u32,

    /// Task count at which idle members start to be penalized.
    pub overload_threshold: u32,

    /// Fairness penalty per member below one task (once someone is overloaded).
    pub idle_penalty: u32,

    /// Weight of a repeated pair in the repetition score.
    pub pair_weight: u32,

    /// Upper bound on member combinations examined per task.
    /// Above this the cycle detector stops trying to prove exhaustion.
    pub max_candidates: usize,

    /// Restart the rotation window once every combination has occurred.
    pub cycle_reset: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_spread: 2,
            overload_threshold: 3,
            idle_penalty: 10,
            pair_weight: 10,
            max_candidates: 20_000,
            cycle_reset: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_has_reasonable_values() {
        let policy = RotationPolicy::default();
        assert_eq!(policy.max_spread, 2);
        assert_eq!(policy.overload_threshold, 3);
        assert_eq!(policy.idle_penalty, 10);
        assert_eq!(policy.pair_weight, 10);
        assert!(policy.cycle_reset);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let policy: RotationPolicy =
            serde_json::from_str(r#"{ "pair_weight": 25 }"#).expect("deserialize");
        assert_eq!(policy.pair_weight, 25);
        assert_eq!(policy.max_spread, 2);
        assert_eq!(policy.max_candidates, 20_000);
    }
}
