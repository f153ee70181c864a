//! Solver configuration: termination budgets, acceptance, selection.

use std::time::Duration;

use crate::moves::SelectionPolicy;
use crate::score::RuleWeights;

/// How non-improving moves are treated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AcceptancePolicy {
    /// Accept only non-worsening moves. Simple and fast, but can park
    /// in a local optimum.
    HillClimbing,

    /// Metropolis criterion: accept a worsening move with probability
    /// `exp(delta / T)`, geometric cooling once per iteration. Hard
    /// deltas weigh far more than soft deltas in the exponent.
    SimulatedAnnealing {
        initial_temperature: f64,
        /// Per-iteration factor in (0, 1). Closer to 1 = slower cooling.
        cooling_rate: f64,
        min_temperature: f64,
    },

    /// Reject moves that revert a recently accepted move, unless the
    /// reversal would produce a new global best (aspiration).
    Tabu {
        /// Number of recent move reversals kept forbidden.
        tenure: usize,
    },
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        AcceptancePolicy::HillClimbing
    }
}

/// Configuration for one solve.
///
/// Any subset of the three termination limits may be set; the engine
/// stops at the first satisfied one. At least one must be present.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use timetable_solver::solver::{AcceptancePolicy, SolverConfig};
///
/// let config = SolverConfig::default()
///     .with_max_duration(Duration::from_secs(5))
///     .with_unimproved_iteration_limit(20_000)
///     .with_acceptance(AcceptancePolicy::Tabu { tenure: 16 })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Wall-clock budget for the iteration phase.
    pub max_duration: Option<Duration>,

    /// Hard iteration budget. `Some(0)` returns the construction
    /// result untouched.
    pub max_iterations: Option<u64>,

    /// Stop after this many consecutive iterations without a new best
    /// score.
    pub unimproved_iteration_limit: Option<u64>,

    /// Acceptance policy for candidate moves.
    pub acceptance: AcceptancePolicy,

    /// How the move generator picks lessons to mutate.
    pub selection: SelectionPolicy,

    /// Probability that a generated candidate is a swap instead of a
    /// single-variable change.
    pub swap_probability: f64,

    /// Candidate moves generated per iteration; the best delta is the
    /// one offered to the acceptance policy. Values above 1 enable
    /// batch evaluation (parallel with the `parallel` feature).
    pub moves_per_step: usize,

    /// Constraint weights, including the room-fit scaling factor.
    pub weights: RuleWeights,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_duration: None,
            max_iterations: Some(10_000),
            unimproved_iteration_limit: None,
            acceptance: AcceptancePolicy::default(),
            selection: SelectionPolicy::default(),
            swap_probability: 0.2,
            moves_per_step: 1,
            weights: RuleWeights::default(),
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn with_max_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }

    pub fn with_max_iterations(mut self, limit: u64) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn with_unimproved_iteration_limit(mut self, limit: u64) -> Self {
        self.unimproved_iteration_limit = Some(limit);
        self
    }

    /// Clears every termination limit. The caller must set at least
    /// one back before running.
    pub fn without_termination_limits(mut self) -> Self {
        self.max_duration = None;
        self.max_iterations = None;
        self.unimproved_iteration_limit = None;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_swap_probability(mut self, probability: f64) -> Self {
        self.swap_probability = probability;
        self
    }

    pub fn with_moves_per_step(mut self, count: usize) -> Self {
        self.moves_per_step = count;
        self
    }

    pub fn with_weights(mut self, weights: RuleWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration.is_none()
            && self.max_iterations.is_none()
            && self.unimproved_iteration_limit.is_none()
        {
            return Err("at least one termination limit must be set".into());
        }
        if let Some(limit) = self.max_duration {
            if limit.is_zero() {
                return Err("max_duration must be positive".into());
            }
        }
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return Err(format!(
                "swap_probability must be within [0, 1], got {}",
                self.swap_probability
            ));
        }
        if self.moves_per_step == 0 {
            return Err("moves_per_step must be at least 1".into());
        }
        if self.weights.room_fit_factor < 0.0 {
            return Err(format!(
                "room_fit_factor must not be negative, got {}",
                self.weights.room_fit_factor
            ));
        }
        match self.acceptance {
            AcceptancePolicy::HillClimbing => {}
            AcceptancePolicy::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
                min_temperature,
            } => {
                if initial_temperature <= 0.0 {
                    return Err("initial_temperature must be positive".into());
                }
                if min_temperature <= 0.0 {
                    return Err("min_temperature must be positive".into());
                }
                if min_temperature >= initial_temperature {
                    return Err("min_temperature must be less than initial_temperature".into());
                }
                if cooling_rate <= 0.0 || cooling_rate >= 1.0 {
                    return Err(format!("cooling_rate must be in (0, 1), got {cooling_rate}"));
                }
            }
            AcceptancePolicy::Tabu { tenure } => {
                if tenure == 0 {
                    return Err("tabu tenure must be at least 1".into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SolverConfig::default();
        assert_eq!(config.max_iterations, Some(10_000));
        assert_eq!(config.moves_per_step, 1);
        assert_eq!(config.acceptance, AcceptancePolicy::HillClimbing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_round_trip() {
        let config = SolverConfig::default()
            .with_max_duration(Duration::from_millis(250))
            .with_max_iterations(500)
            .with_unimproved_iteration_limit(50)
            .with_swap_probability(0.4)
            .with_moves_per_step(8)
            .with_seed(7);
        assert_eq!(config.max_duration, Some(Duration::from_millis(250)));
        assert_eq!(config.max_iterations, Some(500));
        assert_eq!(config.unimproved_iteration_limit, Some(50));
        assert!((config.swap_probability - 0.4).abs() < 1e-12);
        assert_eq!(config.moves_per_step, 8);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_no_termination_limit_rejected() {
        let config = SolverConfig::default().without_termination_limits();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = SolverConfig::default().with_max_duration(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_swap_probability_rejected() {
        let config = SolverConfig::default().with_swap_probability(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_annealing_params_rejected() {
        let config = SolverConfig::default().with_acceptance(AcceptancePolicy::SimulatedAnnealing {
            initial_temperature: 1.0,
            cooling_rate: 0.99,
            min_temperature: 2.0,
        });
        assert!(config.validate().is_err());

        let config = SolverConfig::default().with_acceptance(AcceptancePolicy::SimulatedAnnealing {
            initial_temperature: 10.0,
            cooling_rate: 1.2,
            min_temperature: 0.1,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tenure_rejected() {
        let config = SolverConfig::default().with_acceptance(AcceptancePolicy::Tabu { tenure: 0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_room_fit_factor_rejected() {
        let config = SolverConfig::default()
            .with_weights(RuleWeights::default().with_room_fit_factor(-1.0));
        assert!(config.validate().is_err());
    }
}
