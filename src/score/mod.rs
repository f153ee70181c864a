//! Assignment scoring.
//!
//! A candidate assignment maps to a two-level [`HardSoftScore`]: hard
//! violations (conflicts, duration misfits, pin deviations) dominate
//! lexicographically; soft preferences (morning placement of hard
//! courses, satisfaction, slot desirability, teacher breaks, room
//! capacity fit) only break hard ties.
//!
//! The [`ScoreCalculator`] exposes both full recomputation and an
//! incremental [`ScoreCalculator::delta_for`] that touches only the
//! constraints involving the moved lesson(s) — the contract the engine
//! relies on to evaluate many candidate moves per second.

mod calculator;
mod rules;
mod types;

pub use calculator::{RuleTally, ScoreCalculator};
pub use rules::RuleWeights;
pub use types::HardSoftScore;
