//! Local search execution loop.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::{AcceptancePolicy, SolverConfig};
use super::construction;
use crate::domain::{Lesson, TimetableProblem};
use crate::error::InvalidProblem;
use crate::moves::{Move, MoveGenerator};
use crate::score::{HardSoftScore, ScoreCalculator};

/// One hard point counts this much against soft points in the
/// annealing exponent.
const SA_HARD_WEIGHT: f64 = 1000.0;

/// Best score is sampled into the history every this many iterations.
const HISTORY_INTERVAL: u64 = 100;

/// Result of a solve.
///
/// Always the best snapshot seen, even when that snapshot is still
/// infeasible — callers check [`SolveResult::is_feasible`] and
/// [`SolveResult::cancelled`] to tell "good enough" from "interrupted"
/// from "overconstrained".
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best assignment found.
    pub lessons: Vec<Lesson>,

    /// Score of the best assignment.
    pub score: HardSoftScore,

    /// Iterations executed.
    pub iterations: u64,

    /// Accepted moves (including non-improving ones).
    pub accepted_moves: u64,

    /// Moves that strictly improved the current score.
    pub improving_moves: u64,

    /// Whether cancelled externally before a natural termination.
    pub cancelled: bool,

    /// Best score sampled at regular intervals.
    pub score_history: Vec<HardSoftScore>,
}

impl SolveResult {
    pub fn is_feasible(&self) -> bool {
        self.score.is_feasible()
    }
}

/// Executes a solve: construction, then iterated local search.
pub struct SolverRunner;

impl SolverRunner {
    /// Runs a solve to natural termination.
    pub fn run(
        problem: &TimetableProblem,
        config: &SolverConfig,
    ) -> Result<SolveResult, InvalidProblem> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs a solve with an optional cancellation token, checked once
    /// per iteration boundary so a half-applied move is never observed.
    pub fn run_with_cancel(
        problem: &TimetableProblem,
        config: &SolverConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SolveResult, InvalidProblem> {
        config.validate().expect("invalid SolverConfig");
        problem.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };

        let calculator = ScoreCalculator::with_weights(problem, config.weights.clone());
        let mut working = problem.lessons.clone();

        info!(
            "solving: {} lessons, {} rooms, {} timeslots",
            working.len(),
            problem.rooms.len(),
            problem.timeslots.len()
        );
        construction::construct(problem, &calculator, &mut working);

        let mut current_score = calculator.calculate(&working);
        let mut best = working.clone();
        let mut best_score = current_score;
        let mut score_history = vec![best_score];

        let mut generator = MoveGenerator::new(config.selection, config.swap_probability);
        let mut acceptance = AcceptanceState::new(&config.acceptance);

        let started = Instant::now();
        let mut iterations = 0u64;
        let mut accepted_moves = 0u64;
        let mut improving_moves = 0u64;
        let mut unimproved = 0u64;
        let mut cancelled = false;

        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if config.max_iterations.is_some_and(|limit| iterations >= limit) {
                break;
            }
            if config.max_duration.is_some_and(|limit| started.elapsed() >= limit) {
                break;
            }
            if config
                .unimproved_iteration_limit
                .is_some_and(|limit| unimproved >= limit)
            {
                break;
            }

            iterations += 1;

            let candidate = Self::pick_candidate(
                &mut generator,
                &calculator,
                &working,
                problem,
                config.moves_per_step,
                &mut rng,
            );
            let (mv, delta) = match candidate {
                Some(found) => found,
                None => {
                    unimproved += 1;
                    continue;
                }
            };

            let accepted =
                acceptance.accepts(&mv, delta, current_score, best_score, &mut rng);
            acceptance.cool();

            if accepted {
                let reversal = mv.inverse_key(&working);
                mv.apply(&mut working);
                current_score += delta;
                accepted_moves += 1;
                if delta > HardSoftScore::ZERO {
                    improving_moves += 1;
                }
                acceptance.record(reversal);

                if current_score > best_score {
                    best_score = current_score;
                    best = working.clone();
                    unimproved = 0;
                    trace!("new best {best_score} at iteration {iterations}");
                } else {
                    unimproved += 1;
                }
            } else {
                unimproved += 1;
            }

            if iterations.is_multiple_of(HISTORY_INTERVAL) {
                score_history.push(best_score);
            }
        }

        if score_history.last() != Some(&best_score) {
            score_history.push(best_score);
        }

        info!(
            "terminated after {iterations} iterations in {:?}: best {best_score}{}{}",
            started.elapsed(),
            if best_score.is_feasible() { "" } else { " (infeasible)" },
            if cancelled { " (cancelled)" } else { "" },
        );

        Ok(SolveResult {
            lessons: best,
            score: best_score,
            iterations,
            accepted_moves,
            improving_moves,
            cancelled,
            score_history,
        })
    }

    /// Generates up to `moves_per_step` candidates and keeps the one
    /// with the best incremental delta. Candidate evaluation is
    /// read-only against the working assignment; with the `parallel`
    /// feature a batch is evaluated concurrently before the single
    /// winner is committed by the caller.
    fn pick_candidate(
        generator: &mut MoveGenerator,
        calculator: &ScoreCalculator<'_>,
        working: &[Lesson],
        problem: &TimetableProblem,
        moves_per_step: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<(Move, HardSoftScore)> {
        let mut candidates = Vec::with_capacity(moves_per_step);
        for _ in 0..moves_per_step {
            if let Some(mv) = generator.generate(
                calculator,
                working,
                problem.timeslots.len(),
                problem.rooms.len(),
                rng,
            ) {
                candidates.push(mv);
            }
        }
        if candidates.is_empty() {
            return None;
        }

        #[cfg(feature = "parallel")]
        let deltas: Vec<HardSoftScore> = if candidates.len() > 1 {
            candidates
                .par_iter()
                .map(|mv| calculator.delta_for(working, mv))
                .collect()
        } else {
            candidates
                .iter()
                .map(|mv| calculator.delta_for(working, mv))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let deltas: Vec<HardSoftScore> = candidates
            .iter()
            .map(|mv| calculator.delta_for(working, mv))
            .collect();

        candidates
            .into_iter()
            .zip(deltas)
            .max_by_key(|&(_, delta)| delta)
    }
}

/// Mutable acceptance-policy state for one solve.
enum AcceptanceState {
    HillClimbing,
    SimulatedAnnealing {
        temperature: f64,
        cooling_rate: f64,
        min_temperature: f64,
    },
    Tabu {
        queue: VecDeque<String>,
        set: HashSet<String>,
        tenure: usize,
    },
}

impl AcceptanceState {
    fn new(policy: &AcceptancePolicy) -> Self {
        match *policy {
            AcceptancePolicy::HillClimbing => AcceptanceState::HillClimbing,
            AcceptancePolicy::SimulatedAnnealing {
                initial_temperature,
                cooling_rate,
                min_temperature,
            } => AcceptanceState::SimulatedAnnealing {
                temperature: initial_temperature,
                cooling_rate,
                min_temperature,
            },
            AcceptancePolicy::Tabu { tenure } => AcceptanceState::Tabu {
                queue: VecDeque::with_capacity(tenure),
                set: HashSet::with_capacity(tenure),
                tenure,
            },
        }
    }

    fn accepts<R: Rng>(
        &mut self,
        mv: &Move,
        delta: HardSoftScore,
        current: HardSoftScore,
        best: HardSoftScore,
        rng: &mut R,
    ) -> bool {
        match self {
            AcceptanceState::HillClimbing => delta >= HardSoftScore::ZERO,
            AcceptanceState::SimulatedAnnealing { temperature, .. } => {
                if delta >= HardSoftScore::ZERO {
                    return true;
                }
                // Metropolis criterion on a flattened delta: hard
                // violations dominate the exponent.
                let units = delta.hard as f64 * SA_HARD_WEIGHT + delta.soft as f64;
                let probability = (units / *temperature).exp();
                rng.random_range(0.0..1.0) < probability
            }
            AcceptanceState::Tabu { set, .. } => {
                let aspires = current + delta > best;
                if set.contains(&mv.key()) {
                    // Reverting a recent move is forbidden unless it
                    // sets a new global best.
                    aspires
                } else {
                    delta >= HardSoftScore::ZERO || aspires
                }
            }
        }
    }

    fn cool(&mut self) {
        if let AcceptanceState::SimulatedAnnealing {
            temperature,
            cooling_rate,
            min_temperature,
        } = self
        {
            *temperature = (*temperature * *cooling_rate).max(*min_temperature);
        }
    }

    fn record(&mut self, reversal_key: String) {
        if let AcceptanceState::Tabu { queue, set, tenure } = self {
            if queue.len() >= *tenure {
                if let Some(expired) = queue.pop_front() {
                    set.remove(&expired);
                }
            }
            set.insert(reversal_key.clone());
            queue.push_back(reversal_key);
        }
    }
}
