//! Local-search school timetabling solver.
//!
//! Assigns a set of lessons to (timeslot, room) pairs so that hard
//! feasibility rules are never violated and a weighted combination of
//! soft preferences is maximized. The crate provides:
//!
//! - **Domain model**: immutable problem facts ([`domain::Room`],
//!   [`domain::Timeslot`]) and planning entities ([`domain::Lesson`])
//!   whose two decision variables — assigned timeslot and room — are
//!   the unknowns to solve for.
//! - **Score calculator**: maps an assignment to a lexicographic
//!   [`score::HardSoftScore`], with incremental delta evaluation so a
//!   single move never triggers a full rescore.
//! - **Move generator**: change/swap perturbations over the lesson
//!   population with pluggable selection policies.
//! - **Local search engine**: construction heuristic plus an
//!   iterate/accept/snapshot loop under time, iteration, and
//!   convergence budgets, with cooperative cancellation.
//! - **Wire format**: serde DTOs that round-trip a problem submission
//!   and its solved assignment losslessly.
//!
//! The engine is single-threaded per solve: one working assignment is
//! mutated by one sequential stream of moves. Parallelism is applied
//! across independent solves (one [`solver::SolverSession`] each) or,
//! with the `parallel` feature, to read-only evaluation of a candidate
//! move batch before a single-writer commit.

pub mod domain;
pub mod error;
pub mod moves;
pub mod score;
pub mod solver;
pub mod wire;
