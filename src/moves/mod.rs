//! Candidate perturbations of the working assignment.
//!
//! A [`Move`] is an atomic proposed mutation: reassign one lesson's
//! timeslot or room ([`Move::Change`]) or exchange two lessons' full
//! (timeslot, room) pairs ([`Move::Swap`]). The [`MoveGenerator`]
//! samples moves under a pluggable [`SelectionPolicy`]; pinned lessons
//! are never the mutated side of a move, though they still participate
//! passively in conflict checks.

mod generator;
mod types;

pub use generator::{MoveGenerator, SelectionPolicy};
pub use types::{ChangedVariable, Move, Undo};
