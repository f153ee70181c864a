//! Timetabling domain model.
//!
//! Problem facts ([`Room`], [`Timeslot`]) are immutable for the duration
//! of a solve. [`Lesson`] is the planning entity: its two decision
//! variables — the assigned timeslot and room, held as indexes into the
//! problem's fact lists — are the only fields the engine mutates.
//!
//! The full entity population is built once per solve from a validated
//! [`TimetableProblem`]; no entity is created or destroyed mid-solve.

mod entities;
mod problem;

pub use entities::{Lesson, PlanningVars, Room, Timeslot};
pub use problem::TimetableProblem;
