//! Problem rejection taxonomy.
//!
//! An [`InvalidProblem`] is raised before solving starts and is never
//! silently repaired. Infeasible or cancelled solves are not errors:
//! they complete normally and are flagged on the returned
//! [`SolveResult`](crate::solver::SolveResult).

use chrono::NaiveTime;
use thiserror::Error;

/// A problem instance that cannot be solved as submitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidProblem {
    /// The lesson list is empty.
    #[error("problem has no lessons")]
    NoLessons,

    /// The room list is empty.
    #[error("problem has no rooms")]
    NoRooms,

    /// The timeslot list is empty.
    #[error("problem has no timeslots")]
    NoTimeslots,

    /// Two lessons share the same id.
    #[error("duplicate lesson id `{0}`")]
    DuplicateLessonId(String),

    /// A timeslot ends at or before it starts.
    #[error("timeslot {index}: end time {end} is not after start time {start}")]
    MalformedTimeslot {
        index: usize,
        start: NaiveTime,
        end: NaiveTime,
    },

    /// A timeslot carries a negative preference bonus.
    #[error("timeslot {index}: preference bonus {bonus} is negative")]
    NegativePreferenceBonus { index: usize, bonus: f64 },

    /// A wire-format day-of-week string is not a recognized day.
    #[error("timeslot {index}: unknown day of week `{value}`")]
    UnknownDayOfWeek { index: usize, value: String },

    /// A lesson references a timeslot or room outside the problem's lists.
    #[error("lesson `{lesson}`: {kind} reference {index} is out of range")]
    ReferenceOutOfRange {
        lesson: String,
        kind: &'static str,
        index: usize,
    },

    /// An optimization hint is outside [0, 1].
    #[error("lesson `{lesson}`: {field} must be within [0, 1], got {value}")]
    HintOutOfRange {
        lesson: String,
        field: &'static str,
        value: f64,
    },

    /// A room cannot hold anyone.
    #[error("room `{0}` has zero capacity")]
    ZeroCapacity(String),
}
