//! Validated problem instance.

use std::collections::HashSet;

use super::entities::{Lesson, Room, Timeslot};
use crate::error::InvalidProblem;

/// A full timetabling problem: the fact lists plus the lesson
/// population with its initial (possibly partial) assignment.
///
/// Lessons reference timeslots and rooms by index into [`Self::timeslots`]
/// and [`Self::rooms`]. The engine clones [`Self::lessons`] into its
/// working assignment; the facts stay shared and immutable.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveTime, Weekday};
/// use timetable_solver::domain::{Lesson, Room, Timeslot, TimetableProblem};
///
/// let problem = TimetableProblem::new(
///     vec![Room::new("Room A", 30)],
///     vec![Timeslot::new(
///         Weekday::Mon,
///         NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     )],
///     vec![Lesson::new("L1", "Math", "A. Turing", "9A")],
/// );
/// assert!(problem.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableProblem {
    pub rooms: Vec<Room>,
    pub timeslots: Vec<Timeslot>,
    pub lessons: Vec<Lesson>,
}

impl TimetableProblem {
    pub fn new(rooms: Vec<Room>, timeslots: Vec<Timeslot>, lessons: Vec<Lesson>) -> Self {
        Self {
            rooms,
            timeslots,
            lessons,
        }
    }

    /// Rejects empty or malformed instances before any solving starts.
    ///
    /// Checks, in order: non-empty fact and lesson lists, room
    /// capacities, timeslot interval sanity, non-negative preference
    /// bonuses, unique lesson ids, hint ranges, and that every live or
    /// pinned reference points inside the fact lists.
    pub fn validate(&self) -> Result<(), InvalidProblem> {
        if self.lessons.is_empty() {
            return Err(InvalidProblem::NoLessons);
        }
        if self.rooms.is_empty() {
            return Err(InvalidProblem::NoRooms);
        }
        if self.timeslots.is_empty() {
            return Err(InvalidProblem::NoTimeslots);
        }

        for room in &self.rooms {
            if room.capacity == 0 {
                return Err(InvalidProblem::ZeroCapacity(room.name.clone()));
            }
        }

        for (index, slot) in self.timeslots.iter().enumerate() {
            if slot.end_time <= slot.start_time {
                return Err(InvalidProblem::MalformedTimeslot {
                    index,
                    start: slot.start_time,
                    end: slot.end_time,
                });
            }
            if slot.preference_bonus < 0.0 {
                return Err(InvalidProblem::NegativePreferenceBonus {
                    index,
                    bonus: slot.preference_bonus,
                });
            }
        }

        let mut ids = HashSet::with_capacity(self.lessons.len());
        for lesson in &self.lessons {
            if !ids.insert(lesson.id.as_str()) {
                return Err(InvalidProblem::DuplicateLessonId(lesson.id.clone()));
            }
            self.check_hint(lesson, "difficulty_weight", lesson.difficulty_weight)?;
            self.check_hint(lesson, "satisfaction_score", lesson.satisfaction_score)?;

            for (kind, reference) in [
                ("timeslot", lesson.timeslot),
                ("pinned timeslot", lesson.pinned_timeslot),
            ] {
                if let Some(index) = reference {
                    if index >= self.timeslots.len() {
                        return Err(InvalidProblem::ReferenceOutOfRange {
                            lesson: lesson.id.clone(),
                            kind,
                            index,
                        });
                    }
                }
            }
            for (kind, reference) in [("room", lesson.room), ("pinned room", lesson.pinned_room)] {
                if let Some(index) = reference {
                    if index >= self.rooms.len() {
                        return Err(InvalidProblem::ReferenceOutOfRange {
                            lesson: lesson.id.clone(),
                            kind,
                            index,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn check_hint(
        &self,
        lesson: &Lesson,
        field: &'static str,
        value: f64,
    ) -> Result<(), InvalidProblem> {
        if !(0.0..=1.0).contains(&value) {
            return Err(InvalidProblem::HintOutOfRange {
                lesson: lesson.id.clone(),
                field,
                value,
            });
        }
        Ok(())
    }
}
