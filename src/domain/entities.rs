//! Rooms, timeslots, and lessons.

use chrono::{NaiveTime, Timelike, Weekday};

/// A physical room with a fixed capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Unique room name.
    pub name: String,
    /// Seating capacity. Must be positive.
    pub capacity: u32,
}

impl Room {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// A weekly recurring time window on a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeslot {
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Desirability of the slot. Higher is more desirable; never negative.
    pub preference_bonus: f64,
}

impl Timeslot {
    /// Creates a timeslot with the default preference bonus for its
    /// start hour: morning slots (8-12) rate 1.0, lunch (12-14) 0.7,
    /// anything else 0.5.
    pub fn new(day_of_week: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let preference_bonus = default_preference(start_time);
        Self {
            day_of_week,
            start_time,
            end_time,
            preference_bonus,
        }
    }

    /// Creates a timeslot with an explicit preference bonus.
    pub fn with_preference(
        day_of_week: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        preference_bonus: f64,
    ) -> Self {
        Self {
            day_of_week,
            start_time,
            end_time,
            preference_bonus,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    pub fn is_morning(&self) -> bool {
        self.start_time.hour() < 12
    }

    /// Whether two slots intersect as half-open [start, end) intervals
    /// on the same day. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Timeslot) -> bool {
        self.day_of_week == other.day_of_week
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

fn default_preference(start_time: NaiveTime) -> f64 {
    match start_time.hour() {
        8..=11 => 1.0,
        12..=13 => 0.7,
        _ => 0.5,
    }
}

/// The two decision variables of a lesson.
///
/// Both are indexes into the owning problem's timeslot/room lists;
/// `None` means unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanningVars {
    pub timeslot: Option<usize>,
    pub room: Option<usize>,
}

/// A lesson to be placed into a (timeslot, room) pair.
///
/// Everything except [`Lesson::timeslot`] and [`Lesson::room`] is
/// read-only during search.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    /// Unique, stable id within a problem instance.
    pub id: String,
    pub subject: String,
    pub teacher: String,
    pub student_group: String,
    pub duration_hours: u32,

    /// Difficulty in [0, 1]; higher = harder course.
    pub difficulty_weight: f64,
    /// Expected satisfaction in [0, 1]; higher = more satisfying.
    pub satisfaction_score: f64,

    /// Caller-controlled pin: the lesson is never the mutated side of a
    /// move, and deviating from a set pinned value is a heavy hard
    /// penalty rather than a structural ban.
    pub pinned: bool,
    pub pinned_timeslot: Option<usize>,
    pub pinned_room: Option<usize>,

    /// Decision variable: index into the problem's timeslot list.
    pub timeslot: Option<usize>,
    /// Decision variable: index into the problem's room list.
    pub room: Option<usize>,
}

impl Lesson {
    /// Creates an unpinned, unassigned lesson with neutral hints:
    /// two-hour duration, difficulty 0.5, satisfaction 0.5.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
        student_group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            teacher: teacher.into(),
            student_group: student_group.into(),
            duration_hours: 2,
            difficulty_weight: 0.5,
            satisfaction_score: 0.5,
            pinned: false,
            pinned_timeslot: None,
            pinned_room: None,
            timeslot: None,
            room: None,
        }
    }

    pub fn with_duration_hours(mut self, hours: u32) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn with_difficulty(mut self, weight: f64) -> Self {
        self.difficulty_weight = weight;
        self
    }

    pub fn with_satisfaction(mut self, score: f64) -> Self {
        self.satisfaction_score = score;
        self
    }

    /// Pins the lesson to the given timeslot/room indexes and assigns
    /// them as the live values.
    pub fn pinned_to(mut self, timeslot: Option<usize>, room: Option<usize>) -> Self {
        self.pinned = true;
        self.pinned_timeslot = timeslot;
        self.pinned_room = room;
        self.timeslot = timeslot;
        self.room = room;
        self
    }

    pub fn vars(&self) -> PlanningVars {
        PlanningVars {
            timeslot: self.timeslot,
            room: self.room,
        }
    }

    pub fn set_vars(&mut self, vars: PlanningVars) {
        self.timeslot = vars.timeslot;
        self.room = vars.room;
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.duration_hours) * 60
    }
}
