//! Request/solution wire format.
//!
//! Serde DTOs for submitting a problem and returning its solution:
//! flat `timeslotList`/`roomList` fact lists, a `lessonList` whose
//! entries reference facts by index, and on the way out the score
//! string plus solver status. Field names are camelCase to match the
//! JSON payloads the surrounding services exchange. A submission
//! round-trips losslessly through [`TimetableDto::into_problem`] and
//! [`TimetableDto::from_problem`].

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{Lesson, Room, Timeslot, TimetableProblem};
use crate::error::InvalidProblem;
use crate::solver::SolveResult;

pub const STATUS_SOLVED: &str = "SOLVED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotDto {
    /// Upper-case day name, e.g. `"MONDAY"`.
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Omitted on submission = derive the default band from the start
    /// hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference_bonus: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDto {
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: String,
    pub subject: String,
    pub teacher: String,
    pub student_group: String,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: u32,
    #[serde(default = "default_hint")]
    pub difficulty_weight: f64,
    #[serde(default = "default_hint")]
    pub satisfaction_score: f64,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_timeslot_ref: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_room_ref: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeslot_ref: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_ref: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableDto {
    pub timeslot_list: Vec<TimeslotDto>,
    pub room_list: Vec<RoomDto>,
    pub lesson_list: Vec<LessonDto>,
    /// Score string such as `"0hard/100soft"`, present on solutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver_status: Option<String>,
}

fn default_duration_hours() -> u32 {
    2
}

fn default_hint() -> f64 {
    0.5
}

impl TimetableDto {
    /// Builds and validates the domain problem this submission
    /// describes.
    pub fn into_problem(self) -> Result<TimetableProblem, InvalidProblem> {
        let timeslots = self
            .timeslot_list
            .into_iter()
            .enumerate()
            .map(|(index, dto)| {
                let day = parse_day(&dto.day_of_week).ok_or_else(|| {
                    InvalidProblem::UnknownDayOfWeek {
                        index,
                        value: dto.day_of_week.clone(),
                    }
                })?;
                Ok(match dto.preference_bonus {
                    Some(bonus) => Timeslot::with_preference(day, dto.start_time, dto.end_time, bonus),
                    None => Timeslot::new(day, dto.start_time, dto.end_time),
                })
            })
            .collect::<Result<Vec<_>, InvalidProblem>>()?;

        let rooms = self
            .room_list
            .into_iter()
            .map(|dto| Room::new(dto.name, dto.capacity))
            .collect();

        let lessons = self
            .lesson_list
            .into_iter()
            .map(|dto| Lesson {
                id: dto.id,
                subject: dto.subject,
                teacher: dto.teacher,
                student_group: dto.student_group,
                duration_hours: dto.duration_hours,
                difficulty_weight: dto.difficulty_weight,
                satisfaction_score: dto.satisfaction_score,
                pinned: dto.pinned,
                pinned_timeslot: dto.pinned_timeslot_ref,
                pinned_room: dto.pinned_room_ref,
                timeslot: dto.timeslot_ref,
                room: dto.room_ref,
            })
            .collect();

        let problem = TimetableProblem::new(rooms, timeslots, lessons);
        problem.validate()?;
        Ok(problem)
    }

    /// Serializes a problem back to its submission shape, with every
    /// derived field made explicit.
    pub fn from_problem(problem: &TimetableProblem) -> Self {
        Self {
            timeslot_list: problem.timeslots.iter().map(timeslot_dto).collect(),
            room_list: problem.rooms.iter().map(room_dto).collect(),
            lesson_list: problem.lessons.iter().map(lesson_dto).collect(),
            score: None,
            solver_status: None,
        }
    }

    /// Serializes a solve result against its problem's facts.
    pub fn from_solution(problem: &TimetableProblem, result: &SolveResult) -> Self {
        let status = if result.cancelled {
            STATUS_CANCELLED
        } else {
            STATUS_SOLVED
        };
        Self {
            timeslot_list: problem.timeslots.iter().map(timeslot_dto).collect(),
            room_list: problem.rooms.iter().map(room_dto).collect(),
            lesson_list: result.lessons.iter().map(lesson_dto).collect(),
            score: Some(result.score.to_string()),
            solver_status: Some(status.into()),
        }
    }
}

fn timeslot_dto(slot: &Timeslot) -> TimeslotDto {
    TimeslotDto {
        day_of_week: day_name(slot.day_of_week).into(),
        start_time: slot.start_time,
        end_time: slot.end_time,
        preference_bonus: Some(slot.preference_bonus),
    }
}

fn room_dto(room: &Room) -> RoomDto {
    RoomDto {
        name: room.name.clone(),
        capacity: room.capacity,
    }
}

fn lesson_dto(lesson: &Lesson) -> LessonDto {
    LessonDto {
        id: lesson.id.clone(),
        subject: lesson.subject.clone(),
        teacher: lesson.teacher.clone(),
        student_group: lesson.student_group.clone(),
        duration_hours: lesson.duration_hours,
        difficulty_weight: lesson.difficulty_weight,
        satisfaction_score: lesson.satisfaction_score,
        pinned: lesson.pinned,
        pinned_timeslot_ref: lesson.pinned_timeslot,
        pinned_room_ref: lesson.pinned_room,
        timeslot_ref: lesson.timeslot,
        room_ref: lesson.room,
    }
}

fn parse_day(value: &str) -> Option<Weekday> {
    const DAYS: [(&str, Weekday); 7] = [
        ("MONDAY", Weekday::Mon),
        ("TUESDAY", Weekday::Tue),
        ("WEDNESDAY", Weekday::Wed),
        ("THURSDAY", Weekday::Thu),
        ("FRIDAY", Weekday::Fri),
        ("SATURDAY", Weekday::Sat),
        ("SUNDAY", Weekday::Sun),
    ];
    DAYS.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|&(_, day)| day)
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}
