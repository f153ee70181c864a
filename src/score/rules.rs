//! Named constraint rule functions.
//!
//! Each business rule is one function returning its [`HardSoftScore`]
//! impact for a lesson (unary rules) or an unordered lesson pair (pair
//! rules). The calculator composes them; the names double as the audit
//! labels in [`RuleTally`](super::RuleTally) breakdowns.

use crate::domain::{Lesson, PlanningVars, Room, Timeslot};
use crate::score::HardSoftScore;

pub(crate) const ROOM_CONFLICT: &str = "Room conflict";
pub(crate) const TEACHER_CONFLICT: &str = "Teacher conflict";
pub(crate) const STUDENT_GROUP_CONFLICT: &str = "Student group conflict";
pub(crate) const DURATION_FIT: &str = "Duration fit";
pub(crate) const PINNED_TIMESLOT: &str = "Pinned timeslot";
pub(crate) const PINNED_ROOM: &str = "Pinned room";
pub(crate) const MORNING_PREFERENCE: &str = "Difficult course morning preference";
pub(crate) const MAXIMIZE_SATISFACTION: &str = "Maximize satisfaction";
pub(crate) const TIMESLOT_PREFERENCE: &str = "Timeslot preference";
pub(crate) const TEACHER_SPACING: &str = "Teacher spacing";
pub(crate) const ROOM_FIT: &str = "Room fit";

/// A course counts as difficult from this weight upward.
const DIFFICULT_THRESHOLD: f64 = 0.7;

/// Two same-teacher slots count as consecutive when one's end is within
/// this many minutes of the other's start.
const SPACING_MINUTES: i64 = 15;

/// Per-rule penalty weights and scaling factors.
///
/// Hard weights are violation counts per occurrence; `room_fit_factor`
/// scales the otherwise unbounded capacity reward (the source's raw
/// product at 1.0 — lower it to damp big-room dominance).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleWeights {
    pub room_conflict: i64,
    pub teacher_conflict: i64,
    pub student_group_conflict: i64,
    pub duration_fit: i64,
    pub pinned_mismatch: i64,
    pub room_fit_factor: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            room_conflict: 1,
            teacher_conflict: 1,
            student_group_conflict: 1,
            duration_fit: 50,
            pinned_mismatch: 100,
            room_fit_factor: 1.0,
        }
    }
}

impl RuleWeights {
    pub fn with_room_fit_factor(mut self, factor: f64) -> Self {
        self.room_fit_factor = factor;
        self
    }
}

fn soft_units(value: f64) -> i64 {
    value.round() as i64
}

fn slot(timeslots: &[Timeslot], index: Option<usize>) -> Option<&Timeslot> {
    index.map(|i| &timeslots[i])
}

// ---- unary rules ----

/// Hard: the assigned slot is too short for the lesson.
pub(crate) fn duration_fit(
    lesson: &Lesson,
    vars: PlanningVars,
    timeslots: &[Timeslot],
    weights: &RuleWeights,
) -> HardSoftScore {
    match slot(timeslots, vars.timeslot) {
        Some(s) if s.duration_minutes() < lesson.duration_minutes() => {
            HardSoftScore::of_hard(-weights.duration_fit)
        }
        _ => HardSoftScore::ZERO,
    }
}

/// Hard: a pinned lesson drifted off its pinned timeslot.
pub(crate) fn pinned_timeslot(
    lesson: &Lesson,
    vars: PlanningVars,
    weights: &RuleWeights,
) -> HardSoftScore {
    if lesson.pinned && lesson.pinned_timeslot.is_some() && vars.timeslot != lesson.pinned_timeslot
    {
        HardSoftScore::of_hard(-weights.pinned_mismatch)
    } else {
        HardSoftScore::ZERO
    }
}

/// Hard: a pinned lesson drifted off its pinned room.
pub(crate) fn pinned_room(
    lesson: &Lesson,
    vars: PlanningVars,
    weights: &RuleWeights,
) -> HardSoftScore {
    if lesson.pinned && lesson.pinned_room.is_some() && vars.room != lesson.pinned_room {
        HardSoftScore::of_hard(-weights.pinned_mismatch)
    } else {
        HardSoftScore::ZERO
    }
}

/// Soft: difficult courses placed outside the morning are penalized.
pub(crate) fn morning_preference(
    lesson: &Lesson,
    vars: PlanningVars,
    timeslots: &[Timeslot],
) -> HardSoftScore {
    match slot(timeslots, vars.timeslot) {
        Some(s) if lesson.difficulty_weight >= DIFFICULT_THRESHOLD && !s.is_morning() => {
            HardSoftScore::of_soft(-soft_units(lesson.difficulty_weight * 10.0))
        }
        _ => HardSoftScore::ZERO,
    }
}

/// Soft: reward satisfaction-weighted slot desirability.
pub(crate) fn maximize_satisfaction(
    lesson: &Lesson,
    vars: PlanningVars,
    timeslots: &[Timeslot],
) -> HardSoftScore {
    match slot(timeslots, vars.timeslot) {
        Some(s) => HardSoftScore::of_soft(soft_units(
            lesson.satisfaction_score * s.preference_bonus * 10.0,
        )),
        None => HardSoftScore::ZERO,
    }
}

/// Soft: reward desirable slots regardless of the lesson.
pub(crate) fn timeslot_preference(vars: PlanningVars, timeslots: &[Timeslot]) -> HardSoftScore {
    match slot(timeslots, vars.timeslot) {
        Some(s) => HardSoftScore::of_soft(soft_units(s.preference_bonus * 5.0)),
        None => HardSoftScore::ZERO,
    }
}

/// Soft: reward placing weight-heavy lessons in large rooms.
pub(crate) fn room_fit(
    lesson: &Lesson,
    vars: PlanningVars,
    rooms: &[Room],
    weights: &RuleWeights,
) -> HardSoftScore {
    match vars.room {
        Some(r) => HardSoftScore::of_soft(soft_units(
            lesson.difficulty_weight * f64::from(rooms[r].capacity) * weights.room_fit_factor,
        )),
        None => HardSoftScore::ZERO,
    }
}

// ---- pair rules ----

fn overlapping(
    va: PlanningVars,
    vb: PlanningVars,
    timeslots: &[Timeslot],
) -> bool {
    match (slot(timeslots, va.timeslot), slot(timeslots, vb.timeslot)) {
        (Some(a), Some(b)) => a.overlaps(b),
        _ => false,
    }
}

/// Hard: one room, two lessons, overlapping slots.
pub(crate) fn room_conflict(
    va: PlanningVars,
    vb: PlanningVars,
    timeslots: &[Timeslot],
    weights: &RuleWeights,
) -> HardSoftScore {
    let same_room = matches!((va.room, vb.room), (Some(a), Some(b)) if a == b);
    if same_room && overlapping(va, vb, timeslots) {
        HardSoftScore::of_hard(-weights.room_conflict)
    } else {
        HardSoftScore::ZERO
    }
}

/// Hard: one teacher, two overlapping lessons.
pub(crate) fn teacher_conflict(
    a: &Lesson,
    va: PlanningVars,
    b: &Lesson,
    vb: PlanningVars,
    timeslots: &[Timeslot],
    weights: &RuleWeights,
) -> HardSoftScore {
    if a.teacher == b.teacher && overlapping(va, vb, timeslots) {
        HardSoftScore::of_hard(-weights.teacher_conflict)
    } else {
        HardSoftScore::ZERO
    }
}

/// Hard: one student group, two overlapping lessons.
pub(crate) fn student_group_conflict(
    a: &Lesson,
    va: PlanningVars,
    b: &Lesson,
    vb: PlanningVars,
    timeslots: &[Timeslot],
    weights: &RuleWeights,
) -> HardSoftScore {
    if a.student_group == b.student_group && overlapping(va, vb, timeslots) {
        HardSoftScore::of_hard(-weights.student_group_conflict)
    } else {
        HardSoftScore::ZERO
    }
}

/// Soft: back-to-back lessons for one teacher on one day cost a break.
pub(crate) fn teacher_spacing(
    a: &Lesson,
    va: PlanningVars,
    b: &Lesson,
    vb: PlanningVars,
    timeslots: &[Timeslot],
) -> HardSoftScore {
    if a.teacher != b.teacher {
        return HardSoftScore::ZERO;
    }
    let (sa, sb) = match (slot(timeslots, va.timeslot), slot(timeslots, vb.timeslot)) {
        (Some(sa), Some(sb)) => (sa, sb),
        _ => return HardSoftScore::ZERO,
    };
    if sa.day_of_week != sb.day_of_week {
        return HardSoftScore::ZERO;
    }
    let ab = (sb.start_time - sa.end_time).num_minutes().abs();
    let ba = (sa.start_time - sb.end_time).num_minutes().abs();
    if ab <= SPACING_MINUTES || ba <= SPACING_MINUTES {
        HardSoftScore::of_soft(-2)
    } else {
        HardSoftScore::ZERO
    }
}
