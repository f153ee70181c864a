//! Greedy first-fit construction heuristic.

use log::{debug, info};

use crate::domain::{Lesson, PlanningVars, TimetableProblem};
use crate::score::ScoreCalculator;

/// Seeds the working assignment before iterative improvement.
///
/// Pinned values are applied first. Remaining lessons missing either
/// variable are placed in descending difficulty order onto the first
/// (timeslot, room) pair that adds no hard violation; when no such
/// pair exists the least-bad pair is taken and the infeasibility is
/// left for the hard score to report. Deterministic: no randomness.
pub(crate) fn construct(
    problem: &TimetableProblem,
    calculator: &ScoreCalculator<'_>,
    lessons: &mut [Lesson],
) {
    for lesson in lessons.iter_mut() {
        if !lesson.pinned {
            continue;
        }
        if lesson.pinned_timeslot.is_some() {
            lesson.timeslot = lesson.pinned_timeslot;
        }
        if lesson.pinned_room.is_some() {
            lesson.room = lesson.pinned_room;
        }
    }

    let mut pending: Vec<usize> = lessons
        .iter()
        .enumerate()
        .filter(|(_, lesson)| {
            !lesson.pinned && (lesson.timeslot.is_none() || lesson.room.is_none())
        })
        .map(|(index, _)| index)
        .collect();
    pending.sort_by(|&a, &b| {
        lessons[b]
            .difficulty_weight
            .total_cmp(&lessons[a].difficulty_weight)
    });

    let placed = pending.len();
    let mut unfit = 0usize;
    for index in pending {
        let (vars, impact) = best_placement(problem, calculator, lessons, index);
        if impact < 0 {
            unfit += 1;
            debug!(
                "lesson `{}` has no conflict-free placement (hard impact {impact})",
                lessons[index].id
            );
        }
        lessons[index].set_vars(vars);
    }

    info!("construction placed {placed} lessons, {unfit} without a conflict-free slot");
}

/// First (timeslot, room) pair with zero hard impact, in slot-major
/// order; otherwise the pair with the least hard impact.
fn best_placement(
    problem: &TimetableProblem,
    calculator: &ScoreCalculator<'_>,
    lessons: &[Lesson],
    index: usize,
) -> (PlanningVars, i64) {
    let mut best: Option<(PlanningVars, i64)> = None;
    for timeslot in 0..problem.timeslots.len() {
        for room in 0..problem.rooms.len() {
            let vars = PlanningVars {
                timeslot: Some(timeslot),
                room: Some(room),
            };
            let impact = calculator.hard_impact_with(lessons, index, vars);
            if impact == 0 {
                return (vars, 0);
            }
            if best.is_none_or(|(_, known)| impact > known) {
                best = Some((vars, impact));
            }
        }
    }
    // The candidate grid is non-empty for any validated problem.
    best.expect("validated problem has at least one timeslot and room")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Room, Timeslot};
    use chrono::{NaiveTime, Weekday};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    /// The small end-to-end scenario: three lessons, two rooms, two
    /// disjoint slots, shared teacher/group pressure that still admits
    /// a conflict-free assignment.
    fn feasible_problem() -> TimetableProblem {
        TimetableProblem::new(
            vec![Room::new("Room A", 30), Room::new("Room B", 10)],
            vec![
                Timeslot::new(Weekday::Mon, t(8), t(10)),
                Timeslot::new(Weekday::Mon, t(10), t(12)),
            ],
            vec![
                Lesson::new("L1", "Math", "T1", "G1").with_difficulty(0.9),
                Lesson::new("L2", "Physics", "T2", "G1").with_difficulty(0.8),
                Lesson::new("L3", "Chemistry", "T2", "G2").with_difficulty(0.7),
            ],
        )
    }

    #[test]
    fn test_construction_reaches_feasibility() {
        let problem = feasible_problem();
        let calculator = ScoreCalculator::new(&problem);
        let mut lessons = problem.lessons.clone();
        construct(&problem, &calculator, &mut lessons);

        assert!(lessons.iter().all(|l| l.timeslot.is_some() && l.room.is_some()));
        assert_eq!(calculator.calculate(&lessons).hard, 0);
    }

    #[test]
    fn test_overconstrained_instance_stays_infeasible() {
        // One slot for three lessons that all collide there: pigeonhole
        // forces at least one hard violation, reported via the score.
        let mut problem = feasible_problem();
        problem.timeslots.truncate(1);
        let calculator = ScoreCalculator::new(&problem);
        let mut lessons = problem.lessons.clone();
        construct(&problem, &calculator, &mut lessons);

        assert!(lessons.iter().all(|l| l.timeslot.is_some() && l.room.is_some()));
        assert!(calculator.calculate(&lessons).hard <= -1);
    }

    #[test]
    fn test_pinned_values_applied_first() {
        let mut problem = feasible_problem();
        problem.lessons[0] = Lesson::new("L1", "Math", "T1", "G1")
            .with_difficulty(0.9)
            .pinned_to(Some(1), Some(1));
        let calculator = ScoreCalculator::new(&problem);
        let mut lessons = problem.lessons.clone();
        lessons[0].timeslot = None;
        lessons[0].room = None;
        construct(&problem, &calculator, &mut lessons);

        assert_eq!(lessons[0].timeslot, Some(1));
        assert_eq!(lessons[0].room, Some(1));
    }

    #[test]
    fn test_existing_assignments_kept() {
        let mut problem = feasible_problem();
        problem.lessons[2].timeslot = Some(0);
        problem.lessons[2].room = Some(1);
        let calculator = ScoreCalculator::new(&problem);
        let mut lessons = problem.lessons.clone();
        construct(&problem, &calculator, &mut lessons);

        assert_eq!(lessons[2].timeslot, Some(0));
        assert_eq!(lessons[2].room, Some(1));
        assert_eq!(calculator.calculate(&lessons).hard, 0);
    }

    #[test]
    fn test_construction_is_deterministic() {
        let problem = feasible_problem();
        let calculator = ScoreCalculator::new(&problem);
        let mut first = problem.lessons.clone();
        let mut second = problem.lessons.clone();
        construct(&problem, &calculator, &mut first);
        construct(&problem, &calculator, &mut second);
        assert_eq!(first, second);
    }
}
