//! Move sampling over the lesson population.

use rand::Rng;

use super::types::{ChangedVariable, Move};
use crate::domain::Lesson;
use crate::score::ScoreCalculator;

/// How the generator picks the lesson a move mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Every movable lesson is equally likely.
    UniformRandom,
    /// Cycle through the movable lessons in order.
    RoundRobin,
    /// Roulette selection weighted toward lessons currently involved
    /// in hard violations. Converges faster on overconstrained
    /// instances and is the recommended default.
    #[default]
    FocusOffenders,
}

/// Produces candidate moves for the engine.
///
/// Pinned lessons are filtered out before selection, so a move never
/// mutates one; the swap side requires both lessons unpinned. Returns
/// `None` when no movable lesson exists or every candidate value is
/// already the current one.
pub struct MoveGenerator {
    policy: SelectionPolicy,
    swap_probability: f64,
    cursor: usize,
}

impl MoveGenerator {
    pub fn new(policy: SelectionPolicy, swap_probability: f64) -> Self {
        Self {
            policy,
            swap_probability,
            cursor: 0,
        }
    }

    pub fn generate<R: Rng>(
        &mut self,
        calculator: &ScoreCalculator<'_>,
        lessons: &[Lesson],
        timeslot_count: usize,
        room_count: usize,
        rng: &mut R,
    ) -> Option<Move> {
        let movable: Vec<usize> = lessons
            .iter()
            .enumerate()
            .filter(|(_, lesson)| !lesson.pinned)
            .map(|(index, _)| index)
            .collect();
        if movable.is_empty() {
            return None;
        }

        if movable.len() >= 2 && rng.random_bool(self.swap_probability) {
            let position = self.pick_position(&movable, calculator, lessons, rng);
            let offset = rng.random_range(1..movable.len());
            let a = movable[position];
            let b = movable[(position + offset) % movable.len()];
            return Some(Move::Swap { a, b });
        }

        let position = self.pick_position(&movable, calculator, lessons, rng);
        let lesson = movable[position];
        let current = &lessons[lesson];

        let sides = if rng.random_bool(0.5) {
            [true, false]
        } else {
            [false, true]
        };
        for timeslot_side in sides {
            if timeslot_side {
                if let Some(t) = pick_distinct(timeslot_count, current.timeslot, rng) {
                    return Some(Move::Change {
                        lesson,
                        variable: ChangedVariable::Timeslot(t),
                    });
                }
            } else if let Some(r) = pick_distinct(room_count, current.room, rng) {
                return Some(Move::Change {
                    lesson,
                    variable: ChangedVariable::Room(r),
                });
            }
        }
        None
    }

    fn pick_position<R: Rng>(
        &mut self,
        movable: &[usize],
        calculator: &ScoreCalculator<'_>,
        lessons: &[Lesson],
        rng: &mut R,
    ) -> usize {
        match self.policy {
            SelectionPolicy::UniformRandom => rng.random_range(0..movable.len()),
            SelectionPolicy::RoundRobin => {
                let position = self.cursor % movable.len();
                self.cursor = self.cursor.wrapping_add(1);
                position
            }
            SelectionPolicy::FocusOffenders => {
                let weights: Vec<f64> = movable
                    .iter()
                    .map(|&index| 1.0 + (-calculator.hard_impact(lessons, index)).max(0) as f64)
                    .collect();
                roulette_select(&weights, rng)
            }
        }
    }
}

/// Roulette wheel selection over non-negative weights.
fn roulette_select<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || weights.is_empty() {
        return 0;
    }
    let mut roll = rng.random_range(0.0..total);
    for (index, weight) in weights.iter().enumerate() {
        roll -= weight;
        if roll <= 0.0 {
            return index;
        }
    }
    weights.len() - 1
}

/// Picks a candidate index distinct from `current`, or `None` if the
/// candidate set offers no different value.
fn pick_distinct<R: Rng>(count: usize, current: Option<usize>, rng: &mut R) -> Option<usize> {
    match count {
        0 => None,
        1 if current == Some(0) => None,
        1 => Some(0),
        _ => {
            let candidate = rng.random_range(0..count);
            if Some(candidate) == current {
                Some((candidate + 1) % count)
            } else {
                Some(candidate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Room, Timeslot, TimetableProblem};
    use chrono::{NaiveTime, Weekday};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn problem(lessons: Vec<Lesson>) -> TimetableProblem {
        TimetableProblem::new(
            vec![Room::new("Room A", 30), Room::new("Room B", 10)],
            vec![
                Timeslot::new(Weekday::Mon, t(8), t(10)),
                Timeslot::new(Weekday::Mon, t(10), t(12)),
                Timeslot::new(Weekday::Tue, t(8), t(10)),
            ],
            lessons,
        )
    }

    fn assigned(id: &str, slot: usize, room: usize) -> Lesson {
        let mut lesson = Lesson::new(id, "Subject", format!("T-{id}"), format!("G-{id}"));
        lesson.timeslot = Some(slot);
        lesson.room = Some(room);
        lesson
    }

    #[test]
    fn test_no_movable_lessons_yields_none() {
        let p = problem(vec![
            Lesson::new("L1", "Math", "T1", "G1").pinned_to(Some(0), Some(0)),
            Lesson::new("L2", "Art", "T2", "G2").pinned_to(Some(1), Some(1)),
        ]);
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::UniformRandom, 0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        assert!(generator
            .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
            .is_none());
    }

    #[test]
    fn test_pinned_lesson_never_mutated() {
        let p = problem(vec![
            Lesson::new("L1", "Math", "T1", "G1").pinned_to(Some(0), Some(0)),
            assigned("L2", 1, 1),
        ]);
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::UniformRandom, 0.9);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let mv = generator
                .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
                .expect("one movable lesson remains");
            match mv {
                Move::Change { lesson, .. } => assert_eq!(lesson, 1),
                // A swap needs two unpinned lessons; it must never appear.
                Move::Swap { .. } => panic!("swap with a pinned lesson generated"),
            }
        }
    }

    #[test]
    fn test_change_targets_are_distinct_from_current() {
        let p = problem(vec![assigned("L1", 0, 0), assigned("L2", 1, 1)]);
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::UniformRandom, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..200 {
            let mv = generator
                .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
                .unwrap();
            if let Move::Change { lesson, variable } = mv {
                match variable {
                    ChangedVariable::Timeslot(t) => assert_ne!(Some(t), p.lessons[lesson].timeslot),
                    ChangedVariable::Room(r) => assert_ne!(Some(r), p.lessons[lesson].room),
                }
            }
        }
    }

    #[test]
    fn test_swap_probability_one_always_swaps() {
        let p = problem(vec![assigned("L1", 0, 0), assigned("L2", 1, 1)]);
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::UniformRandom, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..50 {
            let mv = generator
                .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
                .unwrap();
            match mv {
                Move::Swap { a, b } => assert_ne!(a, b),
                other => panic!("expected swap, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_round_robin_cycles_through_movable() {
        let p = problem(vec![
            assigned("L1", 0, 0),
            assigned("L2", 1, 1),
            assigned("L3", 2, 0),
        ]);
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::RoundRobin, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let mut picked = Vec::new();
        for _ in 0..3 {
            match generator
                .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
                .unwrap()
            {
                Move::Change { lesson, .. } => picked.push(lesson),
                Move::Swap { .. } => unreachable!(),
            }
        }
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2]);
    }

    #[test]
    fn test_focus_offenders_prefers_violators() {
        // L1 and L2 conflict (same room, overlapping); L3 is clean.
        let mut lessons = vec![
            assigned("L1", 0, 0),
            assigned("L2", 0, 0),
            assigned("L3", 2, 1),
        ];
        lessons[2].teacher = "T-L3".into();
        let p = problem(lessons);
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::FocusOffenders, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        let mut offender_picks = 0usize;
        let mut clean_picks = 0usize;
        for _ in 0..300 {
            match generator
                .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
                .unwrap()
            {
                Move::Change { lesson: 2, .. } => clean_picks += 1,
                Move::Change { .. } => offender_picks += 1,
                Move::Swap { .. } => unreachable!(),
            }
        }
        assert!(
            offender_picks > clean_picks,
            "offenders picked {offender_picks} vs clean {clean_picks}"
        );
    }

    #[test]
    fn test_exhausted_candidate_sets_yield_none() {
        let p = TimetableProblem::new(
            vec![Room::new("Room A", 30)],
            vec![Timeslot::new(Weekday::Mon, t(8), t(10))],
            vec![assigned("L1", 0, 0)],
        );
        let calc = ScoreCalculator::new(&p);
        let mut generator = MoveGenerator::new(SelectionPolicy::UniformRandom, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(generator
            .generate(&calc, &p.lessons, p.timeslots.len(), p.rooms.len(), &mut rng)
            .is_none());
    }
}
