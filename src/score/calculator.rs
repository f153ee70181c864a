//! Full and incremental score calculation.

use crate::domain::{Lesson, PlanningVars, Room, Timeslot, TimetableProblem};
use crate::moves::{ChangedVariable, Move};
use crate::score::rules::{self, RuleWeights};
use crate::score::HardSoftScore;

/// One rule's contribution to a full assignment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleTally {
    pub rule: &'static str,
    pub score: HardSoftScore,
}

/// Scores lesson assignments against the problem's facts.
///
/// Borrows the fact lists of one [`TimetableProblem`]; the lesson slice
/// passed to each call is the engine's working assignment. Pair rules
/// are counted once per unordered pair.
///
/// [`ScoreCalculator::delta_for`] is the incremental path: it evaluates
/// only the moved lessons' unary rules and their pair terms against the
/// rest of the population, in O(n) per move instead of O(n²).
pub struct ScoreCalculator<'p> {
    rooms: &'p [Room],
    timeslots: &'p [Timeslot],
    weights: RuleWeights,
}

impl<'p> ScoreCalculator<'p> {
    pub fn new(problem: &'p TimetableProblem) -> Self {
        Self::with_weights(problem, RuleWeights::default())
    }

    pub fn with_weights(problem: &'p TimetableProblem, weights: RuleWeights) -> Self {
        Self {
            rooms: &problem.rooms,
            timeslots: &problem.timeslots,
            weights,
        }
    }

    /// Scores the full assignment from scratch.
    pub fn calculate(&self, lessons: &[Lesson]) -> HardSoftScore {
        let mut total = HardSoftScore::ZERO;
        for lesson in lessons {
            total += self.unary(lesson, lesson.vars());
        }
        for i in 0..lessons.len() {
            for j in (i + 1)..lessons.len() {
                total += self.pair(
                    &lessons[i],
                    lessons[i].vars(),
                    &lessons[j],
                    lessons[j].vars(),
                );
            }
        }
        total
    }

    /// Score delta of applying `mv`, without applying it.
    ///
    /// Equals `calculate(after) - calculate(before)` for every move:
    /// only constraints touching the moved lesson(s) are evaluated,
    /// with the pair between two swapped lessons counted once.
    pub fn delta_for(&self, lessons: &[Lesson], mv: &Move) -> HardSoftScore {
        match *mv {
            Move::Change { lesson, variable } => {
                let mut after = lessons[lesson].vars();
                match variable {
                    ChangedVariable::Timeslot(t) => after.timeslot = Some(t),
                    ChangedVariable::Room(r) => after.room = Some(r),
                }
                let affected = [lesson];
                self.scoped(lessons, &affected, &[(lesson, after)])
                    - self.scoped(lessons, &affected, &[])
            }
            Move::Swap { a, b } => {
                let affected = [a, b];
                let overrides = [(a, lessons[b].vars()), (b, lessons[a].vars())];
                self.scoped(lessons, &affected, &overrides)
                    - self.scoped(lessons, &affected, &[])
            }
        }
    }

    /// Hard-score contribution of a single lesson: its unary hard rules
    /// plus every conflict pair it participates in. Used to steer move
    /// selection toward offenders.
    pub fn hard_impact(&self, lessons: &[Lesson], lesson: usize) -> i64 {
        self.scoped(lessons, &[lesson], &[]).hard
    }

    /// Hard-score contribution `lesson` would have with `vars` in place
    /// of its current assignment. The construction heuristic probes
    /// candidate placements with this.
    pub fn hard_impact_with(&self, lessons: &[Lesson], lesson: usize, vars: PlanningVars) -> i64 {
        self.scoped(lessons, &[lesson], &[(lesson, vars)]).hard
    }

    /// Per-rule audit of a full assignment, in a stable rule order.
    pub fn breakdown(&self, lessons: &[Lesson]) -> Vec<RuleTally> {
        let w = &self.weights;
        let mut room_conflict = HardSoftScore::ZERO;
        let mut teacher_conflict = HardSoftScore::ZERO;
        let mut group_conflict = HardSoftScore::ZERO;
        let mut duration = HardSoftScore::ZERO;
        let mut pinned_slot = HardSoftScore::ZERO;
        let mut pinned_room = HardSoftScore::ZERO;
        let mut morning = HardSoftScore::ZERO;
        let mut satisfaction = HardSoftScore::ZERO;
        let mut slot_preference = HardSoftScore::ZERO;
        let mut spacing = HardSoftScore::ZERO;
        let mut room_fit = HardSoftScore::ZERO;

        for lesson in lessons {
            let vars = lesson.vars();
            duration += rules::duration_fit(lesson, vars, self.timeslots, w);
            pinned_slot += rules::pinned_timeslot(lesson, vars, w);
            pinned_room += rules::pinned_room(lesson, vars, w);
            morning += rules::morning_preference(lesson, vars, self.timeslots);
            satisfaction += rules::maximize_satisfaction(lesson, vars, self.timeslots);
            slot_preference += rules::timeslot_preference(vars, self.timeslots);
            room_fit += rules::room_fit(lesson, vars, self.rooms, w);
        }
        for i in 0..lessons.len() {
            for j in (i + 1)..lessons.len() {
                let (a, b) = (&lessons[i], &lessons[j]);
                let (va, vb) = (a.vars(), b.vars());
                room_conflict += rules::room_conflict(va, vb, self.timeslots, w);
                teacher_conflict += rules::teacher_conflict(a, va, b, vb, self.timeslots, w);
                group_conflict += rules::student_group_conflict(a, va, b, vb, self.timeslots, w);
                spacing += rules::teacher_spacing(a, va, b, vb, self.timeslots);
            }
        }

        vec![
            RuleTally { rule: rules::ROOM_CONFLICT, score: room_conflict },
            RuleTally { rule: rules::TEACHER_CONFLICT, score: teacher_conflict },
            RuleTally { rule: rules::STUDENT_GROUP_CONFLICT, score: group_conflict },
            RuleTally { rule: rules::DURATION_FIT, score: duration },
            RuleTally { rule: rules::PINNED_TIMESLOT, score: pinned_slot },
            RuleTally { rule: rules::PINNED_ROOM, score: pinned_room },
            RuleTally { rule: rules::MORNING_PREFERENCE, score: morning },
            RuleTally { rule: rules::MAXIMIZE_SATISFACTION, score: satisfaction },
            RuleTally { rule: rules::TIMESLOT_PREFERENCE, score: slot_preference },
            RuleTally { rule: rules::TEACHER_SPACING, score: spacing },
            RuleTally { rule: rules::ROOM_FIT, score: room_fit },
        ]
    }

    /// Score contribution of `affected` lessons only: their unary rules
    /// plus their pair terms against the whole population, each pair
    /// once. `overrides` substitutes planning variables without
    /// mutating the assignment.
    fn scoped(
        &self,
        lessons: &[Lesson],
        affected: &[usize],
        overrides: &[(usize, PlanningVars)],
    ) -> HardSoftScore {
        let vars_of = |i: usize| {
            overrides
                .iter()
                .find(|(j, _)| *j == i)
                .map(|(_, v)| *v)
                .unwrap_or_else(|| lessons[i].vars())
        };

        let mut total = HardSoftScore::ZERO;
        for &i in affected {
            total += self.unary(&lessons[i], vars_of(i));
            for j in 0..lessons.len() {
                // A pair inside the affected set is visited from both
                // sides; keep only the visit from the lower index.
                if j == i || (affected.contains(&j) && j < i) {
                    continue;
                }
                total += self.pair(&lessons[i], vars_of(i), &lessons[j], vars_of(j));
            }
        }
        total
    }

    fn unary(&self, lesson: &Lesson, vars: PlanningVars) -> HardSoftScore {
        let w = &self.weights;
        rules::duration_fit(lesson, vars, self.timeslots, w)
            + rules::pinned_timeslot(lesson, vars, w)
            + rules::pinned_room(lesson, vars, w)
            + rules::morning_preference(lesson, vars, self.timeslots)
            + rules::maximize_satisfaction(lesson, vars, self.timeslots)
            + rules::timeslot_preference(vars, self.timeslots)
            + rules::room_fit(lesson, vars, self.rooms, w)
    }

    fn pair(&self, a: &Lesson, va: PlanningVars, b: &Lesson, vb: PlanningVars) -> HardSoftScore {
        let w = &self.weights;
        rules::room_conflict(va, vb, self.timeslots, w)
            + rules::teacher_conflict(a, va, b, vb, self.timeslots, w)
            + rules::student_group_conflict(a, va, b, vb, self.timeslots, w)
            + rules::teacher_spacing(a, va, b, vb, self.timeslots)
    }
}
