//! Move representation, application, and undo.

use crate::domain::{Lesson, PlanningVars};

/// Which decision variable a [`Move::Change`] rewrites, and to what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangedVariable {
    Timeslot(usize),
    Room(usize),
}

/// An atomic proposed mutation to the working assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Reassign one variable of one lesson to a different value from
    /// the candidate set.
    Change {
        lesson: usize,
        variable: ChangedVariable,
    },
    /// Exchange the (timeslot, room) pairs of two lessons.
    Swap { a: usize, b: usize },
}

impl Move {
    /// Applies the move and returns the token that restores the exact
    /// prior assignment.
    pub fn apply(&self, lessons: &mut [Lesson]) -> Undo {
        match *self {
            Move::Change { lesson, variable } => {
                let undo = Undo {
                    first: (lesson, lessons[lesson].vars()),
                    second: None,
                };
                match variable {
                    ChangedVariable::Timeslot(t) => lessons[lesson].timeslot = Some(t),
                    ChangedVariable::Room(r) => lessons[lesson].room = Some(r),
                }
                undo
            }
            Move::Swap { a, b } => {
                let undo = Undo {
                    first: (a, lessons[a].vars()),
                    second: Some((b, lessons[b].vars())),
                };
                let vars_a = lessons[a].vars();
                let vars_b = lessons[b].vars();
                lessons[a].set_vars(vars_b);
                lessons[b].set_vars(vars_a);
                undo
            }
        }
    }

    /// Key identifying this move's target state, used for tabu lookups.
    /// A swap is keyed on the sorted lesson pair and is its own inverse.
    pub fn key(&self) -> String {
        match *self {
            Move::Change {
                lesson,
                variable: ChangedVariable::Timeslot(t),
            } => format!("timeslot_{lesson}_{t}"),
            Move::Change {
                lesson,
                variable: ChangedVariable::Room(r),
            } => format!("room_{lesson}_{r}"),
            Move::Swap { a, b } => format!("swap_{}_{}", a.min(b), a.max(b)),
        }
    }

    /// Key of the move that would revert this one, read against the
    /// current assignment before application.
    pub fn inverse_key(&self, lessons: &[Lesson]) -> String {
        match *self {
            Move::Change {
                lesson,
                variable: ChangedVariable::Timeslot(_),
            } => format!("timeslot_{lesson}_{}", fmt_value(lessons[lesson].timeslot)),
            Move::Change {
                lesson,
                variable: ChangedVariable::Room(_),
            } => format!("room_{lesson}_{}", fmt_value(lessons[lesson].room)),
            Move::Swap { .. } => self.key(),
        }
    }
}

fn fmt_value(value: Option<usize>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".into(),
    }
}

/// Restores the assignment a [`Move::apply`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    first: (usize, PlanningVars),
    second: Option<(usize, PlanningVars)>,
}

impl Undo {
    pub fn revert(&self, lessons: &mut [Lesson]) {
        let (index, vars) = self.first;
        lessons[index].set_vars(vars);
        if let Some((index, vars)) = self.second {
            lessons[index].set_vars(vars);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lessons() -> Vec<Lesson> {
        let mut a = Lesson::new("L1", "Math", "T1", "G1");
        a.timeslot = Some(0);
        a.room = Some(0);
        let mut b = Lesson::new("L2", "Physics", "T2", "G2");
        b.timeslot = Some(1);
        b.room = Some(1);
        vec![a, b]
    }

    #[test]
    fn test_change_apply_and_revert() {
        let mut population = lessons();
        let mv = Move::Change {
            lesson: 0,
            variable: ChangedVariable::Timeslot(1),
        };
        let undo = mv.apply(&mut population);
        assert_eq!(population[0].timeslot, Some(1));
        assert_eq!(population[0].room, Some(0));

        undo.revert(&mut population);
        assert_eq!(population, lessons());
    }

    #[test]
    fn test_change_from_unassigned() {
        let mut population = lessons();
        population[0].timeslot = None;
        let mv = Move::Change {
            lesson: 0,
            variable: ChangedVariable::Timeslot(1),
        };
        let undo = mv.apply(&mut population);
        assert_eq!(population[0].timeslot, Some(1));
        undo.revert(&mut population);
        assert_eq!(population[0].timeslot, None);
    }

    #[test]
    fn test_swap_exchanges_both_variables() {
        let mut population = lessons();
        let mv = Move::Swap { a: 0, b: 1 };
        mv.apply(&mut population);
        assert_eq!(population[0].timeslot, Some(1));
        assert_eq!(population[0].room, Some(1));
        assert_eq!(population[1].timeslot, Some(0));
        assert_eq!(population[1].room, Some(0));
    }

    #[test]
    fn test_double_swap_restores_assignment() {
        let mut population = lessons();
        let mv = Move::Swap { a: 0, b: 1 };
        mv.apply(&mut population);
        mv.apply(&mut population);
        assert_eq!(population, lessons());
    }

    #[test]
    fn test_swap_key_is_order_independent() {
        assert_eq!(
            Move::Swap { a: 3, b: 1 }.key(),
            Move::Swap { a: 1, b: 3 }.key()
        );
    }

    #[test]
    fn test_inverse_key_points_at_prior_value() {
        let population = lessons();
        let mv = Move::Change {
            lesson: 0,
            variable: ChangedVariable::Timeslot(1),
        };
        assert_eq!(mv.key(), "timeslot_0_1");
        assert_eq!(mv.inverse_key(&population), "timeslot_0_0");

        let mut unassigned = population;
        unassigned[0].room = None;
        let mv = Move::Change {
            lesson: 0,
            variable: ChangedVariable::Room(1),
        };
        assert_eq!(mv.inverse_key(&unassigned), "room_0_none");
    }
}
