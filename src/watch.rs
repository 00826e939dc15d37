use std::ops::Index;

use crate::assignment::Assignment;
use crate::clause::Clause;
use crate::clause_database::ClauseDatabase;
use crate::cref::ClauseRef;
use crate::lbool::LBool;
use crate::lit::Lit;

/// Pair of watched slots (positions in the clause).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Watch {
    pub(crate) first: usize,
    pub(crate) second: usize,
}

impl Watch {
    /// The first position and the first one holding a different literal.
    ///
    /// A clause made of a single repeated literal, such as `(1)` or `(1 1)`,
    /// gets the degenerate pair `(0, 0)`.
    pub fn initial(lits: &[Lit]) -> Self {
        let second = lits.iter().position(|&lit| lit != lits[0]).unwrap_or(0);
        Self { first: 0, second }
    }

    /// Whether both slots point at the same position: the clause is a unit obligation.
    pub const fn is_unit(&self) -> bool {
        self.first == self.second
    }

    /// Watches for a freshly learnt clause: the two most recently assigned
    /// positions (unassigned ones count as most recent). The first slot gets
    /// the most recent one.
    pub fn for_learnt(clause: &Clause, assignment: &Assignment) -> Self {
        if clause.len() < 2 {
            return Self::initial(clause.lits());
        }
        let recency = |i: usize| {
            let var = clause[i].var();
            if assignment.value_var(var).is_undef() {
                usize::MAX
            } else {
                assignment.order(var)
            }
        };
        let (mut first, mut second) = (0, 1);
        if recency(second) > recency(first) {
            std::mem::swap(&mut first, &mut second);
        }
        for i in 2..clause.len() {
            let r = recency(i);
            if r > recency(first) {
                second = first;
                first = i;
            } else if r > recency(second) {
                second = i;
            }
        }
        Self { first, second }
    }
}

#[derive(Debug, Default)]
pub struct Watches {
    watches: Vec<Watch>,
}

impl Watches {
    pub const fn new() -> Self {
        Self { watches: Vec::new() }
    }

    /// Attach watches to the clause `cref`, which must be the most recently added one.
    pub fn attach(&mut self, cref: ClauseRef, watch: Watch) {
        debug_assert_eq!(cref.index(), self.watches.len());
        self.watches.push(watch);
    }

    /// Move the watches away from the literal falsified by the assignment of `lit`.
    ///
    /// For each clause containing `-lit` with `-lit` in a watched slot, look for
    /// another position whose literal is not false and differs from the other
    /// watched literal. The search starts right after the moving slot and wraps
    /// around. When nothing is found the watch stays put: the clause is now unit
    /// or conflicting.
    pub fn on_assigned(&mut self, lit: Lit, db: &ClauseDatabase, assignment: &Assignment) {
        let falsified = -lit;
        for &cref in db.occurrences().falsified_by(lit) {
            let clause = &db[cref];
            let watch = &mut self.watches[cref.index()];
            if watch.is_unit() {
                continue;
            }
            let (slot, other) = if clause[watch.first] == falsified {
                (&mut watch.first, watch.second)
            } else if clause[watch.second] == falsified {
                (&mut watch.second, watch.first)
            } else {
                continue;
            };
            if let Some(j) = replacement(clause, *slot, other, assignment) {
                *slot = j;
            }
        }
    }

    /// Move false watches of `cref` onto non-false literals where possible and
    /// return the result.
    ///
    /// Watches stay put on backtrack, so a watch may rest on a literal that is
    /// still false while unassigned literals remain elsewhere in the clause.
    pub fn refresh(&mut self, cref: ClauseRef, clause: &Clause, assignment: &Assignment) -> Watch {
        let watch = &mut self.watches[cref.index()];
        if !watch.is_unit() {
            if assignment.value(clause[watch.first]) == LBool::False {
                if let Some(j) = replacement(clause, watch.first, watch.second, assignment) {
                    watch.first = j;
                }
            }
            if assignment.value(clause[watch.second]) == LBool::False {
                if let Some(j) = replacement(clause, watch.second, watch.first, assignment) {
                    watch.second = j;
                }
            }
        }
        *watch
    }
}

/// First position after `start` (circularly) whose literal is not false and
/// differs from the literal watched at `other`.
fn replacement(clause: &Clause, start: usize, other: usize, assignment: &Assignment) -> Option<usize> {
    let n = clause.len();
    (1..n)
        .map(|k| (start + k) % n)
        .find(|&j| clause[j] != clause[other] && assignment.value(clause[j]) != LBool::False)
}

impl Index<ClauseRef> for Watches {
    type Output = Watch;

    fn index(&self, cref: ClauseRef) -> &Self::Output {
        &self.watches[cref.index()]
    }
}
