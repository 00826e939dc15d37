use std::borrow::Cow;
use std::ops::Index;

use tracing::trace;

use crate::clause::Clause;
use crate::cref::ClauseRef;
use crate::lit::Lit;
use crate::occurrence::Occurrences;

/// Original and learnt clauses, together with their occurrence index.
///
/// Clauses are never removed, so a [`ClauseRef`] stays valid for the whole solve.
#[derive(Debug)]
pub struct ClauseDatabase {
    clauses: Vec<Clause>,
    num_learnts: usize,
    occurrences: Occurrences,
}

impl ClauseDatabase {
    pub fn new(max_var: usize) -> Self {
        Self {
            clauses: Vec::new(),
            num_learnts: 0,
            occurrences: Occurrences::new(max_var),
        }
    }
}

impl ClauseDatabase {
    pub fn num_clauses(&self) -> usize {
        self.clauses.len() - self.num_learnts
    }
    pub fn num_learnts(&self) -> usize {
        self.num_learnts
    }

    pub fn clause(&self, cref: ClauseRef) -> &Clause {
        &self.clauses[cref.index()]
    }

    /// All clause references, originals first, then learnts in learning order.
    pub fn refs(&self) -> impl Iterator<Item = ClauseRef> {
        (0..self.clauses.len()).map(ClauseRef)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    pub fn occurrences(&self) -> &Occurrences {
        &self.occurrences
    }

    pub fn add_clause<'a, L>(&mut self, lits: L, learnt: bool) -> ClauseRef
    where
        L: Into<Cow<'a, [Lit]>>,
    {
        let lits = lits.into().into_owned();
        let cref = ClauseRef(self.clauses.len());
        self.occurrences.register(cref, &lits);
        let clause = Clause::new(lits, learnt);
        trace!("add {} {}", cref, clause);
        self.clauses.push(clause);
        if learnt {
            self.num_learnts += 1;
        }
        cref
    }
}

impl Index<ClauseRef> for ClauseDatabase {
    type Output = Clause;

    fn index(&self, cref: ClauseRef) -> &Self::Output {
        self.clause(cref)
    }
}
