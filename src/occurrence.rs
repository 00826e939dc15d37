use crate::cref::ClauseRef;
use crate::idx::LitVec;
use crate::lit::Lit;

/// For every literal, the clauses containing it, in insertion order.
#[derive(Debug)]
pub struct Occurrences {
    lists: LitVec<Vec<ClauseRef>>,
}

impl Occurrences {
    pub fn new(max_var: usize) -> Self {
        Self {
            lists: LitVec::with_len_by(2 * (max_var + 1), Vec::new),
        }
    }

    pub fn register(&mut self, cref: ClauseRef, lits: &[Lit]) {
        for &lit in lits {
            let list = &mut self.lists[lit];
            // A clause listing the same literal twice is registered once.
            if list.last() != Some(&cref) {
                list.push(cref);
            }
        }
    }

    /// Clauses in which `lit` occurs.
    pub fn occurs(&self, lit: Lit) -> &[ClauseRef] {
        &self.lists[lit]
    }

    /// Clauses that lose a literal once `lit` becomes true.
    pub fn falsified_by(&self, lit: Lit) -> &[ClauseRef] {
        self.occurs(-lit)
    }
}
