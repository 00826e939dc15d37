use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::slice;

use crate::lit::Lit;

/// Ordered sequence of literals. Duplicates are kept as given.
#[derive(Debug, Clone)]
pub struct Clause {
    lits: Vec<Lit>,
    learnt: bool,
}

impl Clause {
    pub fn new(lits: Vec<Lit>, learnt: bool) -> Self {
        debug_assert!(!lits.is_empty(), "Clause must be non-empty");
        Self { lits, learnt }
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn is_learnt(&self) -> bool {
        self.learnt
    }

    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    pub fn iter(&self) -> slice::Iter<'_, Lit> {
        self.lits.iter()
    }
}

impl Index<usize> for Clause {
    type Output = Lit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;
    type IntoIter = slice::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for lit in self.lits.iter() {
            list.entry(&format_args!("{}", lit));
        }
        list.finish()
    }
}
