use std::fmt::{Display, Formatter};

/// Boolean variable, identified by its 1-based index (index 0 is never used).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Var(pub(crate) u32);

impl Var {
    pub const fn new(var: u32) -> Self {
        debug_assert!(var > 0, "Variable index must be positive");
        Self(var)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// All variables `1..=max_var`.
    pub fn range(max_var: usize) -> impl DoubleEndedIterator<Item = Var> {
        (1..=max_var as u32).map(Var)
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}
