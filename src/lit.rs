use std::fmt::{Display, Formatter};
use std::ops;

use snafu::Snafu;

use crate::var::Var;

/// Literal in DIMACS encoding: the magnitude is the variable index,
/// the sign is the polarity (positive literal asserts the variable).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Lit(pub(crate) i32);

impl Lit {
    pub const fn new(var: Var, negated: bool) -> Self {
        let v = var.0 as i32;
        if negated {
            Lit(-v)
        } else {
            Lit(v)
        }
    }

    pub const fn var(self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub const fn negated(self) -> bool {
        self.0 < 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Dense index for literal-keyed tables: `2 * var + negated`.
    pub const fn index(self) -> usize {
        (self.var().index() << 1) | self.negated() as usize
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Invalid literal value: {}", value))]
pub struct InvalidLitValueError {
    value: i32,
}

impl TryFrom<i32> for Lit {
    type Error = InvalidLitValueError;

    fn try_from(val: i32) -> Result<Self, Self::Error> {
        if val == 0 || val == i32::MIN {
            return InvalidLitValueSnafu { value: val }.fail();
        }
        Ok(Self(val))
    }
}

impl From<Lit> for i32 {
    fn from(lit: Lit) -> Self {
        lit.0
    }
}

// -Lit
impl ops::Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Self::Output {
        Lit(-self.0)
    }
}

// !Lit
impl ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit(-self.0)
    }
}

// Lit ^ bool
impl ops::BitXor<bool> for Lit {
    type Output = Lit;

    fn bitxor(self, rhs: bool) -> Self::Output {
        if rhs {
            -self
        } else {
            self
        }
    }
}
