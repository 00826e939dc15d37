use std::ops::BitXor;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum LBool {
    False = 0,
    True = 1,
    Undef = 2,
}

impl LBool {
    #[inline]
    pub const fn is_undef(self) -> bool {
        (self as u8) > 1
    }
}

impl Default for LBool {
    fn default() -> Self {
        LBool::Undef
    }
}

impl From<bool> for LBool {
    fn from(b: bool) -> Self {
        if b {
            LBool::True
        } else {
            LBool::False
        }
    }
}

// LBool ^ bool
impl BitXor<bool> for LBool {
    type Output = LBool;

    fn bitxor(self, rhs: bool) -> Self::Output {
        match (self, rhs) {
            (LBool::Undef, _) => LBool::Undef,
            (x, false) => x,
            (LBool::True, true) => LBool::False,
            (LBool::False, true) => LBool::True,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lbool_bitxor() {
        assert_eq!(LBool::False ^ false, LBool::False);
        assert_eq!(LBool::False ^ true, LBool::True);
        assert_eq!(LBool::True ^ false, LBool::True);
        assert_eq!(LBool::True ^ true, LBool::False);
        assert_eq!(LBool::Undef ^ false, LBool::Undef);
        assert_eq!(LBool::Undef ^ true, LBool::Undef);
    }
}
