use std::collections::VecDeque;
use std::ops::Index;

use crate::cref::ClauseRef;
use crate::idx::VarVec;
use crate::lbool::LBool;
use crate::lit::Lit;
use crate::var::Var;

/// How a variable got its value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    /// Branching decision, or a unit fact asserted before search.
    Decision,
    /// Forced by unit propagation, or asserted at the level a conflict jumps back to.
    Implied,
}

#[derive(Debug, Copy, Clone)]
pub struct VarData {
    pub(crate) reason: Option<ClauseRef>,
    pub(crate) level: usize,
    /// Trail sequence number at the time of assignment.
    pub(crate) order: usize,
    pub(crate) role: Role,
    /// Cleared on unassignment, never set.
    pub(crate) flipped: bool,
}

impl Default for VarData {
    fn default() -> Self {
        Self {
            reason: None,
            level: 0,
            order: 0,
            role: Role::Decision,
            flipped: false,
        }
    }
}

/// Current values of all variables plus the trail.
///
/// Trail records are plain variable indices; everything else about an
/// assignment lives in the per-variable arrays, which are sized once.
/// Level-0 records are kept at the front of the trail, all others are
/// appended at the back in chronological order, so backtracking only ever
/// pops from the back.
#[derive(Debug)]
pub struct Assignment {
    pub(crate) values: VarVec<LBool>, // {var: value}
    pub(crate) var_data: VarVec<VarData>,
    pub(crate) trail: VecDeque<Var>,
    pub(crate) level: usize,
}

impl Assignment {
    pub fn new(max_var: usize) -> Self {
        Self {
            values: VarVec::with_len(max_var + 1, LBool::Undef),
            var_data: VarVec::with_len(max_var + 1, VarData::default()),
            trail: VecDeque::with_capacity(max_var),
            level: 0,
        }
    }
}

// assignment[var]
impl Index<Var> for Assignment {
    type Output = LBool;

    fn index(&self, var: Var) -> &Self::Output {
        &self.values[var]
    }
}

impl Assignment {
    pub fn value_var(&self, var: Var) -> LBool {
        self.values[var]
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.values[lit.var()] ^ lit.negated()
    }

    pub fn reason(&self, var: Var) -> Option<ClauseRef> {
        self.var_data[var].reason
    }
    pub fn level(&self, var: Var) -> usize {
        self.var_data[var].level
    }
    pub fn order(&self, var: Var) -> usize {
        self.var_data[var].order
    }
    pub fn role(&self, var: Var) -> Role {
        self.var_data[var].role
    }
    pub fn flipped(&self, var: Var) -> bool {
        self.var_data[var].flipped
    }

    pub fn decision_level(&self) -> usize {
        self.level
    }
    pub fn new_decision_level(&mut self) -> usize {
        self.level += 1;
        self.level
    }

    pub fn trail(&self) -> &VecDeque<Var> {
        &self.trail
    }
    pub fn num_assigned(&self) -> usize {
        self.trail.len()
    }

    /// Make `lit` true. The variable must be unassigned.
    pub fn assign(&mut self, lit: Lit, level: usize, reason: Option<ClauseRef>, role: Role) {
        let var = lit.var();
        debug_assert_eq!(self.values[var], LBool::Undef, "{} is already assigned", var);

        self.values[var] = LBool::from(lit.is_positive());
        self.var_data[var] = VarData {
            reason,
            level,
            order: self.trail.len(),
            role,
            flipped: false,
        };
        if level == 0 {
            self.trail.push_front(var);
        } else {
            self.trail.push_back(var);
        }
    }

    /// Most recent record, if its level is above `level`.
    pub fn peek_above(&self, level: usize) -> Option<Var> {
        self.trail.back().copied().filter(|&var| self.level(var) > level)
    }

    /// The decision of `level`, as the literal that was made true.
    pub fn decision(&self, level: usize) -> Option<Lit> {
        self.trail
            .iter()
            .rev()
            .copied()
            .take_while(|&var| self.level(var) >= level)
            .find(|&var| self.level(var) == level && self.role(var) == Role::Decision)
            .map(|var| Lit::new(var, self.values[var] == LBool::False))
    }

    /// Pop the most recent record and unassign its variable.
    pub fn pop(&mut self) -> Option<Var> {
        let var = self.trail.pop_back()?;
        self.values[var] = LBool::Undef;
        self.var_data[var].flipped = false;
        Some(var)
    }

    /// Unassign everything and return to level 0.
    pub fn reset(&mut self) {
        while self.pop().is_some() {}
        self.level = 0;
    }
}
