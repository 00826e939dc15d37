use std::time::{Duration, Instant};

use tracing::info;

use crate::assignment::Assignment;
use crate::idx::{VarHeap, VarVec};
use crate::var::Var;

/// How the heap is ordered when picking a branching variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BranchMode {
    /// Entries keep the order they had when (re)inserted.
    Insertion,
    /// The heap is rebuilt from the current scores before every pick.
    MaxActivity,
}

#[derive(Debug)]
pub struct VarOrder {
    pub(crate) activity: VarVec<i64>,
    order_heap: VarHeap,
    mode: BranchMode,
    // Timings
    pub time_rebuild_var_order: Duration,
    pub num_rebuild_var_order: usize,
}

/// Higher score first, ties broken by the smaller index.
fn ranks_above(activity: &VarVec<i64>, a: Var, b: Var) -> bool {
    activity[a] > activity[b] || (activity[a] == activity[b] && a < b)
}

impl VarOrder {
    pub fn new(max_var: usize) -> Self {
        Self {
            activity: VarVec::with_len(max_var + 1, 0),
            order_heap: VarHeap::with_capacity(max_var + 1),
            mode: BranchMode::Insertion,
            time_rebuild_var_order: Duration::new(0, 0),
            num_rebuild_var_order: 0,
        }
    }
}

impl VarOrder {
    pub fn activity(&self, var: Var) -> i64 {
        self.activity[var]
    }

    pub fn mode(&self) -> BranchMode {
        self.mode
    }

    pub fn switch_to_max_activity(&mut self) {
        if self.mode != BranchMode::MaxActivity {
            info!("Switching branching to strict max-activity order");
            self.mode = BranchMode::MaxActivity;
        }
    }

    pub fn contains(&self, var: Var) -> bool {
        self.order_heap.contains(&var)
    }
    pub fn heap_len(&self) -> usize {
        self.order_heap.len()
    }

    /// Add `amount` to the score of `var`. The heap is not reordered.
    pub fn bump(&mut self, var: Var, amount: i64) {
        self.activity[var] += amount;
    }

    /// Lower every score by one.
    pub fn decay_all(&mut self) {
        for a in self.activity.iter_mut() {
            *a -= 1;
        }
    }

    pub fn insert_var_order(&mut self, var: Var) {
        let activity = &self.activity;
        self.order_heap.insert_by(var, |&a, &b| ranks_above(activity, a, b));
    }

    pub fn rebuild(&mut self) {
        let time_rebuild_start = Instant::now();

        let activity = &self.activity;
        self.order_heap.rebuild_by(|&a, &b| ranks_above(activity, a, b));

        self.time_rebuild_var_order += time_rebuild_start.elapsed();
        self.num_rebuild_var_order += 1;
    }

    /// Refill the heap with every variable and order it by score.
    pub fn reset(&mut self, max_var: usize) {
        self.order_heap.clear();
        for var in Var::range(max_var) {
            self.order_heap.push_unordered(var);
        }
        self.rebuild();
    }

    /// Extract the best unassigned variable, discarding stale (assigned) entries on the way.
    pub fn pick_branching_variable(&mut self, assignment: &Assignment) -> Option<Var> {
        if self.mode == BranchMode::MaxActivity {
            self.rebuild();
        }
        let activity = &self.activity;
        while let Some(var) = self.order_heap.pop_by(|&a, &b| ranks_above(activity, a, b)) {
            if assignment.value_var(var).is_undef() {
                return Some(var);
            }
        }
        None
    }
}
