use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tap::Tap;
use tracing::{debug, info, trace};

use crate::assignment::{Assignment, Role};
use crate::clause_database::ClauseDatabase;
use crate::cnf::Cnf;
use crate::cref::ClauseRef;
use crate::lbool::LBool;
use crate::lit::Lit;
use crate::options::Options;
use crate::restart::RestartStrategy;
use crate::var::Var;
use crate::var_order::VarOrder;
use crate::watch::{Watch, Watches};

/// Score added to a variable per occurrence in an input clause.
const OCCURRENCE_BUMP: i64 = 2;
/// Score added to every variable of a derived clause.
const LEARNT_BUMP: i64 = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum SolveResult {
    Sat,
    Unsat,
}

impl From<bool> for SolveResult {
    fn from(sat: bool) -> Self {
        if sat {
            SolveResult::Sat
        } else {
            SolveResult::Unsat
        }
    }
}

/// Clause found with both watched literals false.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Conflict {
    pub clause: ClauseRef,
    /// The more recently assigned of the two watched variables.
    pub var: Var,
}

/// Where to resume after a conflict.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Backjump {
    pub level: usize,
    /// The derived clause, when it was short enough to be kept.
    pub learnt: Option<ClauseRef>,
    /// Literal to assign at `level` with no stored reason.
    pub asserted: Option<Lit>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Analysis {
    Unsat,
    Backjump(Backjump),
}

#[derive(Debug)]
pub struct Solver {
    max_var: usize,
    db: ClauseDatabase,
    watches: Watches,
    assignment: Assignment,
    var_order: VarOrder,
    restart_strategy: RestartStrategy,
    options: Options,
    seed: u64,
    rng: StdRng,
    status: Option<bool>,
    // Backtracks since the last restart
    backtracks: usize,
    // Statistics
    decisions: usize,
    propagations: usize,
    conflicts: usize,
    derived: usize,
    backjumps: usize,
    restarts: usize,
    // Timings
    pub time_search: Duration,
    pub time_propagate: Duration,
    pub time_analyze: Duration,
    pub time_backtrack: Duration,
    pub time_decide: Duration,
    pub time_restart: Duration,
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

impl Solver {
    /// Build a solver over variables `1..=max_var`.
    ///
    /// Every literal must refer to a variable within that range. An empty clause
    /// makes the formula trivially unsatisfiable.
    pub fn new<I>(max_var: usize, clauses: I, options: Options) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[Lit]>,
    {
        let seed = options.seed.unwrap_or_else(wall_clock_seed);
        info!("Solver::new(max_var = {}), seed = {}", max_var, seed);

        let mut solver = Self {
            max_var,
            db: ClauseDatabase::new(max_var),
            watches: Watches::new(),
            assignment: Assignment::new(max_var),
            var_order: VarOrder::new(max_var),
            restart_strategy: RestartStrategy::new(options.restart_interval, options.restart_budget),
            options,
            seed,
            rng: StdRng::seed_from_u64(seed),
            status: None,
            backtracks: 0,
            decisions: 0,
            propagations: 0,
            conflicts: 0,
            derived: 0,
            backjumps: 0,
            restarts: 0,
            time_search: Duration::new(0, 0),
            time_propagate: Duration::new(0, 0),
            time_analyze: Duration::new(0, 0),
            time_backtrack: Duration::new(0, 0),
            time_decide: Duration::new(0, 0),
            time_restart: Duration::new(0, 0),
        };

        for lits in clauses {
            let lits = lits.as_ref();
            if lits.is_empty() {
                info!("Empty clause in the input");
                solver.status = Some(false);
                continue;
            }
            debug_assert!(
                lits.iter().all(|lit| lit.var().index() <= max_var),
                "Literal out of range in {:?}",
                lits
            );
            for lit in lits {
                solver.var_order.bump(lit.var(), OCCURRENCE_BUMP);
            }
            let cref = solver.db.add_clause(lits, false);
            solver.watches.attach(cref, Watch::initial(lits));
        }

        solver.var_order.reset(max_var);
        if solver.restart_strategy.is_exhausted() {
            solver.var_order.switch_to_max_activity();
        }
        solver
    }

    pub fn from_cnf(cnf: &Cnf, options: Options) -> Self {
        Self::new(cnf.max_var, &cnf.clauses, options)
    }

    pub fn num_vars(&self) -> usize {
        self.max_var
    }
    pub fn num_clauses(&self) -> usize {
        self.db.num_clauses()
    }
    pub fn num_learnts(&self) -> usize {
        self.db.num_learnts()
    }
    /// Derived clauses, including those too long to be kept.
    pub fn num_derived(&self) -> usize {
        self.derived
    }
    pub fn num_decisions(&self) -> usize {
        self.decisions
    }
    pub fn num_propagations(&self) -> usize {
        self.propagations
    }
    pub fn num_conflicts(&self) -> usize {
        self.conflicts
    }
    pub fn num_backjumps(&self) -> usize {
        self.backjumps
    }
    pub fn num_restarts(&self) -> usize {
        self.restarts
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn decision_level(&self) -> usize {
        self.assignment.decision_level()
    }
    pub fn value(&self, lit: Lit) -> LBool {
        self.assignment.value(lit)
    }
    pub fn activity(&self, var: Var) -> i64 {
        self.var_order.activity(var)
    }

    pub fn time_rebuild_var_order(&self) -> Duration {
        self.var_order.time_rebuild_var_order
    }
    pub fn num_rebuild_var_order(&self) -> usize {
        self.var_order.num_rebuild_var_order
    }

    /// Signed value of every variable `1..=max_var`; `0` for an unassigned one.
    pub fn model(&self) -> Vec<i32> {
        Var::range(self.max_var)
            .map(|var| {
                let v = var.get() as i32;
                match self.assignment.value_var(var) {
                    LBool::True => v,
                    LBool::False => -v,
                    LBool::Undef => 0,
                }
            })
            .collect()
    }

    /// Check every stored clause against the current assignment.
    pub fn verify(&self) -> bool {
        self.db
            .iter()
            .all(|clause| clause.iter().any(|&lit| self.assignment.value(lit) == LBool::True))
    }

    /// Decide the formula. The verdict is cached: later calls return it without searching again.
    pub fn solve(&mut self) -> bool {
        if let Some(status) = self.status {
            info!("Solver::solve(): already solved, {}", if status { "SAT" } else { "UNSAT" });
            return status;
        }
        info!(
            "Solver::solve(): {} vars, {} clauses, seed {}",
            self.num_vars(),
            self.num_clauses(),
            self.seed
        );

        let time_search_start = Instant::now();
        let status = self.search();
        self.time_search += time_search_start.elapsed();

        info!(
            "{} after {} conflicts, {} restarts in {:?}",
            if status { "SAT" } else { "UNSAT" },
            self.conflicts,
            self.restarts,
            self.time_search
        );
        self.status = Some(status);
        status
    }

    fn search(&mut self) -> bool {
        if !self.preprocess() {
            info!("UNSAT during preprocessing");
            return false;
        }

        loop {
            if self.restart_strategy.should_restart(self.backtracks) {
                self.restart();
                if !self.preprocess() {
                    info!("UNSAT during preprocessing after restart");
                    return false;
                }
            }
            if self.restart_strategy.is_exhausted() {
                self.var_order.switch_to_max_activity();
            }

            let time_decide_start = Instant::now();
            let decision = self.decide().tap(|_| {
                self.time_decide += time_decide_start.elapsed();
            });
            let decision = match decision {
                Some(lit) => lit,
                None => return true,
            };

            let mut queue = self.db.occurrences().falsified_by(decision).to_vec();
            loop {
                let time_propagate_start = Instant::now();
                let conflict = self.propagate(queue).tap(|_| {
                    self.time_propagate += time_propagate_start.elapsed();
                });
                let conflict = match conflict {
                    Some(conflict) => conflict,
                    None => break,
                };
                self.conflicts += 1;

                let time_analyze_start = Instant::now();
                let analysis = self.analyze(conflict);
                self.time_analyze += time_analyze_start.elapsed();

                match analysis {
                    Analysis::Unsat => return false,
                    Analysis::Backjump(jump) => queue = self.backjump(jump, conflict),
                }
            }
        }
    }

    /// Assert every unit clause at level 0, propagating each.
    ///
    /// A clause repeating a single literal, such as `(1 1)`, counts as a unit.
    /// Returns `false` when a unit clause is contradicted.
    fn preprocess(&mut self) -> bool {
        debug_assert_eq!(self.assignment.decision_level(), 0);

        let num_all = self.db.num_clauses() + self.db.num_learnts();
        for cref in (0..num_all).map(ClauseRef) {
            if !self.watches[cref].is_unit() {
                continue;
            }
            let lit = self.db[cref][0];
            match self.assignment.value(lit) {
                LBool::Undef => {
                    trace!("unit {} from {}", lit, cref);
                    self.assign(lit, 0, None, Role::Decision);
                    let queue = self.db.occurrences().falsified_by(lit).to_vec();
                    if let Some(conflict) = self.propagate(queue) {
                        debug!("Conflict in {} while asserting unit {}", conflict.clause, lit);
                        return false;
                    }
                }
                LBool::False => {
                    debug!("Unit {} from {} contradicts an earlier unit", lit, cref);
                    return false;
                }
                LBool::True => {}
            }
        }
        true
    }

    fn assign(&mut self, lit: Lit, level: usize, reason: Option<ClauseRef>, role: Role) {
        self.assignment.assign(lit, level, reason, role);
        self.watches.on_assigned(lit, &self.db, &self.assignment);
    }

    /// Pick a branching variable and assign it a random polarity at a new level.
    ///
    /// Returns [`None`] when every variable is assigned.
    fn decide(&mut self) -> Option<Lit> {
        let var = self.var_order.pick_branching_variable(&self.assignment)?;
        let decision = Lit::new(var, self.rng.gen());
        let level = self.assignment.new_decision_level();
        self.decisions += 1;
        debug!("Decision {} at level {}", decision, level);
        self.assign(decision, level, None, Role::Decision);
        Some(decision)
    }

    /// Unit propagation over the clauses in `queue` and everything they force.
    ///
    /// Stops at the first clause with both watched literals false.
    pub(crate) fn propagate(&mut self, mut queue: Vec<ClauseRef>) -> Option<Conflict> {
        let mut head = 0;
        while head < queue.len() {
            let cref = queue[head];
            head += 1;

            let clause = &self.db[cref];
            let watch = self.watches.refresh(cref, clause, &self.assignment);
            let is_unit = watch.is_unit();
            let mut falsified = clause[watch.first];
            let mut other = clause[watch.second];
            if self.assignment.value(other) == LBool::False {
                std::mem::swap(&mut falsified, &mut other);
            }
            if !is_unit && self.assignment.value(falsified) != LBool::False {
                continue;
            }

            match self.assignment.value(other) {
                LBool::Undef => {
                    let level = if is_unit { 0 } else { self.assignment.decision_level() };
                    trace!("{} forced by {} at level {}", other, cref, level);
                    self.propagations += 1;
                    self.assign(other, level, Some(cref), Role::Implied);
                    queue.extend_from_slice(self.db.occurrences().falsified_by(other));
                }
                LBool::False => {
                    let (a, b) = (falsified.var(), other.var());
                    let var = if self.assignment.order(a) >= self.assignment.order(b) { a } else { b };
                    return Some(Conflict { clause: cref, var });
                }
                LBool::True => {}
            }
        }
        None
    }

    /// Resolve the conflicting clause backwards along the trail.
    ///
    /// Resolution continues until the clause holds a single literal of the current
    /// level. That literal is then implied at the backjump level, either by the
    /// stored clause or, for a clause too long to keep, through [`Backjump::asserted`].
    /// When resolution cannot get there, the decision of the current level is
    /// flipped one level below.
    pub(crate) fn analyze(&mut self, conflict: Conflict) -> Analysis {
        let current = self.assignment.decision_level();
        debug!("Conflict in {} on {} at level {}", conflict.clause, conflict.var, current);
        if current == 0 {
            return Analysis::Unsat;
        }

        let assignment = &self.assignment;
        let at_current = |lit: &Lit| assignment.level(lit.var()) == current;

        let mut lemma = self.db[conflict.clause].iter().copied().unique().collect_vec();
        let mut count = 1 + lemma.iter().filter(|lit| lit.var() != conflict.var && at_current(lit)).count();
        let mut steps = 0;

        while count > 1 && steps < self.options.resolution_limit {
            let pivot = lemma
                .iter()
                .filter(|lit| at_current(lit))
                .map(|lit| lit.var())
                .max_by_key(|&var| assignment.order(var));
            let pivot = match pivot {
                Some(var) => var,
                None => break,
            };
            let reason = match assignment.reason(pivot) {
                Some(cref) => cref,
                None => break,
            };

            steps += 1;
            lemma.retain(|lit| lit.var() != pivot);
            for &lit in self.db[reason].iter() {
                if lit.var() != pivot && !lemma.contains(&lit) {
                    lemma.push(lit);
                }
            }
            trace!("resolved on {} with {}: {} literals", pivot, reason, lemma.len());

            count = lemma.iter().filter(|lit| at_current(lit)).count();
        }

        let uip = lemma.iter().copied().filter(|lit| at_current(lit)).exactly_one().ok();

        if steps == 0 && uip.is_some() {
            debug!("No resolution, stepping back to level {}", current - 1);
            return Analysis::Backjump(Backjump {
                level: current - 1,
                learnt: None,
                asserted: None,
            });
        }

        let (level, asserted) = match uip {
            Some(uip) => {
                let level = lemma
                    .iter()
                    .map(|lit| lit.var())
                    .filter(|&var| assignment.level(var) < current && !assignment.flipped(var))
                    .map(|var| assignment.level(var))
                    .max()
                    .unwrap_or(0);
                (level, Some(uip))
            }
            None => {
                let negated = assignment.decision(current).map(|decision| -decision);
                debug!("No single literal of level {} left, asserting {:?} below", current, negated);
                (current - 1, negated)
            }
        };

        let mut learnt = None;
        if steps > 0 {
            self.derived += 1;
            for lit in lemma.iter() {
                self.var_order.bump(lit.var(), LEARNT_BUMP);
            }
            if lemma.len() <= self.options.learnt_size_limit {
                learnt = Some(self.learn(lemma));
            } else {
                debug!("Discarding derived clause of size {}", lemma.len());
            }
        }

        // A stored clause with a single literal of the current level implies it by itself.
        let asserted = if uip.is_some() && learnt.is_some() { None } else { asserted };
        Analysis::Backjump(Backjump {
            level,
            learnt,
            asserted,
        })
    }

    fn learn(&mut self, lemma: Vec<Lit>) -> ClauseRef {
        let cref = self.db.add_clause(lemma, true);
        let watch = Watch::for_learnt(&self.db[cref], &self.assignment);
        self.watches.attach(cref, watch);
        debug!("Learnt {} {}", cref, self.db[cref]);
        cref
    }

    /// Undo the conflict and return the clauses to propagate next.
    ///
    /// Without a stored clause, the conflicting one is re-examined: it may be unit at the new level.
    pub(crate) fn backjump(&mut self, jump: Backjump, conflict: Conflict) -> Vec<ClauseRef> {
        self.backtrack(jump.level);
        self.backtracks += 1;
        let mut queue = vec![jump.learnt.unwrap_or(conflict.clause)];
        if let Some(lit) = jump.asserted {
            debug!("Asserting {} at level {}", lit, jump.level);
            self.assign(lit, jump.level, None, Role::Implied);
            queue.extend_from_slice(self.db.occurrences().falsified_by(lit));
        }
        queue
    }

    /// Undo every assignment above `level`, making it the current level.
    ///
    /// Scores decay on every call, even when nothing is undone.
    pub(crate) fn backtrack(&mut self, level: usize) {
        let time_backtrack_start = Instant::now();
        debug!("backtrack from {} to {}", self.assignment.decision_level(), level);

        self.var_order.decay_all();
        while let Some(var) = self.assignment.peek_above(level) {
            self.assignment.pop();
            self.var_order.insert_var_order(var);
        }
        self.assignment.level = level;
        self.backjumps += 1;

        self.time_backtrack += time_backtrack_start.elapsed();
    }

    fn restart(&mut self) {
        let time_restart_start = Instant::now();

        self.assignment.reset();
        self.var_order.reset(self.max_var);
        self.restart_strategy.consume();
        self.restarts += 1;
        self.backtracks = 0;

        self.time_restart += time_restart_start.elapsed();
        info!(
            "Restart #{} ({} left): {} conflicts, {} learnts",
            self.restarts, self.restart_strategy.remaining, self.conflicts, self.db.num_learnts()
        );
    }
}
