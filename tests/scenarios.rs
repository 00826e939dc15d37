use test_log::test;

use cdcl_sat::lit::Lit;
use cdcl_sat::options::Options;
use cdcl_sat::solver::Solver;
use cdcl_sat::var::Var;

fn clauses(xs: &[&[i32]]) -> Vec<Vec<Lit>> {
    xs.iter()
        .map(|c| c.iter().map(|&x| Lit::try_from(x).unwrap()).collect())
        .collect()
}

fn seeded(seed: u64) -> Options {
    Options {
        seed: Some(seed),
        ..Options::default()
    }
}

/// `holes + 1` pigeons into `holes` holes; variable `p * holes + h + 1` puts pigeon `p` into hole `h`.
fn pigeonhole(holes: usize) -> (usize, Vec<Vec<Lit>>) {
    let pigeons = holes + 1;
    let x = |p: usize, h: usize| Var::new((p * holes + h + 1) as u32);
    let mut clauses = Vec::new();
    for p in 0..pigeons {
        clauses.push((0..holes).map(|h| Lit::new(x(p, h), false)).collect());
    }
    for h in 0..holes {
        for p in 0..pigeons {
            for q in (p + 1)..pigeons {
                clauses.push(vec![Lit::new(x(p, h), true), Lit::new(x(q, h), true)]);
            }
        }
    }
    (pigeons * holes, clauses)
}

#[test]
fn contradictory_units() {
    let cs = clauses(&[&[1], &[-1]]);
    let mut solver = Solver::new(1, &cs, seeded(1));
    assert!(!solver.solve());
    assert_eq!(solver.num_decisions(), 0);
    assert_eq!(solver.num_conflicts(), 0);
}

#[test]
fn forced_second_variable() {
    let cs = clauses(&[&[1, 2], &[-1, 2], &[1, -2]]);
    for seed in 0..10 {
        let mut solver = Solver::new(2, &cs, seeded(seed));
        assert!(solver.solve());
        assert!(solver.verify());
        assert_eq!(solver.model(), vec![1, 2]);
    }
}

#[test]
fn exactly_one_of_three() {
    let cs = clauses(&[&[1, 2, 3], &[-1, -2], &[-1, -3], &[-2, -3]]);
    for seed in 0..10 {
        let mut solver = Solver::new(3, &cs, seeded(seed));
        assert!(solver.solve());
        assert!(solver.verify());
        let model = solver.model();
        assert_eq!(model.iter().filter(|&&v| v > 0).count(), 1, "model: {:?}", model);
    }
}

#[test]
fn empty_formula() {
    let cs: Vec<Vec<Lit>> = vec![];
    let mut solver = Solver::new(0, &cs, seeded(1));
    assert!(solver.solve());
    assert!(solver.verify());
    assert!(solver.model().is_empty());
    assert_eq!(solver.num_decisions(), 0);
}

#[test]
fn pigeonhole_is_unsat() {
    let (num_vars, cs) = pigeonhole(2);
    for seed in 0..5 {
        let mut solver = Solver::new(num_vars, &cs, seeded(seed));
        assert!(!solver.solve());
        assert!(solver.num_learnts() >= 1);
        assert!(solver.num_backjumps() >= 1);
    }
}

#[test]
fn pigeons_fit_with_enough_holes() {
    let (num_vars, mut cs) = pigeonhole(3);
    // Drop the last pigeon's at-least-one clause: it may now stay out.
    cs.remove(3);
    let mut solver = Solver::new(num_vars, &cs, seeded(4));
    assert!(solver.solve());
    assert!(solver.verify());
}

#[test]
fn same_seed_same_run() {
    let (num_vars, cs) = pigeonhole(2);
    let run = |seed| {
        let mut solver = Solver::new(num_vars, &cs, seeded(seed));
        let sat = solver.solve();
        (sat, solver.num_decisions(), solver.num_conflicts(), solver.num_learnts(), solver.model())
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn unit_chain_needs_no_decision() {
    let cs = clauses(&[&[1], &[-1, 2], &[-2, -3], &[3, 4, 5]]);
    let mut solver = Solver::new(5, &cs, seeded(2));
    assert!(solver.solve());
    assert!(solver.verify());
    let model = solver.model();
    assert_eq!(&model[..3], &[1, 2, -3]);
}

#[test]
fn repeated_literal_is_a_unit() {
    let cs = clauses(&[&[-2, -1], &[2, -4], &[1, 1], &[4, 4]]);
    for seed in 0..5 {
        let mut solver = Solver::new(4, &cs, seeded(seed));
        assert!(!solver.solve());
        assert_eq!(solver.num_decisions(), 0);
    }
}

#[test]
fn tautologies_and_repeats_keep_models() {
    let cs = clauses(&[&[3, -3], &[1, 1, 2], &[-1, -1], &[2, -2, 2], &[-3, 4, -3]]);
    for seed in 0..10 {
        let mut solver = Solver::new(4, &cs, seeded(seed));
        assert!(solver.solve());
        assert!(solver.verify());
        let model = solver.model();
        assert_eq!(&model[..2], &[-1, 2]);
        assert!(model[2] < 0 || model[3] > 0, "model: {:?}", model);
    }
}
