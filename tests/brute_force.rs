use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use quickcheck::{Arbitrary, Gen, QuickCheck};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_log::test;

use cdcl_sat::lit::Lit;
use cdcl_sat::options::Options;
use cdcl_sat::solver::Solver;
use cdcl_sat::var::Var;

const TIME_LIMIT: Duration = Duration::from_secs(120);

/// Random formula over at most 12 variables with clauses of 1 to 5 literals.
///
/// Variables are drawn with replacement, and some clauses get an extra copy or the
/// negation of their first literal, so repeats and tautologies are common.
#[derive(Debug, Clone)]
struct MixedCnf {
    max_var: usize,
    clauses: Vec<Vec<Lit>>,
}

impl Arbitrary for MixedCnf {
    fn arbitrary(g: &mut Gen) -> Self {
        let max_var = 1 + usize::arbitrary(g) % 12;
        let num_clauses = usize::arbitrary(g) % (5 * max_var + 1);
        let clauses = (0..num_clauses)
            .map(|_| {
                let len = 1 + usize::arbitrary(g) % 5;
                let mut clause: Vec<Lit> = (0..len)
                    .map(|_| {
                        let var = 1 + u32::arbitrary(g) % max_var as u32;
                        Lit::new(Var::new(var), bool::arbitrary(g))
                    })
                    .collect();
                match u8::arbitrary(g) % 8 {
                    0 => clause.push(clause[0]),
                    1 => clause.push(-clause[0]),
                    _ => {}
                }
                clause
            })
            .collect();
        Self { max_var, clauses }
    }
}

fn satisfies(clauses: &[Vec<Lit>], bits: u32) -> bool {
    clauses.iter().all(|clause| {
        clause
            .iter()
            .any(|lit| ((bits >> (lit.var().get() - 1)) & 1 == 1) == lit.is_positive())
    })
}

fn brute_force(max_var: usize, clauses: &[Vec<Lit>]) -> bool {
    (0..1u32 << max_var).any(|bits| satisfies(clauses, bits))
}

fn model_bits(model: &[i32]) -> u32 {
    model
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0)
        .fold(0, |acc, (i, _)| acc | 1 << i)
}

/// Run `f` on its own thread and fail if it takes longer than [`TIME_LIMIT`].
fn bounded<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(TIME_LIMIT) {
        Ok(value) => value,
        Err(RecvTimeoutError::Timeout) => panic!("no answer within {:?}", TIME_LIMIT),
        Err(RecvTimeoutError::Disconnected) => panic!("solver thread panicked"),
    }
}

/// Solve once with `options` and compare against the known answer.
fn check(max_var: usize, clauses: &[Vec<Lit>], expected: bool, options: Options) -> bool {
    let mut solver = Solver::new(max_var, clauses, options);
    let sat = solver.solve();
    if sat {
        let model = solver.model();
        sat == expected && solver.verify() && satisfies(clauses, model_bits(&model))
    } else {
        sat == expected
    }
}

/// Default options, tiny learnt clauses and single-step resolution, each with three seeds.
fn option_grid(seed: u64) -> Vec<Options> {
    let base = [
        Options::default(),
        Options {
            learnt_size_limit: 1,
            ..Options::default()
        },
        Options {
            resolution_limit: 1,
            ..Options::default()
        },
        Options {
            learnt_size_limit: 1,
            resolution_limit: 1,
            ..Options::default()
        },
    ];
    base.iter()
        .flat_map(|options| {
            (0..3).map(move |i| Options {
                seed: Some(seed.wrapping_add(i)),
                ..options.clone()
            })
        })
        .collect()
}

fn agrees_with_brute_force(cnf: MixedCnf, seed: u64) -> bool {
    let expected = brute_force(cnf.max_var, &cnf.clauses);
    option_grid(seed)
        .into_iter()
        .all(|options| check(cnf.max_var, &cnf.clauses, expected, options))
}

#[test]
fn mixed_formulas_agree_with_brute_force() {
    bounded(|| {
        QuickCheck::new()
            .tests(300)
            .quickcheck(agrees_with_brute_force as fn(MixedCnf, u64) -> bool)
    });
}

fn random_3sat(rng: &mut StdRng, num_vars: usize, num_clauses: usize) -> Vec<Vec<Lit>> {
    (0..num_clauses)
        .map(|_| {
            rand::seq::index::sample(rng, num_vars, 3)
                .iter()
                .map(|v| Lit::new(Var::new(v as u32 + 1), rng.gen()))
                .collect()
        })
        .collect()
}

/// Clauses of 1 to 4 literals drawn with replacement, so repeats and tautologies occur.
fn random_mixed(rng: &mut StdRng, num_vars: usize, num_clauses: usize) -> Vec<Vec<Lit>> {
    (0..num_clauses)
        .map(|_| {
            let len = rng.gen_range(1..=4);
            (0..len)
                .map(|_| Lit::new(Var::new(rng.gen_range(1..=num_vars as u32)), rng.gen()))
                .collect()
        })
        .collect()
}

#[test]
fn random_3sat_at_threshold_agrees_across_seeds() {
    bounded(|| {
        let num_vars = 20;
        let mut rng = StdRng::seed_from_u64(2022);
        let mut num_unsat = 0;
        for _ in 0..30 {
            let clauses = random_3sat(&mut rng, num_vars, 91);
            let expected = brute_force(num_vars, &clauses);
            num_unsat += usize::from(!expected);
            for seed in 0..3 {
                let options = Options {
                    seed: Some(seed),
                    ..Options::default()
                };
                assert!(check(num_vars, &clauses, expected, options), "seed {}: {:?}", seed, clauses);
            }
        }
        assert!(num_unsat > 0);
    });
}

#[test]
fn tight_learning_limits_keep_answers() {
    bounded(|| {
        let mut rng = StdRng::seed_from_u64(31);
        for num_vars in 3..=12 {
            for _ in 0..5 {
                let num_clauses = rng.gen_range(num_vars..=5 * num_vars);
                let clauses = random_mixed(&mut rng, num_vars, num_clauses);
                let expected = brute_force(num_vars, &clauses);
                for options in option_grid(num_vars as u64) {
                    assert!(check(num_vars, &clauses, expected, options.clone()), "{:?}: {:?}", options, clauses);
                }
            }
        }
    });
}

#[test]
fn frequent_restarts_keep_answers() {
    bounded(|| {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..15 {
            let num_vars = 6;
            let clauses = random_3sat(&mut rng, num_vars, 26);
            let expected = brute_force(num_vars, &clauses);
            let options = Options {
                restart_interval: 1,
                restart_budget: 3,
                seed: Some(1),
                ..Options::default()
            };
            assert!(check(num_vars, &clauses, expected, options));
        }
    });
}
