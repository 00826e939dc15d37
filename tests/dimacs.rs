use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use color_eyre::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use test_log::test;

use cdcl_sat::cnf::Cnf;
use cdcl_sat::options::Options;
use cdcl_sat::report::write_result;
use cdcl_sat::solver::{SolveResult, Solver};

const PHP_3_2: &str = "\
c pigeonhole: 3 pigeons, 2 holes
p cnf 6 9
1 2 0
3 4 0
5 6 0
-1 -3 0 -1 -5 0 -3 -5 0
-2 -4 0 -2 -6 0 -4 -6 0
";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cdcl-sat-{}-{}", std::process::id(), name))
}

fn solve(cnf: &Cnf) -> (SolveResult, Vec<i32>) {
    let options = Options {
        seed: Some(17),
        ..Options::default()
    };
    let mut solver = Solver::from_cnf(cnf, options);
    let result = SolveResult::from(solver.solve());
    (result, solver.model())
}

#[test]
fn plain_file() -> Result<()> {
    let path = temp_path("php.cnf");
    File::create(&path)?.write_all(PHP_3_2.as_bytes())?;

    let cnf = Cnf::from_file(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(cnf.max_var, 6);
    assert_eq!(cnf.num_clauses(), 9);
    assert_eq!(solve(&cnf).0, SolveResult::Unsat);
    Ok(())
}

#[test]
fn gzipped_file() -> Result<()> {
    let path = temp_path("sat.cnf.gz");
    let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
    encoder.write_all(b"p cnf 3 2\n1 -2 0\n2 3 0\n")?;
    encoder.finish()?;

    let cnf = Cnf::from_file(&path)?;
    std::fs::remove_file(&path)?;
    assert_eq!(cnf.max_var, 3);

    let (result, model) = solve(&cnf);
    assert_eq!(result, SolveResult::Sat);

    let mut out = Vec::new();
    write_result(&mut out, result, &model)?;
    let text = String::from_utf8(out)?;
    assert!(text.starts_with("s SATISFIABLE\nv "));
    assert!(text.ends_with(" 0\n"));
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    assert!(Cnf::from_file(temp_path("does-not-exist.cnf")).is_err());
}
