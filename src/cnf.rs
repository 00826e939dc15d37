use std::io;
use std::io::BufRead;
use std::mem;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use snafu::{ensure, OptionExt, ResultExt, Snafu};
use tracing::debug;

use crate::lit::{InvalidLitValueError, Lit};
use crate::utils::read_maybe_gzip;

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum ParseError {
    #[snafu(display("Could not open '{}': {}", path.display(), source))]
    Open { path: PathBuf, source: io::Error },

    #[snafu(display("Could not read line {}: {}", line, source))]
    Read { line: usize, source: io::Error },

    #[snafu(display("Bad header on line {}: '{}'", line, header))]
    BadHeader { line: usize, header: String },

    #[snafu(display("Bad token '{}' on line {}: {}", token, line, source))]
    BadToken {
        line: usize,
        token: String,
        source: ParseIntError,
    },

    #[snafu(display("Bad literal on line {}: {}", line, source))]
    BadLit { line: usize, source: InvalidLitValueError },

    #[snafu(display("Literal {} on line {} exceeds the declared {} variables", lit, line, max_var))]
    VarOutOfRange { line: usize, lit: Lit, max_var: usize },

    #[snafu(display("Clause ending on line {} has no literals", line))]
    EmptyClause { line: usize },

    #[snafu(display("Last clause is not terminated by 0"))]
    Unterminated,
}

/// Formula in conjunctive normal form over variables `1..=max_var`.
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    pub max_var: usize,
    pub clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    pub fn new(max_var: usize, clauses: Vec<Vec<Lit>>) -> Self {
        Self { max_var, clauses }
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Read a DIMACS CNF file, gzip-compressed if the name ends in `.gz`.
    pub fn from_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let reader = read_maybe_gzip(path).context(OpenSnafu { path })?;
        Self::parse(reader)
    }

    /// Parse DIMACS CNF text.
    ///
    /// Lines starting with `c` are comments; `p cnf <vars> <clauses>` declares the
    /// variable count, otherwise the largest variable seen is used. Clauses may span
    /// lines and end with `0`; a `0` with no literals before it is an error.
    /// A line starting with `%` ends the input.
    pub fn parse<R>(reader: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut declared: Option<usize> = None;
        let mut max_seen = 0;
        let mut clauses = Vec::new();
        let mut current = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.context(ReadSnafu { line: line_no })?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if line.starts_with('%') {
                break;
            }
            if line.starts_with('p') {
                let max_var = parse_header(line).context(BadHeaderSnafu {
                    line: line_no,
                    header: line,
                })?;
                debug!("Header declares {} variables", max_var);
                declared = Some(max_var);
                continue;
            }

            for token in line.split_whitespace() {
                let value: i32 = token.parse().context(BadTokenSnafu { line: line_no, token })?;
                if value == 0 {
                    ensure!(!current.is_empty(), EmptyClauseSnafu { line: line_no });
                    clauses.push(mem::take(&mut current));
                    continue;
                }
                let lit = Lit::try_from(value).context(BadLitSnafu { line: line_no })?;
                let var = lit.var().index();
                if let Some(max_var) = declared {
                    ensure!(
                        var <= max_var,
                        VarOutOfRangeSnafu {
                            line: line_no,
                            lit,
                            max_var
                        }
                    );
                }
                max_seen = max_seen.max(var);
                current.push(lit);
            }
        }

        ensure!(current.is_empty(), UnterminatedSnafu);

        Ok(Self {
            max_var: declared.unwrap_or(max_seen),
            clauses,
        })
    }
}

fn parse_header(line: &str) -> Option<usize> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("p") || tokens.next() != Some("cnf") {
        return None;
    }
    let max_var = tokens.next()?.parse().ok()?;
    let _num_clauses: usize = tokens.next()?.parse().ok()?;
    Some(max_var)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(xs: &[i32]) -> Vec<Lit> {
        xs.iter().map(|&x| Lit::try_from(x).unwrap()).collect()
    }

    #[test]
    fn test_parse_dimacs() {
        let text = "c tiny formula\np cnf 4 3\n1 -2 0\n2 3\n-4 0 -1\n0\n";
        let cnf = Cnf::parse(text.as_bytes()).unwrap();
        assert_eq!(cnf.max_var, 4);
        assert_eq!(cnf.num_clauses(), 3);
        assert_eq!(cnf.clauses, vec![lits(&[1, -2]), lits(&[2, 3, -4]), lits(&[-1])]);
    }

    #[test]
    fn test_parse_without_header() {
        let cnf = Cnf::parse("3 -7 0\n%\n0\n".as_bytes()).unwrap();
        assert_eq!(cnf.max_var, 7);
        assert_eq!(cnf.clauses, vec![lits(&[3, -7])]);
    }

    #[test]
    fn test_parse_errors() {
        let err = Cnf::parse("p cnf 2 1\n1 3 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::VarOutOfRange { line: 2, max_var: 2, .. }));

        let err = Cnf::parse("p cnf 2 1\n1 x 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::BadToken { line: 2, .. }));

        let err = Cnf::parse("p dnf 2 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::BadHeader { line: 1, .. }));

        let err = Cnf::parse("1 2 0\n-1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Unterminated));

        let err = Cnf::parse("-2147483648 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::BadLit { line: 1, .. }));

        let err = Cnf::parse("p cnf 1 1\n1 0 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::EmptyClause { line: 2 }));

        let err = Cnf::parse("1 0\n\n0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::EmptyClause { line: 3 }));
    }
}
