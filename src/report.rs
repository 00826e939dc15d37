use std::io;
use std::io::Write;

use crate::solver::SolveResult;

/// Write the verdict in the SAT-competition output format:
/// `s SATISFIABLE` followed by a `v ... 0` model line, or `s UNSATISFIABLE`.
pub fn write_result<W>(mut writer: W, result: SolveResult, model: &[i32]) -> io::Result<()>
where
    W: Write,
{
    match result {
        SolveResult::Sat => {
            writeln!(writer, "s SATISFIABLE")?;
            write!(writer, "v")?;
            for value in model {
                write!(writer, " {}", value)?;
            }
            writeln!(writer, " 0")?;
        }
        SolveResult::Unsat => {
            writeln!(writer, "s UNSATISFIABLE")?;
        }
    }
    writer.flush()
}
