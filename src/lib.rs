pub mod solver;

pub mod assignment;
pub mod clause;
pub mod clause_database;
pub mod cnf;
pub mod cref;
pub mod idx;
pub mod lbool;
pub mod lit;
pub mod occurrence;
pub mod options;
pub mod report;
pub mod restart;
pub mod utils;
pub mod var;
pub mod var_order;
pub mod watch;
