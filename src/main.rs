use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::AppSettings;
use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use serde_with::serde_as;
use serde_with::DurationSecondsWithFrac;
use tracing::info;

use cdcl_sat::cnf::Cnf;
use cdcl_sat::options::{Options, DEFAULT_OPTIONS};
use cdcl_sat::report::write_result;
use cdcl_sat::solver::{SolveResult, Solver};
use cdcl_sat::utils::measure_time;

const HEADING_LEARNING: &str = "LEARNING OPTIONS";
const HEADING_RESTART: &str = "RESTART OPTIONS";

#[derive(Parser)]
#[clap(author, version)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
struct Cli {
    /// Path to input CNF (plain or gzipped DIMACS).
    #[clap(value_name = "PATH")]
    input: PathBuf,

    /// Path to write the verdict and model in competition format.
    #[clap(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Path to write a JSON summary with statistics.
    #[clap(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Seed for branching polarities (default: wall clock).
    #[clap(long, value_name = "NUM")]
    seed: Option<u64>,

    /// Longest derived clause kept in the clause database.
    #[clap(help_heading = HEADING_LEARNING)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.learnt_size_limit)]
    learnt_size_limit: usize,

    /// Resolution steps per conflict analysis.
    #[clap(help_heading = HEADING_LEARNING)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.resolution_limit)]
    resolution_limit: usize,

    /// Number of backtracks between restarts.
    #[clap(help_heading = HEADING_RESTART)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.restart_interval)]
    restart_interval: usize,

    /// Number of restarts before switching to strict max-activity branching.
    #[clap(help_heading = HEADING_RESTART)]
    #[clap(long, value_name = "NUM")]
    #[clap(default_value_t = DEFAULT_OPTIONS.restart_budget)]
    restart_budget: usize,
}

#[serde_as]
#[derive(Debug, Serialize)]
struct RunSummary {
    name: String,
    result: SolveResult,
    seed: u64,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_total: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_parse: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_search: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_propagate: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_analyze: Duration,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time_rebuild_var_order: Duration,
    num_rebuild_var_order: usize,
    num_vars: usize,
    num_clauses: usize,
    num_learnts: usize,
    num_derived: usize,
    num_decisions: usize,
    num_propagations: usize,
    num_conflicts: usize,
    num_backjumps: usize,
    num_restarts: usize,
}

fn percent(part: Duration, total: Duration) -> f64 {
    100.0 * part.as_secs_f64() / total.as_secs_f64()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let time_start = Instant::now();
    let (time_parse, cnf) = measure_time(|| Cnf::from_file(&cli.input));
    let cnf = cnf.wrap_err_with(|| format!("Could not load '{}'", cli.input.display()))?;
    info!(
        "Parsed {} vars and {} clauses in {:?}",
        cnf.max_var,
        cnf.num_clauses(),
        time_parse
    );

    let options = Options {
        learnt_size_limit: cli.learnt_size_limit,
        resolution_limit: cli.resolution_limit,
        restart_interval: cli.restart_interval,
        restart_budget: cli.restart_budget,
        seed: cli.seed,
    };
    let mut solver = Solver::from_cnf(&cnf, options);

    let sat = solver.solve();
    let result = SolveResult::from(sat);
    let time_total = time_start.elapsed();

    if sat && !solver.verify() {
        bail!("Model does not satisfy the formula");
    }

    if let Some(output) = &cli.output {
        println!("Writing result to '{}'...", output.display());
        write_result(BufWriter::new(File::create(output)?), result, &solver.model())?;
    }

    let summary = RunSummary {
        name: cli
            .input
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        result,
        seed: solver.seed(),
        time_total,
        time_parse,
        time_search: solver.time_search,
        time_propagate: solver.time_propagate,
        time_analyze: solver.time_analyze,
        time_rebuild_var_order: solver.time_rebuild_var_order(),
        num_rebuild_var_order: solver.num_rebuild_var_order(),
        num_vars: solver.num_vars(),
        num_clauses: solver.num_clauses(),
        num_learnts: solver.num_learnts(),
        num_derived: solver.num_derived(),
        num_decisions: solver.num_decisions(),
        num_propagations: solver.num_propagations(),
        num_conflicts: solver.num_conflicts(),
        num_backjumps: solver.num_backjumps(),
        num_restarts: solver.num_restarts(),
    };

    if let Some(json) = &cli.json {
        println!("Writing summary to '{}'...", json.display());
        serde_json::to_writer_pretty(File::create(json)?, &summary)?;
    }

    // Print the result and statistics:
    let format = &Locale::en;
    println!("Solver returned: {:?}", result);
    println!("vars:         {}", solver.num_vars().to_formatted_string(format));
    println!("clauses:      {}", solver.num_clauses().to_formatted_string(format));
    println!("learnts:      {}", solver.num_learnts().to_formatted_string(format));
    println!("derived:      {}", solver.num_derived().to_formatted_string(format));
    println!("decisions:    {}", solver.num_decisions().to_formatted_string(format));
    println!("propagations: {}", solver.num_propagations().to_formatted_string(format));
    println!("conflicts:    {}", solver.num_conflicts().to_formatted_string(format));
    println!("backjumps:    {}", solver.num_backjumps().to_formatted_string(format));
    println!("restarts:     {}", solver.num_restarts().to_formatted_string(format));
    println!("time total:      {:?}", time_total);
    println!("time parse:      {:?} ({:.2}%)", time_parse, percent(time_parse, time_total));
    println!(
        "time search:     {:?} ({:.2}%)",
        solver.time_search,
        percent(solver.time_search, time_total)
    );
    println!(
        "time propagate:  {:?} ({:.2}%)",
        solver.time_propagate,
        percent(solver.time_propagate, time_total)
    );
    println!(
        "time analyze:    {:?} ({:.2}%)",
        solver.time_analyze,
        percent(solver.time_analyze, time_total)
    );
    println!(
        "time backtrack:  {:?} ({:.2}%)",
        solver.time_backtrack,
        percent(solver.time_backtrack, time_total)
    );
    println!(
        "time decide:     {:?} ({:.2}%)",
        solver.time_decide,
        percent(solver.time_decide, time_total)
    );
    println!(
        "time restart:    {:?} ({:.2}%)",
        solver.time_restart,
        percent(solver.time_restart, time_total)
    );
    println!(
        "time rebuild:    {:?} ({:.2}%) in {} rebuilds",
        solver.time_rebuild_var_order(),
        percent(solver.time_rebuild_var_order(), time_total),
        solver.num_rebuild_var_order().to_formatted_string(format)
    );

    std::process::exit(match result {
        SolveResult::Sat => 10,
        SolveResult::Unsat => 20,
    });
}
