//! Command-line front end: load a preset or explicit topology, solve a
//! problem read from stdin or an argument, print the result.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::{App, Arg, ArgGroup};

use sudoku_general::{GeneralSolver, SolveStatus};

struct Args {
    preset: Option<String>,
    topology: Option<String>,
    symbols: Option<String>,
    file: Option<String>,
    debug: u8,
    iteration_limit: usize,
    show_constraints: bool,
}

fn parse_args() -> Args {
    let matches = App::new("sudoku_general")
        .about("solve a generalized exact-cover puzzle")
        .arg(
            Arg::with_name("preset")
                .long("preset")
                .takes_value(true)
                .help("preset topology: \"sudoku N\", \"sudokux N\", \"latin N\", or \"brick H V SIZE\""),
        )
        .arg(
            Arg::with_name("topology")
                .long("topology")
                .takes_value(true)
                .help("explicit topology string, as an alternative to --preset"),
        )
        .arg(
            Arg::with_name("symbols")
                .long("symbols")
                .takes_value(true)
                .help("explicit alphabet string; required when --topology is used"),
        )
        .group(ArgGroup::with_name("layout").args(&["preset", "topology"]).required(true))
        .arg(
            Arg::with_name("file")
                .long("file")
                .takes_value(true)
                .help("file to read the problem from; defaults to stdin"),
        )
        .arg(
            Arg::with_name("debug")
                .long("debug")
                .takes_value(true)
                .default_value("0")
                .help("trace verbosity: 0 (silent), 1 (steps), 2 (steps and guesses)"),
        )
        .arg(
            Arg::with_name("iteration-limit")
                .long("iteration-limit")
                .takes_value(true)
                .default_value("0")
                .help("bound on backtracking guesses before giving up with TooHard; 0 disables"),
        )
        .arg(
            Arg::with_name("show-constraints")
                .long("show-constraints")
                .help("print the step trace's constraints_used summary after solving"),
        )
        .get_matches();

    Args {
        preset: matches.value_of("preset").map(str::to_owned),
        topology: matches.value_of("topology").map(str::to_owned),
        symbols: matches.value_of("symbols").map(str::to_owned),
        file: matches.value_of("file").map(str::to_owned),
        debug: matches.value_of("debug").unwrap().parse().unwrap_or(0),
        iteration_limit: matches.value_of("iteration-limit").unwrap().parse().unwrap_or(0),
        show_constraints: matches.is_present("show-constraints"),
    }
}

fn apply_preset(solver: &mut GeneralSolver, spec: &str) -> sudoku_general::Result<()> {
    let parts: Vec<&str> = spec.split_whitespace().collect();
    let parse_usize = |s: &str| {
        s.parse::<usize>().map_err(|_| {
            sudoku_general::SolverError::Configuration(format!("preset: bad number {s:?}"))
        })
    };
    match parts.as_slice() {
        ["sudoku", n] => solver.preset_sudoku(parse_usize(n)?),
        ["sudokux", n] => solver.preset_sudokux(parse_usize(n)?),
        ["latin", n] => solver.preset_latin(parse_usize(n)?),
        ["brick", h, v, size] => solver.preset_brick(parse_usize(h)?, parse_usize(v)?, parse_usize(size)?),
        _ => Err(sudoku_general::SolverError::Configuration(format!(
            "preset: unrecognized preset {spec:?}"
        ))),
    }
}

fn run(args: Args) -> sudoku_general::Result<String> {
    let mut solver = GeneralSolver::new();
    solver.set_debug(args.debug);
    solver.set_iteration_limit(args.iteration_limit);

    match (&args.preset, &args.topology) {
        (Some(preset), _) => apply_preset(&mut solver, preset)?,
        (None, Some(topology)) => {
            let symbols = args.symbols.as_deref().ok_or_else(|| {
                sudoku_general::SolverError::Configuration(
                    "--topology requires --symbols".to_owned(),
                )
            })?;
            solver.set_symbols(symbols)?;
            solver.set_topology(topology)?;
        }
        (None, None) => {
            return Err(sudoku_general::SolverError::Configuration(
                "must pass either --preset or --topology".to_owned(),
            ))
        }
    }

    let problem_text = match &args.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| sudoku_general::SolverError::Configuration(format!("{path}: {e}")))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| sudoku_general::SolverError::Configuration(e.to_string()))?;
            buf
        }
    };
    solver.problem(&problem_text)?;

    let status = solver.solution()?;
    let mut out = match status {
        SolveStatus::Success => solver.render()?,
        other => other.text().to_owned(),
    };
    if args.show_constraints {
        out.push('\n');
        out.push_str(&solver.trace().constraints_used());
    }
    Ok(out)
}

fn main() -> ExitCode {
    match run(parse_args()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
