//! `GeneralSolver`: the public object callers configure, feed a problem,
//! and pull solutions from.

use std::rc::Rc;

use crate::allowed::AllowedSymbolSets;
use crate::alphabet::Alphabet;
use crate::backtrack::{self, GuessOutcome, RetryOutcome};
use crate::board::BoardState;
use crate::engine::{self, StepOutcome};
use crate::error::{Result, SolverError};
use crate::presets;
use crate::stack::Stack;
use crate::topology::Topology;
use crate::trace::StepTrace;

/// Trace verbosity levels for the `debug` configuration value: an ordered
/// knob rather than independent flags, since there are only ever two kinds
/// of event worth separately silencing (rule steps, and the noisier
/// backtracking guesses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No tracing output.
    Silent,
    /// One line per rule application (`F[cell value]`, ...).
    Steps,
    /// Steps, plus a line per guess made and retried.
    Guesses,
}

impl Verbosity {
    fn from_level(level: u8) -> Verbosity {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Steps,
            _ => Verbosity::Guesses,
        }
    }
}

/// Outcome of a `solution` call, matching the §6.4 status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Success = 0,
    NoSolution = 1,
    TooHard = 2,
    MultipleSolutions = 3,
}

impl SolveStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn text(self) -> &'static str {
        match self {
            SolveStatus::Success => "success",
            SolveStatus::NoSolution => "no solution",
            SolveStatus::TooHard => "too hard",
            SolveStatus::MultipleSolutions => "multiple solutions",
        }
    }
}

/// The generalized exact-cover puzzle engine.
///
/// Configuration (`symbols`, `topology`, `allowed_symbols`, `columns`,
/// `output_delimiter`, `iteration_limit`, `name`, `debug`) can be set at any
/// time; setting `symbols` or `topology` invalidates any in-progress
/// problem. Call `problem` to load a puzzle, then `solution` repeatedly to
/// enumerate solutions.
#[derive(Debug, Clone)]
pub struct GeneralSolver {
    alphabet: Option<Alphabet>,
    topology: Option<Rc<Topology>>,
    allowed: AllowedSymbolSets,

    columns: Option<usize>,
    output_delimiter: String,
    iteration_limit: usize,
    name: String,
    debug: u8,
    status_value: u8,

    board: Option<BoardState>,
    stack: Stack,
    iterations_this_call: usize,
}

impl Default for GeneralSolver {
    fn default() -> GeneralSolver {
        GeneralSolver {
            alphabet: None,
            topology: None,
            allowed: AllowedSymbolSets::new(),
            columns: None,
            output_delimiter: String::new(),
            iteration_limit: 0,
            name: String::new(),
            debug: 0,
            status_value: 0,
            board: None,
            stack: Stack::new(),
            iterations_this_call: 0,
        }
    }
}

impl GeneralSolver {
    pub fn new() -> GeneralSolver {
        GeneralSolver::default()
    }

    fn verbosity(&self) -> Verbosity {
        Verbosity::from_level(self.debug)
    }

    // -- configuration setters (§6.1) ---------------------------------

    pub fn set_symbols(&mut self, spec: &str) -> Result<()> {
        let alphabet = Alphabet::parse(spec)?;
        self.alphabet = Some(alphabet);
        self.allowed = AllowedSymbolSets::new();
        self.board = None;
        self.stack.clear();
        Ok(())
    }

    pub fn set_topology(&mut self, spec: &str) -> Result<()> {
        let topology = Topology::parse(spec)?;
        if let Some(alphabet) = &self.alphabet {
            topology.validate_against(alphabet)?;
        }
        self.topology = Some(Rc::new(topology));
        self.board = None;
        self.stack.clear();
        Ok(())
    }

    pub fn set_allowed_symbols(&mut self, spec: &str) -> Result<()> {
        let alphabet = self
            .alphabet
            .as_ref()
            .ok_or_else(|| SolverError::configuration("allowed_symbols: set `symbols` first"))?;
        self.allowed.configure(spec, alphabet)
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = Some(columns);
    }

    pub fn set_output_delimiter(&mut self, delimiter: &str) {
        self.output_delimiter = delimiter.to_owned();
    }

    pub fn set_iteration_limit(&mut self, limit: usize) {
        self.iteration_limit = limit;
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_debug(&mut self, level: u8) {
        self.debug = level;
    }

    pub fn set_status_value(&mut self, value: u8) -> Result<()> {
        if value > 3 {
            return Err(SolverError::configuration(format!(
                "status_value: {value} is out of range 0..=3"
            )));
        }
        self.status_value = value;
        Ok(())
    }

    pub fn status_value(&self) -> u8 {
        self.status_value
    }

    pub fn status_text(&self) -> &'static str {
        match self.status_value {
            0 => SolveStatus::Success.text(),
            1 => SolveStatus::NoSolution.text(),
            2 => SolveStatus::TooHard.text(),
            _ => SolveStatus::MultipleSolutions.text(),
        }
    }

    // -- presets (§4.8/§6.1) -------------------------------------------

    pub fn preset_sudoku(&mut self, n: usize) -> Result<()> {
        let (topology, symbols, columns) = presets::sudoku(n)?;
        self.set_symbols(&symbols)?;
        self.set_topology(&topology)?;
        self.set_columns(columns);
        Ok(())
    }

    pub fn preset_sudokux(&mut self, n: usize) -> Result<()> {
        let (topology, symbols, columns) = presets::sudokux(n)?;
        self.set_symbols(&symbols)?;
        self.set_topology(&topology)?;
        self.set_columns(columns);
        Ok(())
    }

    pub fn preset_brick(&mut self, h: usize, v: usize, size: usize) -> Result<()> {
        let (topology, symbols, columns) = presets::brick(h, v, size)?;
        self.set_symbols(&symbols)?;
        self.set_topology(&topology)?;
        self.set_columns(columns);
        Ok(())
    }

    pub fn preset_latin(&mut self, n: usize) -> Result<()> {
        let (topology, symbols, columns) = presets::latin(n)?;
        self.set_symbols(&symbols)?;
        self.set_topology(&topology)?;
        self.set_columns(columns);
        Ok(())
    }

    // -- problem loading (§6.2) -----------------------------------------

    /// Loads a problem string: one token per cell, in topology order.
    pub fn problem(&mut self, text: &str) -> Result<()> {
        let alphabet = self
            .alphabet
            .as_ref()
            .ok_or_else(|| SolverError::usage("problem: set `symbols` before loading a problem"))?;
        let topology = self
            .topology
            .as_ref()
            .ok_or_else(|| SolverError::usage("problem: set `topology` before loading a problem"))?;

        let needs_delimiter = alphabet.needs_delimiter() || self.allowed.needs_delimiter();
        let tokens = self.split_problem_tokens(text, needs_delimiter)?;

        if tokens.len() != topology.num_cells() {
            return Err(SolverError::problem(format!(
                "problem: expected {} cells, got {}",
                topology.num_cells(),
                tokens.len()
            )));
        }

        let mut board = BoardState::new(topology.clone(), alphabet.num_symbols());

        for (cell, token) in tokens.iter().enumerate() {
            if let Some(value) = alphabet.index_of(token) {
                if !board.try_set(cell, value) {
                    return Err(SolverError::problem(format!(
                        "problem: {token:?} at cell {cell} conflicts with an earlier given"
                    )));
                }
            } else if let Some(mask) = self.allowed.mask_of(token) {
                for v in 1..=alphabet.num_symbols() {
                    if !mask[v] {
                        board.eliminate(cell, v);
                    }
                }
            }
            // Anything else (including the literal empty token) leaves the
            // cell unassigned and unrestricted.
        }

        self.board = Some(board);
        self.stack.clear();
        self.iterations_this_call = 0;
        Ok(())
    }

    fn split_problem_tokens(&self, text: &str, needs_delimiter: bool) -> Result<Vec<String>> {
        if needs_delimiter {
            let delimiter = if self.output_delimiter.is_empty() {
                " "
            } else {
                &self.output_delimiter
            };
            Ok(text
                .split(delimiter)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect())
        } else {
            Ok(text
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_string())
                .collect())
        }
    }

    // -- solving (§4.5/§4.6) ---------------------------------------------

    /// Finds the next solution, resuming past whatever was previously
    /// found. Returns `Success` with the board fully assigned, `NoSolution`
    /// if the stack unwound completely, or `TooHard` if `iteration_limit`
    /// (when nonzero) was reached.
    pub fn solution(&mut self) -> Result<SolveStatus> {
        let topology = self
            .topology
            .as_ref()
            .ok_or_else(|| SolverError::usage("solution: no topology configured"))?
            .clone();
        let verbosity = self.verbosity();
        let board = self
            .board
            .as_mut()
            .ok_or_else(|| SolverError::usage("solution: call `problem` before `solution`"))?;

        // Resume: back out of whatever solution (or dead end) we reported
        // last time before searching for the next one.
        if !self.stack.is_empty() {
            if !Self::unwind_one(board, &mut self.stack) {
                return Ok(SolveStatus::NoSolution);
            }
        }

        loop {
            match engine::run_fixpoint(board, &topology, &mut self.stack) {
                StepOutcome::Contradiction => {
                    if verbosity >= Verbosity::Steps {
                        eprintln!("contradiction, backtracking");
                    }
                    if !Self::unwind_one(board, &mut self.stack) {
                        return Ok(SolveStatus::NoSolution);
                    }
                    continue;
                }
                StepOutcome::NoProgress => {
                    if board.is_solved() {
                        if verbosity >= Verbosity::Steps {
                            eprintln!("solved after {} steps", self.stack.len());
                        }
                        return Ok(SolveStatus::Success);
                    }
                    if self.iteration_limit != 0 && self.iterations_this_call >= self.iteration_limit {
                        return Ok(SolveStatus::TooHard);
                    }
                    self.iterations_this_call += 1;
                    match backtrack::make_guess(board, &mut self.stack) {
                        GuessOutcome::Placed => {
                            if verbosity >= Verbosity::Guesses {
                                eprintln!("guess: {:?}", self.stack.last().unwrap());
                            }
                            continue;
                        }
                        GuessOutcome::AlreadySolved => return Ok(SolveStatus::Success),
                    }
                }
                StepOutcome::Progress => unreachable!("run_fixpoint never returns Progress"),
            }
        }
    }

    /// Undoes exactly one logical unit of the stack: pops and reverses
    /// F/N/B/T records, and for `Choice` records either retries the next
    /// candidate (resuming the search) or pops it once exhausted and keeps
    /// unwinding. Returns `false` once the stack is fully empty with no
    /// remaining choice to retry.
    fn unwind_one(board: &mut BoardState, stack: &mut Stack) -> bool {
        loop {
            match stack.last() {
                None => return false,
                Some(crate::stack::StackRecord::Choice { .. }) => {
                    match backtrack::retry_guess(board, stack) {
                        RetryOutcome::Placed => return true,
                        RetryOutcome::Exhausted => continue,
                    }
                }
                Some(_) => {
                    let record = stack.pop().unwrap();
                    engine::undo(board, &record);
                }
            }
        }
    }

    // -- introspection -----------------------------------------------------

    pub fn trace(&self) -> StepTrace<'_> {
        StepTrace::new(self.stack.as_slice())
    }

    pub fn board(&self) -> Option<&BoardState> {
        self.board.as_ref()
    }

    pub fn alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref().map(|v| &**v)
    }

    /// Renders the board's current content as described in §6.3: symbols
    /// separated by `output_delimiter`, wrapped every `columns` cells. With
    /// no `columns` configured, the board prints as one unwrapped line —
    /// this crate doesn't try to query the controlling terminal's width.
    pub fn render(&self) -> Result<String> {
        let alphabet = self
            .alphabet
            .as_ref()
            .ok_or_else(|| SolverError::usage("render: no symbols configured"))?;
        let board = self
            .board
            .as_ref()
            .ok_or_else(|| SolverError::usage("render: call `problem` before `render`"))?;

        let empty_token = ".";
        let delimiter = if self.output_delimiter.is_empty() && alphabet.needs_delimiter() {
            " "
        } else {
            &self.output_delimiter
        };
        let columns = self.columns;

        let mut out = String::new();
        for cell in 0..board.num_cells() {
            if cell > 0 {
                match columns {
                    Some(cols) if cell % cols == 0 => out.push('\n'),
                    _ => out.push_str(delimiter),
                }
            }
            let token = alphabet.token_of(board.content(cell)).unwrap_or(empty_token);
            out.push_str(token);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_latin_square() {
        let mut solver = GeneralSolver::new();
        solver.preset_latin(3).unwrap();
        solver.problem("A . . . . . . . .").unwrap();
        let status = solver.solution().unwrap();
        assert_eq!(status, SolveStatus::Success);
        assert!(solver.board().unwrap().is_solved());
    }

    #[test]
    fn rejects_a_problem_with_conflicting_givens() {
        let mut solver = GeneralSolver::new();
        solver.preset_latin(2).unwrap();
        assert!(solver.problem("A A . .").is_err()); // two A's in the same row
    }

    #[test]
    fn solution_requires_problem_to_have_been_called() {
        let mut solver = GeneralSolver::new();
        solver.preset_latin(2).unwrap();
        assert!(solver.solution().is_err());
    }

    #[test]
    fn allowed_symbols_restrict_tagged_cells() {
        let mut solver = GeneralSolver::new();
        solver.preset_latin(2).unwrap();
        solver.set_allowed_symbols("only_a=A").unwrap();
        solver.problem("only_a . . .").unwrap();
        let status = solver.solution().unwrap();
        assert_eq!(status, SolveStatus::Success);
        assert_eq!(solver.board().unwrap().content(0), 1); // A
    }

    #[test]
    fn resuming_after_success_finds_a_second_distinct_solution_or_none() {
        let mut solver = GeneralSolver::new();
        solver.preset_latin(3).unwrap();
        solver.problem(". . . . . . . . .").unwrap();
        let first = solver.solution().unwrap();
        assert_eq!(first, SolveStatus::Success);
        let first_grid: Vec<usize> = (0..9).map(|c| solver.board().unwrap().content(c)).collect();
        let second = solver.solution().unwrap();
        if second == SolveStatus::Success {
            let second_grid: Vec<usize> = (0..9).map(|c| solver.board().unwrap().content(c)).collect();
            assert_ne!(first_grid, second_grid);
        }
    }
}
