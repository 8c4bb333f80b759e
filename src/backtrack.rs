//! Backtracking search: the fallback used once F, N, B, and T are all
//! stuck. Selection always prefers the unassigned cell with the fewest
//! remaining candidates, ties broken by cell index, per §4.5.
//!
//! A guess is a `Choice` record on the shared [`Stack`]. Unlike F/N/B/T
//! records it isn't simply popped and forgotten on the way back down:
//! exhausting its current cell's candidates moves the pointer to the next
//! cell in the sorted list captured when the choice was created, before the
//! whole record finally gives up and is popped.

use crate::board::BoardState;
use crate::stack::{Stack, StackRecord};

/// What happened when the backtracker was asked to make progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// A value was placed; resume the F-N-B-T fixpoint.
    Placed,
    /// No unassigned cell remains — the board is already solved.
    AlreadySolved,
}

/// What happened when an exhausted choice was asked to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The next candidate (possibly for a different cell) was placed.
    Placed,
    /// Every cell in the saved candidate list is exhausted; the record was
    /// popped and the caller must keep unwinding into whatever is below it.
    Exhausted,
}

/// Picks the unassigned cell with the fewest remaining candidates (ties
/// broken by index) and pushes a new `Choice` record trying its smallest
/// candidate value.
pub fn make_guess(board: &mut BoardState, stack: &mut Stack) -> GuessOutcome {
    let mut candidates: Vec<usize> = (0..board.num_cells())
        .filter(|&c| board.content(c) == 0)
        .collect();
    if candidates.is_empty() {
        return GuessOutcome::AlreadySolved;
    }
    candidates.sort_by_key(|&c| (board.candidate_count(c), c));

    let cell_ptr = 0;
    let cell = candidates[cell_ptr];
    let value = board
        .candidates(cell)
        .into_iter()
        .next()
        .expect("selected cell must have at least one candidate or F would have failed first");
    let placed = board.try_set(cell, value);
    debug_assert!(placed);
    stack.push(StackRecord::Choice {
        candidates,
        cell_ptr,
        value,
    });
    GuessOutcome::Placed
}

/// Advances the top-of-stack `Choice` record in place: tries the next
/// candidate value for its current cell, or moves on to the next cell in
/// its saved list (restarting from the smallest value) once the current
/// cell's candidates are exhausted.
///
/// The caller must have already confirmed `stack.last()` is a `Choice`.
/// Leaves the board fully untried (back to how it was before this choice
/// was created) when it returns [`RetryOutcome::Exhausted`], and pops the
/// record in that case.
pub fn retry_guess(board: &mut BoardState, stack: &mut Stack) -> RetryOutcome {
    let (candidates, mut cell_ptr, old_value) = match stack.last() {
        Some(StackRecord::Choice {
            candidates,
            cell_ptr,
            value,
        }) => (candidates.clone(), *cell_ptr, *value),
        _ => unreachable!("retry_guess called without a Choice on top"),
    };

    let mut cell = candidates[cell_ptr];
    board.try_set(cell, 0);

    // First, look for another candidate at the same cell.
    if let Some(next) = ((old_value + 1)..=board.num_symbols()).find(|&v| board.is_possible(cell, v)) {
        board.try_set(cell, next);
        *stack.last_mut().unwrap() = StackRecord::Choice {
            candidates,
            cell_ptr,
            value: next,
        };
        return RetryOutcome::Placed;
    }

    // This cell is exhausted; walk forward through the saved list.
    loop {
        cell_ptr += 1;
        if cell_ptr >= candidates.len() {
            stack.pop();
            return RetryOutcome::Exhausted;
        }
        cell = candidates[cell_ptr];
        if board.content(cell) != 0 {
            // Already assigned by deduction before this choice point was
            // reached; it's not a candidate any more, skip it.
            continue;
        }
        if let Some(value) = (1..=board.num_symbols()).find(|&v| board.is_possible(cell, v)) {
            board.try_set(cell, value);
            *stack.last_mut().unwrap() = StackRecord::Choice {
                candidates,
                cell_ptr,
                value,
            };
            return RetryOutcome::Placed;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::topology::Topology;

    fn board(spec: &str, num_symbols: usize) -> BoardState {
        let topo = Rc::new(Topology::parse(spec).unwrap());
        BoardState::new(topo, num_symbols)
    }

    #[test]
    fn guesses_the_cell_with_fewest_candidates() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        b.try_set(1, 1); // cell0 now has only candidate 2 via row; cell2 only 2 via col
        let mut stack = Stack::new();
        let outcome = make_guess(&mut b, &mut stack);
        assert_eq!(outcome, GuessOutcome::Placed);
        assert_eq!(b.content(0), 2);
    }

    #[test]
    fn retry_tries_next_value_for_the_same_cell() {
        let mut b = board("x", 2);
        let mut stack = Stack::new();
        make_guess(&mut b, &mut stack); // the only cell <- 1 (first candidate)
        assert_eq!(b.content(0), 1);
        let outcome = retry_guess(&mut b, &mut stack);
        assert_eq!(outcome, RetryOutcome::Placed);
        assert_eq!(b.content(0), 2); // same cell, next value
        let outcome = retry_guess(&mut b, &mut stack);
        assert_eq!(outcome, RetryOutcome::Exhausted);
        assert_eq!(b.content(0), 0); // fully untried, no other cell to fall back to
    }

    #[test]
    fn retry_falls_back_to_next_cell_once_the_first_is_exhausted() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        let mut stack = Stack::new();
        make_guess(&mut b, &mut stack); // cell0 <- 1
        retry_guess(&mut b, &mut stack); // cell0 <- 2
        let outcome = retry_guess(&mut b, &mut stack); // cell0 exhausted, fall back
        assert_eq!(outcome, RetryOutcome::Placed);
        assert_eq!(b.content(0), 0);
        assert_eq!(b.content(1), 1); // next cell in the saved order, restarted at 1
    }

    #[test]
    fn already_solved_reports_no_guess_needed() {
        let mut b = board("r0,c0", 1);
        b.try_set(0, 1);
        let mut stack = Stack::new();
        assert_eq!(make_guess(&mut b, &mut stack), GuessOutcome::AlreadySolved);
    }
}
