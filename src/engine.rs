//! The deductive fixpoint: rules F, N, B, T applied in that fixed order,
//! restarting from F after any rule makes progress.
//!
//! Each rule looks only at [`BoardState`]'s possibility counters, never at
//! the stack directly; it reports what it did by pushing exactly one
//! [`StackRecord`]. The caller ([`crate::solver::GeneralSolver`]) owns the
//! restart loop and decides what to do when every rule reports
//! [`StepOutcome::NoProgress`] (hand off to the backtracker) or
//! [`StepOutcome::Contradiction`] (unwind).

use itertools::Itertools;

use crate::board::BoardState;
use crate::stack::{Stack, StackRecord};
use crate::topology::Topology;

/// What one rule application accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The rule changed the board; restart the fixpoint from F.
    Progress,
    /// The rule found nothing to do.
    NoProgress,
    /// An unassigned cell has no remaining candidates. The caller must
    /// unwind via the stack until a backtracking choice can be retried.
    Contradiction,
}

/// Applies rule F: if some unassigned cell has exactly one remaining
/// candidate, place it. If some unassigned cell has zero, report a
/// contradiction. Cells are scanned in index order, the first match wins.
pub fn apply_forced(board: &mut BoardState, stack: &mut Stack) -> StepOutcome {
    for cell in 0..board.num_cells() {
        if board.content(cell) != 0 {
            continue;
        }
        let candidates = board.candidates(cell);
        match candidates.len() {
            0 => return StepOutcome::Contradiction,
            1 => {
                let value = candidates[0];
                let placed = board.try_set(cell, value);
                debug_assert!(placed, "forced candidate must always be legal");
                stack.push(StackRecord::Forced { cell, value });
                return StepOutcome::Progress;
            }
            _ => {}
        }
    }
    StepOutcome::NoProgress
}

/// Applies rule N: if some set has exactly one unassigned member that can
/// still take some value `v`, place `v` there. Sets are scanned in name
/// order (`Topology::sets` is already built in first-seen order; we sort by
/// name here so the result doesn't depend on input ordering), then `v` from
/// `1` upward.
pub fn apply_necessary(board: &mut BoardState, topology: &Topology, stack: &mut Stack) -> StepOutcome {
    let mut set_order: Vec<usize> = (0..topology.sets().len()).collect();
    set_order.sort_by(|&a, &b| topology.sets()[a].name.cmp(&topology.sets()[b].name));

    for set in set_order {
        for v in 1..=board.num_symbols() {
            let mut only: Option<usize> = None;
            let mut count = 0;
            for &cell in board.set_cells(set) {
                if board.content(cell) == 0 && board.is_possible(cell, v) {
                    count += 1;
                    only = Some(cell);
                    if count > 1 {
                        break;
                    }
                }
            }
            if count == 1 {
                let cell = only.unwrap();
                let placed = board.try_set(cell, v);
                debug_assert!(placed, "necessary candidate must always be legal");
                stack.push(StackRecord::Necessary { cell, value: v });
                return StepOutcome::Progress;
            }
        }
    }
    StepOutcome::NoProgress
}

/// Applies rule B: a generalized pointing-pair/box-claim. For every
/// intersection `I` of two sets `A` and `B` with at least two shared cells,
/// and every value `v` still offered by some unassigned cell in `I`: if `v`
/// is still reachable outside `I` in exactly one of `A`/`B`, it can be
/// eliminated from that set's cells outside `I` (the other set's only
/// remaining source for `v` is `I` itself).
pub fn apply_box_claim(board: &mut BoardState, topology: &Topology, stack: &mut Stack) -> StepOutcome {
    for (a, b, inter) in topology.useful_intersections() {
        for v in 1..=board.num_symbols() {
            let inter_offers = inter
                .iter()
                .any(|&c| board.content(c) == 0 && board.is_possible(c, v));
            if !inter_offers {
                continue;
            }

            let outside_offers = |name: &str| -> bool {
                topology
                    .set_named(name)
                    .expect("set name came from this topology")
                    .membership
                    .iter()
                    .any(|&c| {
                        !inter.contains(&c) && board.content(c) == 0 && board.is_possible(c, v)
                    })
            };
            let outside_a = outside_offers(a);
            let outside_b = outside_offers(b);
            if outside_a == outside_b {
                continue;
            }
            let claimed_set = if outside_a { a } else { b };

            let mut eliminated = Vec::new();
            for &cell in &topology.set_named(claimed_set).unwrap().membership {
                if !inter.contains(&cell) && board.content(cell) == 0 && board.is_possible(cell, v) {
                    board.eliminate(cell, v);
                    eliminated.push(cell);
                }
            }
            if !eliminated.is_empty() {
                stack.push(StackRecord::BoxClaim {
                    cells: eliminated,
                    value: v,
                });
                return StepOutcome::Progress;
            }
        }
    }
    StepOutcome::NoProgress
}

/// Applies rule T: naked and hidden tuples of order 2 through 4. Sets are
/// scanned in name order; within a set, subsets of unassigned cells are
/// enumerated in ascending cell-index order via
/// [`itertools::Itertools::combinations`].
///
/// A subset of `k` open cells is a *naked* tuple when the symbols any of
/// them could still take number exactly `k` — those symbols may be
/// eliminated from every other open cell in the set. It is a *hidden*
/// tuple when exactly `k` symbols are confined to that subset (each is
/// possible in at least one subset cell and in no cell outside it) — every
/// other candidate may be eliminated from the subset's own cells.
pub fn apply_tuples(board: &mut BoardState, topology: &Topology, stack: &mut Stack) -> StepOutcome {
    let mut set_order: Vec<usize> = (0..topology.sets().len()).collect();
    set_order.sort_by(|&a, &b| topology.sets()[a].name.cmp(&topology.sets()[b].name));

    for set in set_order {
        let open: Vec<usize> = board
            .set_cells(set)
            .iter()
            .copied()
            .filter(|&c| board.content(c) == 0)
            .collect();
        if open.len() < 2 {
            continue;
        }

        let contributed: Vec<u32> = (0..=board.num_symbols())
            .map(|v| {
                if v == 0 {
                    0
                } else {
                    open.iter().filter(|&&c| board.is_possible(c, v)).count() as u32
                }
            })
            .collect();

        let max_k = open.len().min(4);
        for k in 2..=max_k {
            for subset in open.iter().copied().combinations(k) {
                let tcontr: Vec<u32> = (0..=board.num_symbols())
                    .map(|v| {
                        if v == 0 {
                            0
                        } else {
                            subset.iter().filter(|&&c| board.is_possible(c, v)).count() as u32
                        }
                    })
                    .collect();
                let discrete = (1..=board.num_symbols()).filter(|&v| tcontr[v] > 0).count();

                if discrete == k {
                    // Naked tuple: these k cells hold exactly these k
                    // symbols among them. Purge those symbols from every
                    // other open cell in the set.
                    let mut eliminations = Vec::new();
                    for v in 1..=board.num_symbols() {
                        if tcontr[v] == 0 || contributed[v] == tcontr[v] {
                            continue;
                        }
                        for &cell in &open {
                            if !subset.contains(&cell) && board.is_possible(cell, v) {
                                board.eliminate(cell, v);
                                eliminations.push((cell, v));
                            }
                        }
                    }
                    if !eliminations.is_empty() {
                        stack.push(StackRecord::Tuple { eliminations });
                        return StepOutcome::Progress;
                    }
                } else if discrete > k {
                    let within = (1..=board.num_symbols())
                        .filter(|&v| tcontr[v] > 0 && contributed[v] == tcontr[v])
                        .count();
                    if within >= k {
                        // Hidden tuple: these k symbols appear only inside
                        // the subset. Purge every other candidate from the
                        // subset's own cells.
                        let confined: Vec<usize> = (1..=board.num_symbols())
                            .filter(|&v| tcontr[v] > 0 && contributed[v] == tcontr[v])
                            .collect();
                        let mut eliminations = Vec::new();
                        for &cell in &subset {
                            for v in 1..=board.num_symbols() {
                                if !confined.contains(&v) && board.is_possible(cell, v) {
                                    board.eliminate(cell, v);
                                    eliminations.push((cell, v));
                                }
                            }
                        }
                        if !eliminations.is_empty() {
                            stack.push(StackRecord::Tuple { eliminations });
                            return StepOutcome::Progress;
                        }
                    }
                }
            }
        }
    }
    StepOutcome::NoProgress
}

/// Runs F, N, B, T in order, restarting from F on any progress, until a
/// full pass makes no progress (the board is stuck and needs a guess) or a
/// contradiction surfaces.
pub fn run_fixpoint(board: &mut BoardState, topology: &Topology, stack: &mut Stack) -> StepOutcome {
    loop {
        match apply_forced(board, stack) {
            StepOutcome::Progress => continue,
            StepOutcome::Contradiction => return StepOutcome::Contradiction,
            StepOutcome::NoProgress => {}
        }
        match apply_necessary(board, topology, stack) {
            StepOutcome::Progress => continue,
            StepOutcome::Contradiction => unreachable!("N never reports a contradiction"),
            StepOutcome::NoProgress => {}
        }
        match apply_box_claim(board, topology, stack) {
            StepOutcome::Progress => continue,
            StepOutcome::Contradiction => unreachable!("B never reports a contradiction"),
            StepOutcome::NoProgress => {}
        }
        match apply_tuples(board, topology, stack) {
            StepOutcome::Progress => continue,
            StepOutcome::Contradiction => unreachable!("T never reports a contradiction"),
            StepOutcome::NoProgress => {}
        }
        return StepOutcome::NoProgress;
    }
}

/// Reverses exactly one `StackRecord` on the board (not the stack itself —
/// callers pop separately so [`crate::backtrack`] can inspect a `Choice`
/// record before deciding whether to pop it).
pub fn undo(board: &mut BoardState, record: &StackRecord) {
    match record {
        StackRecord::Forced { cell, .. } | StackRecord::Necessary { cell, .. } => {
            board.try_set(*cell, 0);
        }
        StackRecord::BoxClaim { cells, value } => {
            for &cell in cells {
                board.restore(cell, *value);
            }
        }
        StackRecord::Tuple { eliminations } => {
            for &(cell, value) in eliminations {
                board.restore(cell, value);
            }
        }
        StackRecord::Choice { .. } => {
            unreachable!("Choice records are undone by crate::backtrack, not engine::undo")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::topology::Topology;

    fn setup(spec: &str, num_symbols: usize) -> (BoardState, Rc<Topology>) {
        let topo = Rc::new(Topology::parse(spec).unwrap());
        (BoardState::new(topo.clone(), num_symbols), topo)
    }

    #[test]
    fn forced_places_last_candidate_in_a_pair() {
        let (mut board, topo) = setup("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        board.try_set(0, 1);
        board.try_set(3, 1);
        let mut stack = Stack::new();
        let outcome = apply_forced(&mut board, &mut stack);
        // Cell 1 (r0,c1) can only be 2 now (1 is taken in r0); cell 2 (r1,c0)
        // can only be 2 as well. The first in index order wins.
        assert_eq!(outcome, StepOutcome::Progress);
        assert_eq!(board.content(1), 2);
        let _ = topo;
    }

    #[test]
    fn forced_reports_contradiction_on_dead_cell() {
        let (mut board, _topo) = setup("r0,c0 r0,c1", 1);
        board.try_set(0, 1);
        // Cell 1 shares a row with cell 0; with only one symbol available
        // and it already taken, cell 1 has no candidates.
        let mut stack = Stack::new();
        assert_eq!(apply_forced(&mut board, &mut stack), StepOutcome::Contradiction);
    }

    #[test]
    fn necessary_places_the_only_cell_offering_a_value() {
        // 3-cell row r0 where only cell 2 can still take 3.
        let (mut board, topo) = setup("r0,c0 r0,c1 r0,c2", 3);
        board.eliminate(0, 3);
        board.eliminate(1, 3);
        let mut stack = Stack::new();
        let outcome = apply_necessary(&mut board, &topo, &mut stack);
        assert_eq!(outcome, StepOutcome::Progress);
        assert_eq!(board.content(2), 3);
    }

    #[test]
    fn box_claim_confines_intersection_value_to_the_row() {
        // box b with 4 cells split across two rows r0/r1; row r0 also has an
        // extra cell (r0,x) outside the box. If 1 can only go in the box's
        // r0 cells, it must be eliminated from the rest of row r0.
        let (mut board, topo) = setup("r0,b r0,b r1,b r1,b r0,x", 4);
        // Suppress 1 everywhere in the box except the r0 rows (cells 0,1).
        board.eliminate(2, 1);
        board.eliminate(3, 1);
        let mut stack = Stack::new();
        let outcome = apply_box_claim(&mut board, &topo, &mut stack);
        assert_eq!(outcome, StepOutcome::Progress);
        assert!(!board.is_possible(4, 1)); // eliminated from r0,x
    }

    #[test]
    fn tuple_rule_eliminates_naked_pair_from_rest_of_set() {
        // A 4-cell set where cells 0 and 1 can only be {1,2}; cells 2,3
        // should lose 1 and 2 as candidates.
        let (mut board, topo) = setup("r0,c0 r0,c1 r0,c2 r0,c3", 4);
        for v in 3..=4 {
            board.eliminate(0, v);
            board.eliminate(1, v);
        }
        let mut stack = Stack::new();
        let outcome = apply_tuples(&mut board, &topo, &mut stack);
        assert_eq!(outcome, StepOutcome::Progress);
        assert!(!board.is_possible(2, 1));
        assert!(!board.is_possible(3, 2));
    }

    #[test]
    fn undo_reverses_a_forced_record() {
        let (mut board, topo) = setup("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        let mut stack = Stack::new();
        board.try_set(0, 1);
        board.try_set(3, 1);
        apply_forced(&mut board, &mut stack);
        let record = stack.pop().unwrap();
        undo(&mut board, &record);
        assert_eq!(board.content(1), 0);
        let _ = topo;
    }
}
