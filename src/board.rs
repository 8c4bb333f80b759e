//! Per-cell and per-set bookkeeping with O(1) incremental updates.
//!
//! This is the heart of the engine: a cell's "is `v` still possible here"
//! question must answer in constant time, and must be perfectly reversible
//! so that backtracking can undo thousands of placements cheaply. A naive
//! boolean flag can't do this alone — the same symbol can become
//! "impossible" in a cell for more than one reason (it's placed in more
//! than one set the cell belongs to), so a boolean would forget the second
//! reason when the first is undone. Instead every (cell, symbol) pair keeps
//! a small counter: the symbol is possible exactly when the counter reads
//! zero.

use std::rc::Rc;

use crate::topology::Topology;

/// Live per-cell and per-set state for one loaded problem.
///
/// Constructed fresh by [`crate::GeneralSolver::problem`] from the current
/// [`Topology`]; every `try_set` call keeps it consistent with the
/// invariants in SPEC_FULL.md §3.
#[derive(Debug, Clone)]
pub struct BoardState {
    topology: Rc<Topology>,
    num_symbols: usize,

    /// cell index -> set indices it belongs to
    cell_sets: Vec<Vec<usize>>,
    /// set index -> member cell indices
    set_cells: Vec<Vec<usize>>,

    /// cell index -> current symbol (0 = unassigned)
    content: Vec<usize>,
    /// cell index -> per-symbol possibility counter, 1..=num_symbols used
    possible: Vec<Vec<u32>>,
    /// set index -> per-symbol occupancy count, 1..=num_symbols used
    set_content: Vec<Vec<u32>>,
    /// set index -> number of unassigned member cells
    set_free: Vec<usize>,

    cells_unassigned: usize,
}

impl BoardState {
    /// Builds a blank board (every cell unassigned, every symbol possible
    /// everywhere) for the given topology and alphabet size.
    pub fn new(topology: Rc<Topology>, num_symbols: usize) -> BoardState {
        let num_cells = topology.num_cells();
        let num_sets = topology.sets().len();

        let mut cell_sets = vec![Vec::new(); num_cells];
        let set_cells: Vec<Vec<usize>> = topology
            .sets()
            .iter()
            .map(|s| s.membership.clone())
            .collect();
        for (set_idx, set) in topology.sets().iter().enumerate() {
            for &cell in &set.membership {
                cell_sets[cell].push(set_idx);
            }
        }

        let set_free = topology.sets().iter().map(|s| s.membership.len()).collect();

        BoardState {
            topology,
            num_symbols,
            cell_sets,
            set_cells,
            content: vec![0; num_cells],
            possible: vec![vec![0; num_symbols + 1]; num_cells],
            set_content: vec![vec![0; num_symbols + 1]; num_sets],
            set_free,
            cells_unassigned: num_cells,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn num_cells(&self) -> usize {
        self.content.len()
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn content(&self, cell: usize) -> usize {
        self.content[cell]
    }

    /// `true` iff `v` remains a legal value for `cell` (the possibility
    /// counter reads zero).
    pub fn is_possible(&self, cell: usize, v: usize) -> bool {
        debug_assert!(v >= 1 && v <= self.num_symbols);
        self.possible[cell][v] == 0
    }

    /// The raw possibility counter, mostly useful for invariant checks.
    pub fn possibility_count(&self, cell: usize, v: usize) -> u32 {
        self.possible[cell][v]
    }

    pub fn cells_unassigned(&self) -> usize {
        self.cells_unassigned
    }

    pub fn is_solved(&self) -> bool {
        self.cells_unassigned == 0
    }

    /// Symbols still legal for an unassigned cell, in ascending order.
    pub fn candidates(&self, cell: usize) -> Vec<usize> {
        (1..=self.num_symbols)
            .filter(|&v| self.is_possible(cell, v))
            .collect()
    }

    pub fn candidate_count(&self, cell: usize) -> usize {
        (1..=self.num_symbols)
            .filter(|&v| self.is_possible(cell, v))
            .count()
    }

    pub fn cell_sets(&self, cell: usize) -> &[usize] {
        &self.cell_sets[cell]
    }

    pub fn set_cells(&self, set: usize) -> &[usize] {
        &self.set_cells[set]
    }

    pub fn set_free(&self, set: usize) -> usize {
        self.set_free[set]
    }

    pub fn set_content(&self, set: usize, v: usize) -> u32 {
        self.set_content[set][v]
    }

    pub fn num_sets(&self) -> usize {
        self.set_cells.len()
    }

    /// Suppresses `v` as a candidate for `cell` without touching `content`.
    /// Used both to apply an allowed-symbol mask before solving starts (a
    /// suppression that is simply never undone) and by the B and T rules to
    /// record an elimination that backtracking may later need to reverse via
    /// [`BoardState::restore`].
    pub(crate) fn eliminate(&mut self, cell: usize, v: usize) {
        self.possible[cell][v] += 1;
    }

    /// Reverses one [`BoardState::eliminate`] call.
    pub(crate) fn restore(&mut self, cell: usize, v: usize) {
        self.possible[cell][v] -= 1;
    }

    /// Attempts to place `new` in `cell` (`0` clears it). Returns `true` on
    /// success (including the `new == old` no-op case) and `false` if `new`
    /// already occupies some set containing `cell`, in which case the board
    /// is left completely unchanged.
    pub fn try_set(&mut self, cell: usize, new: usize) -> bool {
        let old = self.content[cell];
        if new == old {
            return true;
        }

        if new != 0 {
            for &s in &self.cell_sets[cell] {
                if self.set_content[s][new] > 0 {
                    return false;
                }
            }
        }

        self.content[cell] = new;
        match (old == 0, new == 0) {
            (true, false) => self.cells_unassigned -= 1,
            (false, true) => self.cells_unassigned += 1,
            _ => {}
        }

        let sets = self.cell_sets[cell].clone();
        for s in sets {
            if old != 0 {
                self.set_content[s][old] -= 1;
                self.set_free[s] += 1;
                for &m in &self.set_cells[s].clone() {
                    self.possible[m][old] -= 1;
                }
            }
            if new != 0 {
                self.set_content[s][new] += 1;
                self.set_free[s] -= 1;
                for &m in &self.set_cells[s].clone() {
                    self.possible[m][new] += 1;
                }
            }
        }

        true
    }

    /// Checks the invariants of SPEC_FULL.md §3/§8 that can be verified
    /// without external knowledge of how the state was reached. Intended
    /// for tests, not for the hot path.
    #[cfg(test)]
    fn check_invariants(&self) {
        for (set_idx, cells) in self.set_cells.iter().enumerate() {
            let mut total: usize = self.set_content[set_idx].iter().skip(1).map(|&c| c as usize).sum();
            total += self.set_free[set_idx];
            assert_eq!(total, cells.len(), "set {set_idx} content+free mismatch");

            let free = cells.iter().filter(|&&c| self.content[c] == 0).count();
            assert_eq!(free, self.set_free[set_idx], "set {set_idx} free mismatch");
        }

        for cell in 0..self.num_cells() {
            for v in 1..=self.num_symbols {
                let blocked_by_a_set = self.cell_sets[cell]
                    .iter()
                    .any(|&s| self.set_content[s][v] > 0);
                assert_eq!(
                    self.possible[cell][v] == 0,
                    !blocked_by_a_set,
                    "cell {cell} symbol {v} possibility counter disagrees with set occupancy"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    fn board(spec: &str, num_symbols: usize) -> BoardState {
        let topo = Rc::new(Topology::parse(spec).unwrap());
        BoardState::new(topo, num_symbols)
    }

    #[test]
    fn fresh_board_has_everything_possible() {
        let b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        for cell in 0..4 {
            assert!(b.is_possible(cell, 1));
            assert!(b.is_possible(cell, 2));
        }
        assert_eq!(b.cells_unassigned(), 4);
    }

    #[test]
    fn placing_excludes_row_and_column_peers() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        assert!(b.try_set(0, 1));
        assert!(!b.is_possible(1, 1)); // same row
        assert!(!b.is_possible(2, 1)); // same column
        assert!(b.is_possible(3, 1)); // neither
        assert_eq!(b.cells_unassigned(), 3);
        b.check_invariants();
    }

    #[test]
    fn conflicting_placement_is_rejected_and_state_unchanged() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        assert!(b.try_set(0, 1));
        let before = b.clone();
        assert!(!b.try_set(1, 1)); // 1 already used in r0
        assert_eq!(format!("{:?}", b.content), format!("{:?}", before.content));
    }

    #[test]
    fn untry_restores_possibility_and_matches_snapshot() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        let snapshot = b.clone();
        assert!(b.try_set(0, 1));
        assert!(b.try_set(0, 0)); // untry
        assert_eq!(b.content, snapshot.content);
        assert_eq!(b.possible, snapshot.possible);
        assert_eq!(b.set_content, snapshot.set_content);
        assert_eq!(b.set_free, snapshot.set_free);
    }

    #[test]
    fn no_op_when_value_unchanged() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        assert!(b.try_set(0, 0)); // clearing an already-empty cell is a no-op
        assert!(b.try_set(0, 1));
        assert!(b.try_set(0, 1)); // re-placing the same value is a no-op
        assert_eq!(b.content(0), 1);
    }

    #[test]
    fn eliminate_suppresses_symbol_without_assigning() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        b.eliminate(0, 1);
        assert!(!b.is_possible(0, 1));
        assert!(b.is_possible(0, 2));
        assert_eq!(b.content(0), 0);
    }

    #[test]
    fn eliminate_and_restore_round_trip() {
        let mut b = board("r0,c0 r0,c1 r1,c0 r1,c1", 2);
        b.eliminate(0, 1);
        b.restore(0, 1);
        assert!(b.is_possible(0, 1));
    }
}
