//! Pure topology/alphabet generators for the common puzzle shapes.
//!
//! Each function returns the `(topology, symbols, columns)` triple that
//! [`crate::solver::GeneralSolver::preset_sudoku`] and its siblings feed
//! straight through the normal `set_topology`/`set_symbols`/`set_columns`
//! setters — there is no back door into `GeneralSolver` that bypasses
//! validation.

use crate::error::{Result, SolverError};

/// Digits `1`..=`n*n` as alphabet tokens, with `.` reserved for empty.
fn digit_alphabet(n: usize) -> String {
    let mut out = String::from(".");
    for v in 1..=(n * n) {
        out.push(' ');
        out.push_str(&v.to_string());
    }
    out
}

/// Letters `A`, `B`, ... for a Latin square of the given order (wraps past
/// `Z` into `AA`, `AB`, ... though no real puzzle needs that many).
fn letter_alphabet(n: usize) -> String {
    let mut out = String::from(".");
    for v in 0..n {
        out.push(' ');
        out.push_str(&letter_token(v));
    }
    out
}

fn letter_token(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn cell(sets: &[String]) -> String {
    sets.join(",")
}

/// Standard `n*n x n*n` Sudoku: rows `r0..`, columns `c0..`, boxes `s0..`.
pub fn sudoku(n: usize) -> Result<(String, String, usize)> {
    if n == 0 {
        return Err(SolverError::configuration("sudoku: n must be at least 1"));
    }
    let size = n * n;
    let mut cells = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let box_index = (row / n) * n + (col / n);
            cells.push(cell(&[
                format!("r{row}"),
                format!("c{col}"),
                format!("s{box_index}"),
            ]));
        }
    }
    Ok((cells.join(" "), digit_alphabet(size), size))
}

/// Standard Sudoku plus both main diagonals, named `d0` and `d1`.
pub fn sudokux(n: usize) -> Result<(String, String, usize)> {
    if n == 0 {
        return Err(SolverError::configuration("sudokux: n must be at least 1"));
    }
    let size = n * n;
    let mut cells = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let box_index = (row / n) * n + (col / n);
            let mut sets = vec![
                format!("r{row}"),
                format!("c{col}"),
                format!("s{box_index}"),
            ];
            if row == col {
                sets.push("d0".to_owned());
            }
            if row + col == size - 1 {
                sets.push("d1".to_owned());
            }
            cells.push(cell(&sets));
        }
    }
    Ok((cells.join(" "), digit_alphabet(size), size))
}

/// Rows, columns, and `h x v` rectangular boxes tiling a `size x size`
/// grid. `size` must be divisible by both `h` and `v`.
pub fn brick(h: usize, v: usize, size: usize) -> Result<(String, String, usize)> {
    if h == 0 || v == 0 || size == 0 {
        return Err(SolverError::configuration(
            "brick: h, v, and size must all be at least 1",
        ));
    }
    if size % h != 0 || size % v != 0 {
        return Err(SolverError::configuration(format!(
            "brick: size {size} is not divisible by both h={h} and v={v}"
        )));
    }
    let boxes_per_row = size / h;
    let mut cells = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let box_index = (row / v) * boxes_per_row + (col / h);
            cells.push(cell(&[
                format!("r{row}"),
                format!("c{col}"),
                format!("s{box_index}"),
            ]));
        }
    }
    Ok((cells.join(" "), digit_alphabet(size), size))
}

/// Rows and columns only, lettered alphabet `A`, `B`, ....
pub fn latin(n: usize) -> Result<(String, String, usize)> {
    if n == 0 {
        return Err(SolverError::configuration("latin: n must be at least 1"));
    }
    let mut cells = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            cells.push(cell(&[format!("r{row}"), format!("c{col}")]));
        }
    }
    Ok((cells.join(" "), letter_alphabet(n), n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::topology::Topology;

    #[test]
    fn sudoku_3_has_81_cells_and_27_sets() {
        let (topo_str, symbols, columns) = sudoku(3).unwrap();
        let topo = Topology::parse(&topo_str).unwrap();
        assert_eq!(topo.num_cells(), 81);
        assert_eq!(topo.sets().len(), 27);
        assert_eq!(columns, 9);
        let alphabet = Alphabet::parse(&symbols).unwrap();
        assert_eq!(alphabet.num_symbols(), 9);
        topo.validate_against(&alphabet).unwrap();
    }

    #[test]
    fn sudokux_3_adds_two_diagonals() {
        let (topo_str, _, _) = sudokux(3).unwrap();
        let topo = Topology::parse(&topo_str).unwrap();
        assert_eq!(topo.set_named("d0").unwrap().membership.len(), 9);
        assert_eq!(topo.set_named("d1").unwrap().membership.len(), 9);
    }

    #[test]
    fn brick_rejects_indivisible_size() {
        assert!(brick(2, 3, 5).is_err());
    }

    #[test]
    fn brick_2x3_tiles_a_6x6_grid() {
        let (topo_str, _, columns) = brick(2, 3, 6).unwrap();
        let topo = Topology::parse(&topo_str).unwrap();
        assert_eq!(topo.num_cells(), 36);
        assert_eq!(columns, 6);
        for set in topo.sets() {
            if set.name.starts_with('s') {
                assert_eq!(set.membership.len(), 6);
            }
        }
    }

    #[test]
    fn latin_4_uses_letters() {
        let (topo_str, symbols, _) = latin(4).unwrap();
        let topo = Topology::parse(&topo_str).unwrap();
        assert_eq!(topo.num_cells(), 16);
        assert_eq!(symbols, ". A B C D");
    }
}
