//! The cell/set membership graph a puzzle is solved over.
//!
//! A topology is nothing more than: an ordered list of cells, each cell
//! naming the sets it belongs to. Everything else — rows, columns, boxes,
//! diagonals, irregular regions, bricks — is just a particular choice of
//! cell/set names fed through the same parser. [`crate::presets`] emits
//! those strings for the common shapes; this module only has to understand
//! the grammar, not the geometry.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::alphabet::Alphabet;
use crate::error::{Result, SolverError};

/// One cell's static membership, independent of any particular problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoCell {
    pub index: usize,
    /// The sets this cell belongs to, sorted by name.
    pub membership: Vec<String>,
}

/// One named set's static membership, independent of any particular
/// problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoSet {
    pub name: String,
    /// Member cell indices, in the order they were first seen.
    pub membership: Vec<usize>,
}

/// The parsed cell/set graph: cells, sets, and the pairwise intersections
/// between sets that share at least one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    cells: Vec<TopoCell>,
    sets: Vec<TopoSet>,
    set_index: HashMap<String, usize>,
    /// Keyed by the canonical `"A,B"` (A < B) form of the two set names.
    intersections: BTreeMap<String, Vec<usize>>,
    largest_set: usize,
}

/// Canonical key for an unordered pair of set names.
pub fn intersection_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a},{b}")
    } else {
        format!("{b},{a}")
    }
}

impl Topology {
    /// Parses the §4.2 grammar: a whitespace-separated list of cell specs,
    /// each a comma-separated list of set names. Line breaks count as
    /// whitespace.
    pub fn parse(spec: &str) -> Result<Topology> {
        let mut cells = Vec::new();
        let mut sets: Vec<TopoSet> = Vec::new();
        let mut set_index: HashMap<String, usize> = HashMap::new();
        let mut intersections: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (cell_index, cell_spec) in spec.split_whitespace().enumerate() {
            let mut names: Vec<String> = cell_spec
                .split(',')
                .map(|s| s.trim().to_owned())
                .collect();
            if names.iter().any(String::is_empty) {
                return Err(SolverError::configuration(format!(
                    "topology: empty set name in cell spec {cell_spec:?}"
                )));
            }
            names.sort();
            names.dedup();

            for i in 0..names.len() {
                for j in (i + 1)..names.len() {
                    let key = intersection_key(&names[i], &names[j]);
                    intersections.entry(key).or_default().push(cell_index);
                }
            }

            for name in &names {
                let set_idx = *set_index.entry(name.clone()).or_insert_with(|| {
                    sets.push(TopoSet {
                        name: name.clone(),
                        membership: Vec::new(),
                    });
                    sets.len() - 1
                });
                sets[set_idx].membership.push(cell_index);
            }

            cells.push(TopoCell {
                index: cell_index,
                membership: names,
            });
        }

        if cells.is_empty() {
            return Err(SolverError::configuration(
                "topology: must describe at least one cell",
            ));
        }

        let largest_set = sets.iter().map(|s| s.membership.len()).max().unwrap_or(0);

        Ok(Topology {
            cells,
            sets,
            set_index,
            intersections,
            largest_set,
        })
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[TopoCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> &TopoCell {
        &self.cells[index]
    }

    pub fn sets(&self) -> &[TopoSet] {
        &self.sets
    }

    pub fn set_named(&self, name: &str) -> Option<&TopoSet> {
        self.set_index.get(name).map(|&i| &self.sets[i])
    }

    pub fn set_index_of(&self, name: &str) -> Option<usize> {
        self.set_index.get(name).copied()
    }

    pub fn largest_set(&self) -> usize {
        self.largest_set
    }

    /// Cells shared by two distinct named sets, or an empty slice if they
    /// don't intersect.
    pub fn intersection(&self, a: &str, b: &str) -> &[usize] {
        self.intersections
            .get(&intersection_key(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All intersections with at least two shared cells — the only ones the
    /// box-claim rule can act on.
    pub fn useful_intersections(&self) -> impl Iterator<Item = (&str, &str, &[usize])> {
        self.intersections.iter().filter_map(|(key, cells)| {
            if cells.len() < 2 {
                return None;
            }
            let (a, b) = key.split_once(',')?;
            Some((a, b, cells.as_slice()))
        })
    }

    /// Checks that this topology's largest set can be filled without
    /// repeats from the given alphabet.
    pub fn validate_against(&self, alphabet: &Alphabet) -> Result<()> {
        if self.largest_set > alphabet.num_symbols() {
            return Err(SolverError::topology(format!(
                "largest set has {} cells but the alphabet only has {} non-empty symbols",
                self.largest_set,
                alphabet.num_symbols()
            )));
        }
        Ok(())
    }

    /// Renders this topology back into the §4.2 grammar. Re-parsing the
    /// result yields an equivalent topology (same cells, same sets by name
    /// and membership, same intersections) — the round-trip law of §8.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            for (j, name) in cell.membership.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{name}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Topology {
        // A 2x2 Latin square: rows r0,r1; cols c0,c1.
        Topology::parse("r0,c0 r0,c1 r1,c0 r1,c1").unwrap()
    }

    #[test]
    fn builds_cells_and_sets() {
        let topo = tiny();
        assert_eq!(topo.num_cells(), 4);
        assert_eq!(topo.sets().len(), 4);
        assert_eq!(topo.set_named("r0").unwrap().membership, vec![0, 1]);
        assert_eq!(topo.set_named("c1").unwrap().membership, vec![1, 3]);
        assert_eq!(topo.largest_set(), 2);
    }

    #[test]
    fn tracks_intersections() {
        let topo = tiny();
        assert_eq!(topo.intersection("r0", "c0"), &[0]);
        assert_eq!(topo.intersection("c0", "r0"), &[0]);
        assert_eq!(topo.intersection("r0", "r1"), &[] as &[usize]);
    }

    #[test]
    fn round_trips() {
        let topo = tiny();
        let described = topo.describe();
        let reparsed = Topology::parse(&described).unwrap();
        assert_eq!(topo, reparsed);
    }

    #[test]
    fn rejects_empty_set_name() {
        assert!(Topology::parse("r0, c0").is_err());
    }

    #[test]
    fn validates_against_alphabet() {
        let topo = Topology::parse("a,b,c a,b a,c b,c").unwrap(); // a set of size 3
        let small = Alphabet::parse(". 1 2").unwrap();
        assert!(topo.validate_against(&small).is_err());
        let big = Alphabet::parse(". 1 2 3").unwrap();
        assert!(topo.validate_against(&big).is_ok());
    }
}
