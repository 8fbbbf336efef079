use crate::{Weight, V};

/// A dense `d x d` table of edge weights for one graph record.
///
/// A weight of 0 between two distinct vertices means "no edge"; it is never a
/// zero-cost edge. The diagonal is never consulted.
///
/// The table is row-major. It is meant to be reused across records: `clear` keeps
/// the allocation, and rows are overwritten in place through `row_mut`.
#[derive(Clone, Eq, PartialEq)]
pub struct AdjacencyMatrix {
    num_verts: usize,
    weights: Vec<Weight>,
}

impl AdjacencyMatrix {
    pub fn new(num_verts: usize) -> Self {
        Self {
            num_verts,
            weights: vec![0; num_verts * num_verts],
        }
    }

    /// Builds a matrix from explicit rows. Every row must have one entry per row.
    pub fn from_rows(rows: &[&[Weight]]) -> Self {
        let num_verts = rows.len();
        let mut matrix = Self::new(num_verts);
        for (from, &row) in rows.iter().enumerate() {
            assert_eq!(row.len(), num_verts, "row {} has the wrong length", from);
            matrix.row_mut(from).copy_from_slice(row);
        }
        matrix
    }

    pub fn num_verts(&self) -> usize {
        self.num_verts
    }

    /// Resets every weight to "no edge".
    pub fn clear(&mut self) {
        for w in self.weights.iter_mut() {
            *w = 0;
        }
    }

    pub fn row(&self, from: usize) -> &[Weight] {
        let start = from * self.num_verts;
        &self.weights[start..start + self.num_verts]
    }

    pub fn row_mut(&mut self, from: usize) -> &mut [Weight] {
        let start = from * self.num_verts;
        &mut self.weights[start..start + self.num_verts]
    }

    pub fn weight(&self, from: V, to: V) -> Weight {
        self.weights[from as usize * self.num_verts + to as usize]
    }

    pub fn has_edge(&self, from: V, to: V) -> bool {
        from != to && self.weight(from, to) != 0
    }

    /// Iterates the edges leaving `from`, as `(to, weight)`.
    pub fn edges_from(&self, from: V) -> impl Iterator<Item = (V, Weight)> + '_ {
        self.row(from as usize)
            .iter()
            .enumerate()
            .filter(move |&(to, &w)| w != 0 && to as V != from)
            .map(|(to, &w)| (to as V, w))
    }
}

use core::fmt::{Debug, Formatter};

impl Debug for AdjacencyMatrix {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> core::fmt::Result {
        fmt.debug_list()
            .entries((0..self.num_verts).map(|from| self.row(from)))
            .finish()
    }
}
