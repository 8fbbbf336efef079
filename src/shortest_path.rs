use crate::matrix::AdjacencyMatrix;
use crate::vertex_heap::VertexHeap;
use crate::{Distance, Score, Weight, UNREACHED};
use log::trace;

/// The outcome of one shortest-path run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PathScore {
    /// Sum of the finalized distances. If `pruned` is set, this is a partial sum that is
    /// already at or above the threshold, and the true score is at least this large.
    pub score: Score,
    pub pruned: bool,
}

/// Reusable state for running Dijkstra from vertex 0 over an adjacency matrix.
///
/// The frontier and the distance table keep their allocations between runs, so scoring
/// a stream of same-sized graphs does not allocate per record.
pub struct ShortestPath {
    heap: VertexHeap,
    initial: Vec<Distance>,
    distances: Vec<Distance>,
}

impl ShortestPath {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(num_verts: usize) -> Self {
        Self {
            heap: VertexHeap::with_capacity(num_verts),
            initial: Vec::with_capacity(num_verts),
            distances: Vec::with_capacity(num_verts),
        }
    }

    /// Computes the path-sum score of `matrix`: the sum of shortest distances from
    /// vertex 0 to every vertex, where unreachable vertices count as 0.
    ///
    /// If `threshold` is given and the running sum reaches it, the run stops early and
    /// the result is marked `pruned`.
    pub fn run(&mut self, matrix: &AdjacencyMatrix, threshold: Option<Score>) -> PathScore {
        let nv = matrix.num_verts();

        self.initial.clear();
        self.initial.resize(nv, UNREACHED);
        if nv > 0 {
            self.initial[0] = 0;
        }
        self.heap.build(&self.initial);

        self.distances.clear();
        self.distances.resize(nv, UNREACHED);

        let mut score: Score = 0;
        while let Some(u) = self.heap.extract_min() {
            if u.distance == UNREACHED {
                // Everything left in the frontier is unreachable and contributes 0.
                break;
            }
            self.distances[u.id as usize] = u.distance;
            score += u.distance;

            if let Some(threshold) = threshold {
                if score >= threshold {
                    trace!(
                        "pruned after finalizing v{}: partial score {} >= threshold {}",
                        u.id,
                        score,
                        threshold
                    );
                    return PathScore {
                        score,
                        pruned: true,
                    };
                }
            }

            for (v, w) in matrix.edges_from(u.id) {
                if let Some(position) = self.heap.position(v) {
                    let alt = u.distance + Distance::from(w);
                    if alt < self.heap.key_at(position) {
                        self.heap.decrease_key_at(position, alt);
                    }
                }
            }
        }

        PathScore {
            score,
            pruned: false,
        }
    }

    /// Distances finalized by the last run, indexed by vertex. Vertices that were never
    /// reached (or never finalized, if the run was pruned) hold `UNREACHED`.
    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }
}

/// A lower bound on the score of any graph whose source row is `row`.
///
/// Every direct neighbour of the source is at distance at least the smallest weight
/// leaving the source, so the score is at least that weight times the number of direct
/// neighbours. The diagonal entry is ignored.
pub fn source_row_lower_bound(row: &[Weight]) -> Score {
    let mut min_weight: Option<Weight> = None;
    let mut num_neighbours: Score = 0;
    for &w in row.iter().skip(1) {
        if w != 0 {
            num_neighbours += 1;
            min_weight = Some(min_weight.map_or(w, |m| m.min(w)));
        }
    }
    min_weight.map_or(0, |m| Score::from(m) * num_neighbours)
}
