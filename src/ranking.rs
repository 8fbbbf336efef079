use crate::{GraphId, Score};
use log::debug;

/// One scored graph. Immutable once created.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RankEntry {
    pub graph_id: GraphId,
    pub score: Score,
}

/// Order in which `TopK::snapshot` reports graph ids.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SnapshotOrder {
    /// Heap array order: the current worst entry first, then its children, and so on.
    Heap,
    /// Ascending by score; equal scores by graph id.
    Score,
}

impl Default for SnapshotOrder {
    fn default() -> Self {
        SnapshotOrder::Heap
    }
}

fn left(parent: usize) -> usize { parent * 2 + 1 }
fn right(parent: usize) -> usize { parent * 2 + 2 }
fn parent(child: usize) -> usize { (child - 1) / 2 }

/// Keeps the `capacity` lowest-scoring graphs seen so far.
///
/// Entries are stored as a max-heap on score, so the root is always the worst admitted
/// graph. Once the table is full, a candidate is admitted only if it is strictly better
/// than the root, so on a tie the graph that arrived first keeps its place.
pub struct TopK {
    capacity: usize,
    heap: Vec<RankEntry>,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "ranking capacity must be at least 1");
        Self {
            capacity,
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() == self.capacity
    }

    /// The score a candidate must beat to be admitted, or `None` while the table is not
    /// yet full (any candidate is admitted).
    pub fn current_worst_score(&self) -> Option<Score> {
        if self.is_full() {
            self.heap.first().map(|e| e.score)
        } else {
            None
        }
    }

    /// Offers a candidate. Returns true if it was admitted.
    pub fn admit(&mut self, candidate: RankEntry) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push(candidate);
            let index = self.heap.len() - 1;
            self.sift_up(index);
            debug!(
                "g{} admitted with score {} ({} of {})",
                candidate.graph_id,
                candidate.score,
                self.heap.len(),
                self.capacity
            );
            self.check();
            return true;
        }

        let worst = self.heap[0];
        if candidate.score >= worst.score {
            return false;
        }
        debug!(
            "g{} (score {}) replaces g{} (score {})",
            candidate.graph_id, candidate.score, worst.graph_id, worst.score
        );
        self.heap[0] = candidate;
        self.sift_down(0);
        self.check();
        true
    }

    /// Entries in heap array order.
    pub fn entries(&self) -> &[RankEntry] {
        &self.heap
    }

    /// Ids of all held graphs. The ranking is not modified.
    pub fn snapshot(&self, order: SnapshotOrder) -> Vec<GraphId> {
        match order {
            SnapshotOrder::Heap => self.heap.iter().map(|e| e.graph_id).collect(),
            SnapshotOrder::Score => {
                let mut sorted = self.heap.clone();
                sorted.sort_by_key(|e| (e.score, e.graph_id));
                sorted.iter().map(|e| e.graph_id).collect()
            }
        }
    }

    // Equal scores move up during the initial fill.
    fn sift_up(&mut self, index: usize) {
        let mut i = index;
        while i > 0 {
            let parent = parent(i);
            if self.heap[parent].score > self.heap[i].score {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, index: usize) {
        let len = self.heap.len();
        let mut i = index;
        loop {
            let mut largest = i;
            let left = left(i);
            if left < len && self.heap[left].score > self.heap[largest].score {
                largest = left;
            }
            let right = right(i);
            if right < len && self.heap[right].score > self.heap[largest].score {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.heap.swap(i, largest);
            i = largest;
        }
    }

    fn check(&self) {
        assert!(
            self.heap.len() <= self.capacity,
            "ranking holds {} entries but capacity is {}",
            self.heap.len(),
            self.capacity
        );
        if cfg!(debug_assertions) {
            for i in 1..self.heap.len() {
                debug_assert!(self.heap[parent(i)].score >= self.heap[i].score);
            }
        }
    }
}

use core::fmt::{Debug, Formatter};

impl Debug for TopK {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> core::fmt::Result {
        write!(fmt, "TopK({}/{}): ", self.heap.len(), self.capacity)?;
        for e in self.heap.iter() {
            write!(fmt, "g{}={} ", e.graph_id, e.score)?;
        }
        Ok(())
    }
}
