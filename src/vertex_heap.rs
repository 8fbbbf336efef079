use crate::{Distance, V};
use bit_vec::BitVec;

/// A vertex as seen by the frontier: its id and its tentative distance from the source.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Vertex {
    pub id: V,
    pub distance: Distance,
}

fn left(parent: usize) -> usize { parent * 2 + 1 }
fn right(parent: usize) -> usize { parent * 2 + 2 }
fn parent(child: usize) -> usize { (child - 1) / 2 }

/// Binary min-heap of vertices, keyed by tentative distance.
///
/// The heap tracks where each vertex currently sits (`pos`), so `decrease_key`
/// does not need to search for it. `in_heap` records which vertices have not been
/// extracted yet; `pos[v]` is only meaningful while `in_heap[v]` is set.
///
/// All buffers keep their allocation across `build` calls.
pub struct VertexHeap {
    heap: Vec<Vertex>,
    pos: Vec<u32>,
    in_heap: BitVec,
}

impl VertexHeap {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(num_verts: usize) -> Self {
        Self {
            heap: Vec::with_capacity(num_verts),
            pos: Vec::with_capacity(num_verts),
            in_heap: BitVec::from_elem(num_verts, false),
        }
    }

    /// Replaces the contents of the heap with one vertex per entry of `distances`,
    /// vertex `i` starting at `distances[i]`, and heapifies them in O(n).
    pub fn build(&mut self, distances: &[Distance]) {
        let n = distances.len();
        self.heap.clear();
        self.heap.extend(
            distances
                .iter()
                .enumerate()
                .map(|(i, &distance)| Vertex { id: i as V, distance }),
        );
        self.pos.clear();
        self.pos.extend(0..n as u32);
        self.in_heap.truncate(0);
        self.in_heap.grow(n, true);

        if n > 1 {
            let mut i = parent(n - 1) + 1;
            while i > 0 {
                i -= 1;
                self.sift_down(i);
            }
        }
        self.check();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns true if `v` has not been extracted since the last `build`.
    pub fn contains(&self, v: V) -> bool {
        self.in_heap.get(v as usize).unwrap_or(false)
    }

    /// Returns the heap position of `v`, if it is still in the heap.
    pub fn position(&self, v: V) -> Option<usize> {
        if self.contains(v) {
            Some(self.pos[v as usize] as usize)
        } else {
            None
        }
    }

    /// Returns the tentative distance of `v`, if it is still in the heap.
    pub fn distance(&self, v: V) -> Option<Distance> {
        self.position(v).map(|p| self.heap[p].distance)
    }

    /// Returns the key stored at heap position `position`.
    pub fn key_at(&self, position: usize) -> Distance {
        self.heap[position].distance
    }

    pub fn peek(&self) -> Option<&Vertex> {
        self.heap.first()
    }

    /// Removes the vertex with the smallest tentative distance.
    pub fn extract_min(&mut self) -> Option<Vertex> {
        if self.heap.is_empty() {
            return None;
        }
        let last_index = self.heap.len() - 1;
        self.swap(0, last_index);
        let result = self.heap.pop()?;
        self.in_heap.set(result.id as usize, false);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        self.check();
        Some(result)
    }

    /// Lowers the key of the entry at heap position `position` and moves it toward the root.
    /// Returns the entry's new position.
    pub fn decrease_key_at(&mut self, position: usize, distance: Distance) -> usize {
        assert!(position < self.heap.len());
        assert!(
            distance < self.heap[position].distance,
            "decrease_key must lower the key ({} -> {})",
            self.heap[position].distance,
            distance
        );
        self.heap[position].distance = distance;
        let new_position = self.sift_up(position);
        self.check();
        new_position
    }

    /// Lowers the key of vertex `v`, which must still be in the heap.
    pub fn decrease_key(&mut self, v: V, distance: Distance) {
        let position = self
            .position(v)
            .unwrap_or_else(|| panic!("vertex {} is not in the heap", v));
        self.decrease_key_at(position, distance);
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos[self.heap[a].id as usize] = a as u32;
        self.pos[self.heap[b].id as usize] = b as u32;
    }

    fn sift_up(&mut self, index: usize) -> usize {
        let mut i = index;
        while i > 0 {
            let parent = parent(i);
            if self.heap[parent].distance <= self.heap[i].distance {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, index: usize) {
        let len = self.heap.len();
        let mut i = index;
        loop {
            let mut smallest = i;
            let left = left(i);
            if left < len && self.heap[left].distance < self.heap[smallest].distance {
                smallest = left;
            }
            let right = right(i);
            if right < len && self.heap[right].distance < self.heap[smallest].distance {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn check(&self) {
        if cfg!(debug_assertions) {
            for i in 1..self.heap.len() {
                debug_assert!(self.heap[parent(i)].distance <= self.heap[i].distance);
            }
            for (i, vertex) in self.heap.iter().enumerate() {
                debug_assert!(self.in_heap[vertex.id as usize]);
                debug_assert_eq!(self.pos[vertex.id as usize] as usize, i);
            }
        }
    }
}

use core::fmt::{Debug, Formatter};

impl Debug for VertexHeap {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> core::fmt::Result {
        write!(fmt, "Q: ")?;
        for item in self.heap.iter() {
            write!(fmt, "v{}={} ", item.id, item.distance)?;
        }
        Ok(())
    }
}
