use std::slice;

use super::idx_vec::IdxVec;
use super::Idx;

/// Binary heap over typed keys, ordered by an external comparator.
///
/// The keys themselves carry no priority: every operation takes the comparator
/// (`cmp(a, b) == true` means `a` must be closer to the top than `b`), so the
/// priorities may live elsewhere and change between operations. When they do
/// change, the heap shape becomes stale until [`IdxHeap::rebuild_by`] is called.
#[derive(Debug)]
pub struct IdxHeap<K: Idx> {
    heap: Vec<K>,
    // Position of each key in `heap`, `usize::MAX` when absent.
    index: IdxVec<K, usize>,
}

impl<K: Idx> IdxHeap<K> {
    /// Heap able to hold keys with `idx() < capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            index: IdxVec::with_len(capacity, usize::MAX),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key) && self.index[key] != usize::MAX
    }

    pub fn clear(&mut self) {
        for key in self.heap.drain(..) {
            self.index[&key] = usize::MAX;
        }
    }

    /// Peek the top item in the heap.
    pub fn peek(&self) -> Option<&K> {
        self.heap.first()
    }

    /// Keys in heap (array) order.
    pub fn iter(&self) -> slice::Iter<K> {
        self.heap.iter()
    }

    fn parent(i: usize) -> usize {
        (i - 1) >> 1
    }
    fn left(i: usize) -> usize {
        2 * i + 1
    }
    fn right(i: usize) -> usize {
        2 * i + 2
    }

    /// Insert the key into the heap.
    ///
    /// Returns `false` if `key` is already in the heap.
    pub fn insert_by<F>(&mut self, key: K, cmp: F) -> bool
    where
        F: Fn(&K, &K) -> bool,
    {
        if self.contains(&key) {
            return false;
        }
        let i = self.heap.len();
        self.heap.push(key);
        self.sift_up_by(i, cmp);
        true
    }

    /// Append the key at the bottom of the heap without restoring the heap order.
    ///
    /// Used to refill the heap before a [`rebuild_by`][IdxHeap::rebuild_by].
    pub fn push_unordered(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.index[&key] = self.heap.len();
        self.heap.push(key);
        true
    }

    /// Remove the top item from the heap.
    ///
    /// Returns [`None`] if the heap is empty.
    pub fn pop_by<F>(&mut self, cmp: F) -> Option<K>
    where
        F: Fn(&K, &K) -> bool,
    {
        if self.heap.is_empty() {
            return None;
        }
        let res = self.heap.swap_remove(0);
        self.index[&res] = usize::MAX;
        if !self.heap.is_empty() {
            self.index[&self.heap[0]] = 0;
            self.sift_down_by(0, cmp);
        }
        Some(res)
    }

    /// Restore the heap order of all keys (Floyd's bottom-up heapify).
    pub fn rebuild_by<F>(&mut self, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down_by(i, &cmp);
        }
    }

    fn sift_up_by<F>(&mut self, mut i: usize, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        while i > 0 {
            let p = Self::parent(i);
            if cmp(&self.heap[i], &self.heap[p]) {
                self.index[&self.heap[p]] = i;
                self.heap.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
        self.index[&self.heap[i]] = i;
    }

    fn sift_down_by<F>(&mut self, mut i: usize, cmp: F)
    where
        F: Fn(&K, &K) -> bool,
    {
        loop {
            let l = Self::left(i);
            if l >= self.heap.len() {
                break;
            }
            let r = Self::right(i);
            let c = if r < self.heap.len() && cmp(&self.heap[r], &self.heap[l]) {
                r
            } else {
                l
            };

            if cmp(&self.heap[c], &self.heap[i]) {
                self.index[&self.heap[c]] = i;
                self.heap.swap(c, i);
                i = c;
            } else {
                break;
            }
        }
        self.index[&self.heap[i]] = i;
    }
}
