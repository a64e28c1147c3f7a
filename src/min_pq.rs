//! Array-backed binary min-heap used to pick the two lightest nodes while
//! building a code tree.
//!
//! The queue keeps its own notion of capacity: it doubles when an insert
//! finds it full and halves once occupancy drops to a quarter, so the
//! backing allocation never exceeds four times the live element count.

const INITIAL_CAPACITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    #[error("cannot remove from an empty priority queue")]
    Underflow,
}

#[derive(Debug, Clone)]
pub struct MinPq<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> MinPq<T> {
    pub fn new() -> Self {
        MinPq {
            items: Vec::with_capacity(INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Logical capacity under the grow/shrink policy.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The heap array in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn peek_min(&self) -> Option<&T> {
        self.items.first()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn grow(&mut self) {
        self.capacity *= 2;
        self.items.reserve_exact(self.capacity - self.items.len());
    }

    fn shrink(&mut self) {
        self.capacity = (self.capacity / 2).max(1);
        self.items.shrink_to(self.capacity);
    }
}

impl<T: Ord> MinPq<T> {
    /// Builds a heap from an unordered collection in one pass, sifting down
    /// every internal node from the last one up to the root.
    pub fn from_vec(items: Vec<T>) -> Self {
        let capacity = items.len().max(INITIAL_CAPACITY);
        let mut heap = MinPq { items, capacity };
        heap.items.reserve_exact(capacity - heap.items.len());

        let n = heap.len();
        if n > 1 {
            for i in (0..=Self::parent(n - 1)).rev() {
                heap.sift_down(i);
            }
        }
        heap
    }

    pub fn insert(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.grow();
        }
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Removes and returns the smallest element.
    pub fn delete_min(&mut self) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Underflow);
        }
        // swap_remove moves the last element into the root slot
        let min = self.items.swap_remove(0);
        self.sift_down(0);

        let n = self.items.len();
        if n > 0 && n * 4 <= self.capacity {
            self.shrink();
        }
        Ok(min)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.items[i] >= self.items[p] {
                break;
            }
            self.items.swap(i, p);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.items.len();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.items[l] < self.items[smallest] {
                smallest = l;
            }
            if r < n && self.items[r] < self.items[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T> Default for MinPq<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid<T: Ord>(heap: &MinPq<T>) -> bool {
        (1..heap.len()).all(|i| heap.items[MinPq::<T>::parent(i)] <= heap.items[i])
    }

    #[test]
    fn heapify_orders_seed_collection() {
        let mut heap = MinPq::from_vec(vec![9, 6, 5, 2, 3]);
        assert_eq!(heap.as_slice(), &[2, 3, 5, 6, 9]);

        let drained: Vec<i32> = std::iter::from_fn(|| heap.delete_min().ok()).collect();
        assert_eq!(drained, vec![2, 3, 5, 6, 9]);
        assert!(heap.is_empty());
    }

    #[test]
    fn delete_min_on_empty_underflows() {
        let mut heap: MinPq<u32> = MinPq::new();
        assert_eq!(heap.delete_min(), Err(HeapError::Underflow));
        assert!(heap.peek_min().is_none());
    }

    #[test]
    fn insert_keeps_heap_order() {
        let mut heap = MinPq::new();
        for v in [5, 1, 8, 3, 9, 2, 7, 4, 6, 0] {
            heap.insert(v);
            assert!(is_valid(&heap));
        }
        assert_eq!(heap.len(), 10);
        assert_eq!(heap.peek_min(), Some(&0));

        let mut out = Vec::new();
        while !heap.is_empty() {
            out.push(heap.delete_min().unwrap());
            assert!(is_valid(&heap));
        }
        assert_eq!(out, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn capacity_doubles_when_full() {
        let mut heap = MinPq::new();
        assert_eq!(heap.capacity(), 2);
        heap.insert(1);
        heap.insert(2);
        assert_eq!(heap.capacity(), 2);
        heap.insert(3);
        assert_eq!(heap.capacity(), 4);
        heap.insert(4);
        heap.insert(5);
        assert_eq!(heap.capacity(), 8);
    }

    #[test]
    fn capacity_halves_at_quarter_occupancy() {
        let mut heap = MinPq::from_vec((0..16).collect());
        assert_eq!(heap.capacity(), 16);
        while heap.len() > 4 {
            heap.delete_min().unwrap();
            assert!(heap.capacity() <= heap.len() * 4 || heap.len() == 0);
        }
        assert_eq!(heap.capacity(), 8);
        for _ in 0..3 {
            heap.delete_min().unwrap();
        }
        assert_eq!(heap.len(), 1);
        assert!(heap.capacity() <= 4);
    }

    #[test]
    fn empty_and_singleton_seeds() {
        let heap: MinPq<u8> = MinPq::from_vec(Vec::new());
        assert!(heap.is_empty());
        assert_eq!(heap.capacity(), 2);

        let mut heap = MinPq::from_vec(vec![42]);
        assert_eq!(heap.delete_min(), Ok(42));
        assert!(heap.delete_min().is_err());
    }
}
