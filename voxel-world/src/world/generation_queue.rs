use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::world::location::ChunkLocation;

#[derive(Copy, Clone, Debug)]
struct QueuedChunk {
    location: ChunkLocation,
    distance: f32,
    seq: u64,
}

impl PartialEq for QueuedChunk {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedChunk {}

impl PartialOrd for QueuedChunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedChunk {
    // Reversed, so the max-heap pops the nearest chunk first. Equal distances pop in insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Chunks waiting for generation, nearest first.
///
/// The same location may be queued multiple times. Nothing is removed ahead of time,
/// so entries for chunks that got loaded in the meantime have to be skipped when popped.
#[derive(Debug, Default)]
pub struct GenerationQueue {
    heap: BinaryHeap<QueuedChunk>,
    next_seq: u64,
}

impl GenerationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: ChunkLocation, distance: f32) {
        self.heap.push(QueuedChunk {
            location,
            distance,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Pops the nearest location together with its distance
    pub fn pop(&mut self) -> Option<(ChunkLocation, f32)> {
        self.heap
            .pop()
            .map(|queued| (queued.location, queued.distance))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::world::generation_queue::GenerationQueue;
    use crate::world::location::ChunkLocation;

    #[test]
    fn test_nearest_first() {
        let mut queue = GenerationQueue::new();
        queue.insert(ChunkLocation::new(3, 0), 3.0);
        queue.insert(ChunkLocation::new(0, 0), 0.0);
        queue.insert(ChunkLocation::new(1, 1), std::f32::consts::SQRT_2);
        queue.insert(ChunkLocation::new(1, 0), 1.0);

        let order: Vec<ChunkLocation> = std::iter::from_fn(|| queue.pop())
            .map(|(location, _)| location)
            .collect();

        assert_eq!(
            order,
            vec![
                ChunkLocation::new(0, 0),
                ChunkLocation::new(1, 0),
                ChunkLocation::new(1, 1),
                ChunkLocation::new(3, 0)
            ]
        );
    }

    #[test]
    fn test_equal_distances_keep_insertion_order() {
        let mut queue = GenerationQueue::new();
        queue.insert(ChunkLocation::new(0, 1), 1.0);
        queue.insert(ChunkLocation::new(-1, 0), 1.0);
        queue.insert(ChunkLocation::new(0, 1), 1.0);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some((ChunkLocation::new(0, 1), 1.0)));
        assert_eq!(queue.pop(), Some((ChunkLocation::new(-1, 0), 1.0)));
        assert_eq!(queue.pop(), Some((ChunkLocation::new(0, 1), 1.0)));
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
