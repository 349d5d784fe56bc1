//! Indexed binary min-heap over arena handles.
//!
//! The heap stores [`SlotId`] handles, never the values themselves. Priorities
//! and heap positions are read from and written back to the owner of the
//! values through the [`HeapSlots`] trait. Because every swap writes the new
//! position back into both affected values, a caller holding a handle can
//! always find that handle's heap slot in O(1) and repair or remove it in
//! O(log n) without scanning.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            IndexedMinHeap                               │
//! │                                                                         │
//! │   nodes: Vec<SlotId>                      owner (impl HeapSlots)        │
//! │                                                                         │
//! │   pos:   0      1      2      3           SlotId │ priority │ heap_pos  │
//! │        ┌──────┬──────┬──────┬──────┐      ───────┼──────────┼────────── │
//! │        │ s#2  │ s#0  │ s#3  │ s#1  │       s#0   │  (2, 4)  │    1      │
//! │        └──────┴──────┴──────┴──────┘       s#1   │  (5, 7)  │    3      │
//! │           ▲                                s#2   │  (1, 9)  │    0      │
//! │           └── root: smallest priority      s#3   │  (3, 2)  │    2      │
//! │                                                                         │
//! │   Invariant: owner.heap_pos(nodes[i]) == i for every i                  │
//! │   Invariant: priority(nodes[parent(i)]) <= priority(nodes[i])           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation     | Description                                   | Complexity |
//! |---------------|-----------------------------------------------|------------|
//! | `push`        | Append handle, sift up                        | O(log n)   |
//! | `pop_min`     | Remove root, move last to root, sift down     | O(log n)   |
//! | `fix_at`      | Restore order after a priority change         | O(log n)   |
//! | `remove_at`   | Swap with last, shrink, fix swapped-in slot   | O(log n)   |
//! | `peek_min`    | Handle at the root                            | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::ds::{HeapSlots, IndexedMinHeap, SlotArena, SlotId};
//!
//! // (score, heap position)
//! struct Scores(SlotArena<(u32, usize)>);
//!
//! impl HeapSlots for Scores {
//!     type Priority = u32;
//!
//!     fn priority(&self, id: SlotId) -> u32 {
//!         self.0.get(id).map(|s| s.0).unwrap_or(u32::MAX)
//!     }
//!
//!     fn heap_pos(&self, id: SlotId) -> usize {
//!         self.0.get(id).map(|s| s.1).unwrap_or(usize::MAX)
//!     }
//!
//!     fn set_heap_pos(&mut self, id: SlotId, pos: usize) {
//!         if let Some(s) = self.0.get_mut(id) {
//!             s.1 = pos;
//!         }
//!     }
//! }
//!
//! let mut scores = Scores(SlotArena::new());
//! let mut heap = IndexedMinHeap::new();
//!
//! let a = scores.0.insert((5, 0));
//! let b = scores.0.insert((2, 0));
//! heap.push(a, &mut scores);
//! heap.push(b, &mut scores);
//! assert_eq!(heap.peek_min(), Some(b));
//!
//! // Lower a's score in place and repair its slot.
//! scores.0.get_mut(a).unwrap().0 = 1;
//! let pos = scores.heap_pos(a);
//! heap.fix_at(pos, &mut scores);
//!
//! assert_eq!(heap.pop_min(&mut scores), Some(a));
//! assert_eq!(heap.pop_min(&mut scores), Some(b));
//! assert_eq!(heap.pop_min(&mut scores), None);
//! ```
//!
//! ## Thread Safety
//!
//! `IndexedMinHeap` is not thread-safe. It is always mutated together with
//! its owner, so guard both with the same lock.

use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;

/// Owner-side view of the values a heap orders.
///
/// Implementors hand out each handle's priority and store the heap position
/// the heap assigns to it.
pub trait HeapSlots {
    type Priority: Ord;

    /// Current priority of `id`. Smaller values sit closer to the root.
    fn priority(&self, id: SlotId) -> Self::Priority;

    /// Heap position last recorded for `id` via [`set_heap_pos`](Self::set_heap_pos).
    fn heap_pos(&self, id: SlotId) -> usize;

    fn set_heap_pos(&mut self, id: SlotId, pos: usize);
}

/// Binary min-heap of [`SlotId`] handles with position back-references.
#[derive(Debug, Clone, Default)]
pub struct IndexedMinHeap {
    nodes: Vec<SlotId>,
}

impl IndexedMinHeap {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Handle at the root, i.e. the smallest priority.
    pub fn peek_min(&self) -> Option<SlotId> {
        self.nodes.first().copied()
    }

    /// Handle stored at heap position `pos`.
    pub fn get(&self, pos: usize) -> Option<SlotId> {
        self.nodes.get(pos).copied()
    }

    /// Handles in heap (level) order.
    pub fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.nodes.iter().copied()
    }

    /// Appends `id` and sifts it up to its ordered position.
    pub fn push<S: HeapSlots>(&mut self, id: SlotId, slots: &mut S) {
        let pos = self.nodes.len();
        self.nodes.push(id);
        slots.set_heap_pos(id, pos);
        self.sift_up(pos, slots);
    }

    /// Removes and returns the handle with the smallest priority.
    ///
    /// Returns `None` when the heap is empty.
    pub fn pop_min<S: HeapSlots>(&mut self, slots: &mut S) -> Option<SlotId> {
        let last = self.nodes.len().checked_sub(1)?;
        self.swap(0, last, slots);
        let min = self.nodes.pop()?;
        if !self.nodes.is_empty() {
            self.sift_down(0, slots);
        }
        Some(min)
    }

    /// Restores heap order after the priority of the handle at `pos` changed.
    ///
    /// Only one priority changed, so at most one of the two sifts moves
    /// anything. Out-of-range positions are ignored.
    pub fn fix_at<S: HeapSlots>(&mut self, pos: usize, slots: &mut S) {
        if pos >= self.nodes.len() {
            return;
        }
        if !self.sift_up(pos, slots) {
            self.sift_down(pos, slots);
        }
    }

    /// Removes and returns the handle at `pos`.
    ///
    /// The last handle takes its place and is repaired with
    /// [`fix_at`](Self::fix_at). Returns `None` if `pos` is out of range.
    pub fn remove_at<S: HeapSlots>(&mut self, pos: usize, slots: &mut S) -> Option<SlotId> {
        let last = self.nodes.len().checked_sub(1)?;
        if pos > last {
            return None;
        }
        if pos != last {
            self.swap(pos, last, slots);
        }
        let removed = self.nodes.pop()?;
        if pos < self.nodes.len() {
            self.fix_at(pos, slots);
        }
        Some(removed)
    }

    /// Checks ordering and position back-references over the whole heap.
    pub fn check_invariants<S: HeapSlots>(&self, slots: &S) -> Result<(), InvariantError> {
        for (pos, &id) in self.nodes.iter().enumerate() {
            let recorded = slots.heap_pos(id);
            if recorded != pos {
                return Err(InvariantError::new(format!(
                    "slot {} sits at heap position {} but records {}",
                    id.index(),
                    pos,
                    recorded
                )));
            }
            if pos > 0 {
                let parent = (pos - 1) / 2;
                if slots.priority(self.nodes[parent]) > slots.priority(id) {
                    return Err(InvariantError::new(format!(
                        "heap order violated between positions {} and {}",
                        parent, pos
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn less<S: HeapSlots>(&self, a: usize, b: usize, slots: &S) -> bool {
        slots.priority(self.nodes[a]) < slots.priority(self.nodes[b])
    }

    fn swap<S: HeapSlots>(&mut self, a: usize, b: usize, slots: &mut S) {
        self.nodes.swap(a, b);
        slots.set_heap_pos(self.nodes[a], a);
        slots.set_heap_pos(self.nodes[b], b);
    }

    /// Returns `true` if the handle moved.
    fn sift_up<S: HeapSlots>(&mut self, mut pos: usize, slots: &mut S) -> bool {
        let start = pos;
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent, slots) {
                break;
            }
            self.swap(pos, parent, slots);
            pos = parent;
        }
        pos != start
    }

    fn sift_down<S: HeapSlots>(&mut self, mut pos: usize, slots: &mut S) {
        let len = self.nodes.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left, slots) {
                right
            } else {
                left
            };
            if !self.less(child, pos, slots) {
                break;
            }
            self.swap(pos, child, slots);
            pos = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds::slot_arena::SlotArena;

    #[derive(Debug)]
    struct Item {
        score: u32,
        pos: usize,
    }

    impl HeapSlots for SlotArena<Item> {
        type Priority = u32;

        fn priority(&self, id: SlotId) -> u32 {
            self.get(id).expect("test item missing").score
        }

        fn heap_pos(&self, id: SlotId) -> usize {
            self.get(id).expect("test item missing").pos
        }

        fn set_heap_pos(&mut self, id: SlotId, pos: usize) {
            self.get_mut(id).expect("test item missing").pos = pos;
        }
    }

    fn build(scores: &[u32]) -> (SlotArena<Item>, IndexedMinHeap, Vec<SlotId>) {
        let mut items = SlotArena::new();
        let mut heap = IndexedMinHeap::new();
        let mut ids = Vec::new();
        for &score in scores {
            let id = items.insert(Item { score, pos: 0 });
            heap.push(id, &mut items);
            heap.check_invariants(&items).unwrap();
            ids.push(id);
        }
        (items, heap, ids)
    }

    fn drain_scores(items: &mut SlotArena<Item>, heap: &mut IndexedMinHeap) -> Vec<u32> {
        let mut out = Vec::new();
        while let Some(id) = heap.pop_min(items) {
            heap.check_invariants(items).unwrap();
            out.push(items.remove(id).unwrap().score);
        }
        out
    }

    #[test]
    fn pop_min_returns_ascending_order() {
        let (mut items, mut heap, _) = build(&[9, 4, 7, 1, 8, 2, 6, 3, 5]);
        assert_eq!(heap.len(), 9);
        assert_eq!(
            drain_scores(&mut items, &mut heap),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert!(heap.is_empty());
    }

    #[test]
    fn pop_min_on_empty_is_none() {
        let mut items: SlotArena<Item> = SlotArena::new();
        let mut heap = IndexedMinHeap::new();
        assert_eq!(heap.pop_min(&mut items), None);
        assert_eq!(heap.peek_min(), None);
    }

    #[test]
    fn push_records_positions() {
        let (items, heap, ids) = build(&[3, 1, 2]);
        for id in ids {
            let pos = items.heap_pos(id);
            assert_eq!(heap.get(pos), Some(id));
        }
    }

    #[test]
    fn fix_at_after_increase_sifts_down() {
        let (mut items, mut heap, ids) = build(&[1, 5, 6, 7]);
        assert_eq!(heap.peek_min(), Some(ids[0]));

        items.get_mut(ids[0]).unwrap().score = 10;
        let pos = items.heap_pos(ids[0]);
        heap.fix_at(pos, &mut items);
        heap.check_invariants(&items).unwrap();

        assert_eq!(heap.peek_min(), Some(ids[1]));
        assert_eq!(drain_scores(&mut items, &mut heap), vec![5, 6, 7, 10]);
    }

    #[test]
    fn fix_at_after_decrease_sifts_up() {
        let (mut items, mut heap, ids) = build(&[4, 5, 6, 7, 8]);

        items.get_mut(ids[4]).unwrap().score = 0;
        let pos = items.heap_pos(ids[4]);
        heap.fix_at(pos, &mut items);
        heap.check_invariants(&items).unwrap();

        assert_eq!(heap.peek_min(), Some(ids[4]));
    }

    #[test]
    fn fix_at_out_of_range_is_noop() {
        let (mut items, mut heap, _) = build(&[1, 2]);
        heap.fix_at(17, &mut items);
        heap.check_invariants(&items).unwrap();
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn remove_at_middle_keeps_order() {
        let (mut items, mut heap, ids) = build(&[1, 3, 2, 8, 9, 4, 5]);

        let target = ids[1];
        let pos = items.heap_pos(target);
        assert_eq!(heap.remove_at(pos, &mut items), Some(target));
        heap.check_invariants(&items).unwrap();
        items.remove(target);

        assert_eq!(drain_scores(&mut items, &mut heap), vec![1, 2, 4, 5, 8, 9]);
    }

    #[test]
    fn remove_at_last_and_root() {
        let (mut items, mut heap, ids) = build(&[2, 4, 6]);

        let last = heap.get(heap.len() - 1).unwrap();
        assert_eq!(heap.remove_at(heap.len() - 1, &mut items), Some(last));
        items.remove(last);
        heap.check_invariants(&items).unwrap();

        assert_eq!(heap.remove_at(0, &mut items), Some(ids[0]));
        items.remove(ids[0]);
        heap.check_invariants(&items).unwrap();
        assert_eq!(heap.len(), 1);

        assert_eq!(heap.remove_at(5, &mut items), None);
    }

    #[test]
    fn remove_at_pulls_smaller_last_upward() {
        // Removing a deep node from the right subtree moves a small last
        // element from the left subtree into it; it must sift up.
        let (mut items, mut heap, _) = build(&[1, 2, 10, 3, 4, 11, 12, 5]);
        let last_score = items.get(heap.get(heap.len() - 1).unwrap()).unwrap().score;
        assert_eq!(last_score, 5);

        let pos = heap
            .iter()
            .position(|id| items.get(id).unwrap().score == 11)
            .unwrap();
        let removed = heap.remove_at(pos, &mut items).unwrap();
        items.remove(removed);
        heap.check_invariants(&items).unwrap();

        let moved = heap
            .iter()
            .position(|id| items.get(id).unwrap().score == 5)
            .unwrap();
        assert_eq!(moved, 2);
        assert_eq!(
            drain_scores(&mut items, &mut heap),
            vec![1, 2, 3, 4, 5, 10, 12]
        );
    }

    #[test]
    fn check_invariants_detects_bad_position() {
        let (mut items, heap, ids) = build(&[1, 2]);
        items.get_mut(ids[1]).unwrap().pos = 0;
        assert!(heap.check_invariants(&items).is_err());
    }

    #[test]
    fn equal_priorities_do_not_break_heap() {
        let (mut items, mut heap, _) = build(&[3, 3, 3, 3, 1, 1]);
        assert_eq!(drain_scores(&mut items, &mut heap), vec![1, 1, 3, 3, 3, 3]);
    }
}
