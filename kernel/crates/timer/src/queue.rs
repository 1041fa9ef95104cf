use crate::Ticks;
use alloc::vec::Vec;

/// Something that expires at an absolute point in time, in ticks.
pub trait Deadline {
    /// The tick at which this item expires.
    fn expire_time(&self) -> Ticks;
}

/// The index of the sentinel slot. The sentinel never holds an item: its
/// `next` link points to the first item of the queue and its `prev` link to
/// the last one. When the queue is empty, both links point to the sentinel
/// itself.
const HEAD: usize = 0;

/// A slot of the queue slab, linked to its neighbours by their index.
#[derive(Debug)]
struct Slot<T> {
    prev: usize,
    next: usize,
    item: Option<T>,
}

/// A queue of items sorted by ascending expiry time.
///
/// The queue is a doubly-linked list threaded through a slab of slots: each
/// slot stores the index of its predecessor and successor instead of a
/// pointer. Slots of popped items are recycled by the next insertions, so the
/// slab only grows when the number of pending items reaches a new maximum.
///
/// Inserting is linear in the number of pending items, while peeking and
/// popping the earliest item are constant time. Since the timer interrupt
/// handler only ever peeks and pops, the work done with interrupts masked in
/// the handler does not depend on the number of pending timers.
///
/// # Ordering
/// Items are sorted by ascending expiry time. Items expiring at the same tick
/// are kept in insertion order: a new item is inserted after all existing
/// items with the same expiry.
#[derive(Debug)]
pub struct TimerQueue<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T: Deadline> TimerQueue<T> {
    /// Create a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        let mut slots = Vec::new();
        slots.push(Slot {
            prev: HEAD,
            next: HEAD,
            item: None,
        });

        Self {
            slots,
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert an item in the queue, keeping the queue sorted. The item is
    /// placed right before the first item expiring strictly later, or at the
    /// end of the queue if there is no such item.
    pub fn insert(&mut self, item: T) {
        let expire_time = item.expire_time();

        let mut cursor = self.slots[HEAD].next;
        while cursor != HEAD {
            if self.expire_time_at(cursor) > expire_time {
                break;
            }
            cursor = self.slots[cursor].next;
        }

        let slot = self.allocate(item);
        self.link_before(slot, cursor);
        self.len += 1;
    }

    /// Remove the earliest item from the queue and return it, or `None` if
    /// the queue is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let first = self.slots[HEAD].next;
        self.unlink(first);
        self.free.push(first);
        self.len -= 1;
        self.slots[first].item.take()
    }

    /// Return the expiry time of the earliest item, or `None` if the queue is
    /// empty.
    #[must_use]
    pub fn peek_front_expiry(&self) -> Option<Ticks> {
        self.iter().next().map(Deadline::expire_time)
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots[HEAD].next == HEAD
    }

    /// Return the number of items in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Iterate over the items of the queue, from the earliest to the latest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            cursor: self.slots[HEAD].next,
        }
    }

    /// Store the item in a free slot, reusing a recycled one if possible, and
    /// return its index. The slot is not linked into the list yet.
    fn allocate(&mut self, item: T) -> usize {
        if let Some(index) = self.free.pop() {
            self.slots[index].item = Some(item);
            index
        } else {
            self.slots.push(Slot {
                prev: HEAD,
                next: HEAD,
                item: Some(item),
            });
            self.slots.len() - 1
        }
    }

    /// Link the slot `slot` right before the slot `next`. If `next` is the
    /// sentinel, the slot is appended at the end of the queue.
    fn link_before(&mut self, slot: usize, next: usize) {
        let prev = self.slots[next].prev;
        self.slots[slot].prev = prev;
        self.slots[slot].next = next;
        self.slots[prev].next = slot;
        self.slots[next].prev = slot;
    }

    /// Unlink the slot from the list. Its own links are left dangling and
    /// will be overwritten when the slot is reused.
    fn unlink(&mut self, slot: usize) {
        let Slot { prev, next, .. } = self.slots[slot];
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    /// # Panics
    /// Panics if the slot is the sentinel or a free slot. This would mean
    /// that the links are corrupted.
    fn expire_time_at(&self, slot: usize) -> Ticks {
        self.slots[slot]
            .item
            .as_ref()
            .expect("Linked timer queue slot without an item")
            .expire_time()
    }
}

impl<T: Deadline> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An iterator over the items of a [`TimerQueue`], from the earliest to the
/// latest.
pub struct Iter<'a, T> {
    queue: &'a TimerQueue<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == HEAD {
            return None;
        }

        let slot = &self.queue.slots[self.cursor];
        self.cursor = slot.next;
        slot.item.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Entry {
        expire_time: Ticks,
        id: usize,
    }

    impl Deadline for Entry {
        fn expire_time(&self) -> Ticks {
            self.expire_time
        }
    }

    fn queue_of(expiries: &[Ticks]) -> TimerQueue<Entry> {
        let mut queue = TimerQueue::new();
        for (id, &expire_time) in expiries.iter().enumerate() {
            queue.insert(Entry { expire_time, id });
        }
        queue
    }

    fn drain(queue: &mut TimerQueue<Entry>) -> Vec<Entry> {
        core::iter::from_fn(|| queue.pop_front()).collect()
    }

    #[test]
    fn empty_queue() {
        let mut queue = TimerQueue::<Entry>::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.peek_front_expiry(), None);
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn sorted_insertion() {
        let mut queue = queue_of(&[50, 10, 30]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek_front_expiry(), Some(10));

        let expiries: Vec<Ticks> = drain(&mut queue).iter().map(|e| e.expire_time).collect();
        assert_eq!(expiries, [10, 30, 50]);
        assert!(queue.is_empty());
    }

    #[test]
    fn ties_are_first_in_first_out() {
        let mut queue = queue_of(&[20, 10, 20, 5, 20]);
        let order: Vec<usize> = drain(&mut queue).iter().map(|e| e.id).collect();
        assert_eq!(order, [3, 1, 0, 2, 4]);
    }

    #[test]
    fn insertion_before_head_updates_minimum() {
        let mut queue = queue_of(&[100]);
        assert_eq!(queue.peek_front_expiry(), Some(100));
        queue.insert(Entry {
            expire_time: 1,
            id: 1,
        });
        assert_eq!(queue.peek_front_expiry(), Some(1));
    }

    #[test]
    fn slots_are_recycled() {
        let mut queue = queue_of(&[1, 2, 3]);
        let capacity = queue.slots.len();

        queue.pop_front();
        queue.pop_front();
        queue.insert(Entry {
            expire_time: 4,
            id: 3,
        });
        queue.insert(Entry {
            expire_time: 0,
            id: 4,
        });

        assert_eq!(queue.slots.len(), capacity);
        let order: Vec<usize> = drain(&mut queue).iter().map(|e| e.id).collect();
        assert_eq!(order, [4, 2, 3]);
    }

    #[test]
    fn iterates_front_to_back() {
        let queue = queue_of(&[7, 3, 9, 3]);
        let ids: Vec<usize> = queue.iter().map(|e| e.id).collect();
        assert_eq!(ids, [1, 3, 0, 2]);
    }

    proptest! {
        #[test]
        fn always_sorted(expiries in prop::collection::vec(0u64..64, 0..128)) {
            let queue = queue_of(&expiries);
            prop_assert_eq!(queue.len(), expiries.len());

            let items: Vec<Entry> = queue.iter().copied().collect();
            for pair in items.windows(2) {
                prop_assert!(pair[0].expire_time <= pair[1].expire_time);
                if pair[0].expire_time == pair[1].expire_time {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }

        #[test]
        fn never_loses_items(
            expiries in prop::collection::vec(0u64..1000, 1..64),
            pops in 0usize..64,
        ) {
            let mut queue = queue_of(&expiries);
            let popped = (0..pops).filter_map(|_| queue.pop_front()).count();
            for (id, &expire_time) in expiries.iter().enumerate() {
                queue.insert(Entry { expire_time, id: id + expiries.len() });
            }
            prop_assert_eq!(queue.len(), 2 * expiries.len() - popped);
            prop_assert_eq!(drain(&mut queue).len(), 2 * expiries.len() - popped);
        }
    }
}
