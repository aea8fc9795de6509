//! Lock-free single-producer single-consumer ring of `Copy` events.
//!
//! The producer is an interrupt handler, the consumer the control path.
//! Indices are free-running counters; the slot is `counter % N`, so `N` must
//! be a power of two and every slot is usable.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`push()`](EventRing::push) (the producer).
//! - Only ONE context may call [`pop()`](EventRing::pop) (the consumer).

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

pub struct EventRing<T: Copy, const N: usize> {
    slots: [UnsafeCell<MaybeUninit<T>>; N],
    /// Events ever pushed (producer-owned).
    head: AtomicUsize,
    /// Events ever popped (consumer-owned).
    tail: AtomicUsize,
}

// SAFETY: a slot is written only by the producer while it is outside
// `tail..head`, and read only by the consumer while inside it. Acquire/release
// on the counters orders the slot accesses.
unsafe impl<T: Copy + Send, const N: usize> Sync for EventRing<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Send for EventRing<T, N> {}

impl<T: Copy, const N: usize> EventRing<T, N> {
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "ring size must be a power of two");

        EventRing {
            // SAFETY: an array of `MaybeUninit` needs no initialization, and
            // `UnsafeCell` does not change validity.
            slots: unsafe { MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init() },
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Producer side. Hands `event` back when the ring is full.
    pub fn push(&self, event: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head.wrapping_sub(tail) == N {
            return Err(event);
        }

        // SAFETY: sole producer, and the slot is free because fewer than N
        // events are outstanding.
        unsafe { (*self.slots[head % N].get()).write(event) };
        self.head.store(head.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Consumer side.
    pub fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: sole consumer, and `tail != head` means the producer has
        // published this slot.
        let event = unsafe { (*self.slots[tail % N].get()).assume_init_read() };
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(event)
    }

    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        self.head.load(Ordering::Acquire).wrapping_sub(tail)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_is_usable() {
        let ring: EventRing<u32, 4> = EventRing::new();
        for i in 0..4 {
            assert_eq!(ring.push(i), Ok(()));
        }
        assert!(ring.is_full());
        assert_eq!(ring.push(99), Err(99));
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn fifo_order() {
        let ring: EventRing<u32, 8> = EventRing::new();
        ring.push(1).unwrap();
        ring.push(2).unwrap();
        assert_eq!(ring.pop(), Some(1));
        ring.push(3).unwrap();
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn wraps_across_slots() {
        let ring: EventRing<u16, 2> = EventRing::new();
        for round in 0..20u16 {
            ring.push(round).unwrap();
            ring.push(round + 100).unwrap();
            assert!(ring.is_full());
            assert_eq!(ring.pop(), Some(round));
            assert_eq!(ring.pop(), Some(round + 100));
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn capacity_matches_size() {
        let ring: EventRing<u8, 64> = EventRing::new();
        assert_eq!(ring.capacity(), 64);
    }
}
