//! Interrupt-driven period notification.
//!
//! The FIFO raises one interrupt per period. The handler acknowledges the
//! hardware status bit and pushes a [`PeriodEvent`] onto the stream's
//! [`PeriodChannel`]; nothing else happens in interrupt context. The control
//! path drains the channel with [`Stream::take_periods`](crate::stream::Stream::take_periods).
//!
//! ```text
//! FIFO irq → PeriodHandler::handle() → PeriodChannel (SPSC) → take_periods()
//! ```
//!
//! Events coalesce under load: when the channel is full the new event is
//! dropped and counted, the hardware pointer stays authoritative.

pub mod spsc;

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::constants::PERIOD_QUEUE_SLOTS;
use crate::regs::{RegField, RegisterAccess};

use self::spsc::EventRing;

/// "One period elapsed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodEvent {
    /// Running count of interrupts since the channel was last cleared.
    pub seq: u32,
}

/// Event channel shared between one stream and its interrupt handler.
///
/// Usually a `static`, so the handler can borrow it for `'static`. The ring
/// has a single producer, so a stream claims its channel on open and a second
/// stream cannot open on the same channel until the first one closes.
pub struct PeriodChannel {
    ring: EventRing<PeriodEvent, PERIOD_QUEUE_SLOTS>,
    claimed: AtomicBool,
    active: AtomicBool,
    seq: AtomicU32,
    dropped: AtomicU32,
}

impl PeriodChannel {
    pub const fn new() -> Self {
        PeriodChannel {
            ring: EventRing::new(),
            claimed: AtomicBool::new(false),
            active: AtomicBool::new(false),
            seq: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Take the channel for one stream. Returns `false` if it is already taken.
    pub(crate) fn claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn unclaim(&self) {
        self.claimed.store(false, Ordering::Release);
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    /// Gate event delivery. Cleared while the stream is not running so a late
    /// interrupt after stop does not report a period.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Producer side. Returns `true` if an event was queued.
    pub(crate) fn notify(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        let seq = self.seq.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        match self.ring.push(PeriodEvent { seq }) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Consumer side: next pending event.
    pub fn recv(&self) -> Option<PeriodEvent> {
        self.ring.pop()
    }

    /// Consumer side: discard pending events and return how many there were.
    pub fn drain(&self) -> usize {
        let mut n = 0;
        while self.ring.pop().is_some() {
            n += 1;
        }
        n
    }

    pub fn pending(&self) -> usize {
        self.ring.len()
    }

    /// Consumer side: forget pending events and reset the counters.
    pub fn clear(&self) {
        self.drain();
        self.seq.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Events lost to a full channel since the last [`clear`](Self::clear).
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for PeriodChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt handler bound to one stream instance.
pub struct PeriodHandler<'n, R> {
    events: &'n PeriodChannel,
    regs: R,
    ack: Option<RegField>,
}

impl<'n, R: RegisterAccess> PeriodHandler<'n, R> {
    /// `ack` is a write-1-to-clear status bit, if the block has one.
    pub fn new(events: &'n PeriodChannel, regs: R, ack: Option<RegField>) -> Self {
        PeriodHandler { events, regs, ack }
    }

    /// Interrupt entry point. Returns `true` if a period event was queued.
    pub fn handle(&self) -> bool {
        if let Some(ack) = self.ack {
            self.regs.write(ack.offset, ack.mask);
        }
        self.events.notify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegs;

    #[test]
    fn inactive_channel_ignores_interrupts() {
        let ch = PeriodChannel::new();
        assert!(!ch.notify());
        assert_eq!(ch.pending(), 0);
        assert_eq!(ch.dropped(), 0);
    }

    #[test]
    fn events_carry_sequence_numbers() {
        let ch = PeriodChannel::new();
        ch.set_active(true);
        assert!(ch.notify());
        assert!(ch.notify());
        assert_eq!(ch.recv(), Some(PeriodEvent { seq: 1 }));
        assert_eq!(ch.recv(), Some(PeriodEvent { seq: 2 }));
        assert_eq!(ch.recv(), None);
    }

    #[test]
    fn overflow_is_counted_not_blocking() {
        let ch = PeriodChannel::new();
        ch.set_active(true);
        for _ in 0..PERIOD_QUEUE_SLOTS {
            assert!(ch.notify());
        }
        assert!(!ch.notify());
        assert!(!ch.notify());
        assert_eq!(ch.dropped(), 2);
        assert_eq!(ch.drain(), PERIOD_QUEUE_SLOTS);
    }

    #[test]
    fn clear_resets_counters() {
        let ch = PeriodChannel::new();
        ch.set_active(true);
        ch.notify();
        ch.notify();
        ch.clear();
        assert_eq!(ch.pending(), 0);
        ch.notify();
        assert_eq!(ch.recv(), Some(PeriodEvent { seq: 1 }));
    }

    #[test]
    fn channel_has_one_owner_at_a_time() {
        let ch = PeriodChannel::new();
        assert!(ch.claim());
        assert!(!ch.claim());
        assert!(ch.is_claimed());
        ch.unclaim();
        assert!(ch.claim());
    }

    #[test]
    fn handler_acknowledges_then_notifies() {
        let regs = MockRegs::new();
        regs.set_w1c(0x144);
        regs.set_reg(0x144, 0b11);
        let ch = PeriodChannel::new();
        ch.set_active(true);

        let handler = PeriodHandler::new(&ch, &regs, Some(RegField::new(0x144, 0b01)));
        assert!(handler.handle());

        assert_eq!(regs.write_count(), 1);
        assert_eq!(regs.write_at(0), (0x144, 0b01));
        // Only our status bit is cleared
        assert_eq!(regs.read_reg(0x144), 0b10);
        assert_eq!(ch.pending(), 1);
    }

    #[test]
    fn handler_without_status_register_only_notifies() {
        let regs = MockRegs::new();
        let ch = PeriodChannel::new();
        ch.set_active(true);

        let handler = PeriodHandler::new(&ch, &regs, None);
        assert!(handler.handle());
        assert_eq!(regs.write_count(), 0);
        assert_eq!(ch.pending(), 1);
    }
}
