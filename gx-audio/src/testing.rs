//! Allocation-free mocks of the platform traits for host tests.
//!
//! Every mock uses interior mutability and implements its trait for `&Mock`,
//! so a test keeps a shared handle for assertions while the code under test
//! holds another.

use core::cell::{Cell, RefCell};
use core::ptr::NonNull;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::hw::FifoLayout;
use crate::mux::RoutingSelection;
use crate::notify::PeriodHandler;
use crate::platform::{ClockSource, DmaAllocator, DmaRegion, IrqLine, PowerGraph};
use crate::regs::RegisterAccess;

/// Monotonic event clock shared by every mock, for asserting call order
/// across mocks. Only comparisons within one test are meaningful.
static TICKS: AtomicU32 = AtomicU32::new(1);

fn tick() -> u32 {
    TICKS.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

// ── Registers ─────────────────────────────────────────────────────────────

const REG_SLOTS: usize = 128;
const LOG_SLOTS: usize = 256;

/// Register file covering offsets `0..0x200` with a write log.
pub struct MockRegs {
    regs: [Cell<u32>; REG_SLOTS],
    log: [Cell<(u32, u32)>; LOG_SLOTS],
    log_count: Cell<usize>,
    /// Offset whose writes clear the bits written (status register).
    w1c: Cell<Option<u32>>,
    /// Emulated pointer reload: (ctrl offset, init bit, start offset, ptr offset).
    ptr_reload: Cell<Option<(u32, u32, u32, u32)>>,
}

impl MockRegs {
    pub fn new() -> Self {
        MockRegs {
            regs: core::array::from_fn(|_| Cell::new(0)),
            log: core::array::from_fn(|_| Cell::new((0, 0))),
            log_count: Cell::new(0),
            w1c: Cell::new(None),
            ptr_reload: Cell::new(None),
        }
    }

    fn slot(offset: u32) -> usize {
        assert_eq!(offset % 4, 0, "unaligned register offset {:#x}", offset);
        let i = offset as usize / 4;
        assert!(i < REG_SLOTS, "register offset {:#x} out of range", offset);
        i
    }

    /// Set a register without logging a write (hardware side).
    pub fn set_reg(&self, offset: u32, value: u32) {
        self.regs[Self::slot(offset)].set(value);
    }

    pub fn read_reg(&self, offset: u32) -> u32 {
        self.regs[Self::slot(offset)].get()
    }

    pub fn set_w1c(&self, offset: u32) {
        self.w1c.set(Some(offset));
    }

    /// Make a set INIT bit reload the FIFO pointer from START, like the
    /// hardware does.
    pub fn emulate_pointer_reload(&self, fifo: &FifoLayout) {
        self.ptr_reload
            .set(Some((fifo.ctrl, fifo.init, fifo.start, fifo.ptr)));
    }

    pub fn write_count(&self) -> usize {
        self.log_count.get()
    }

    /// The `i`-th logged write as (offset, value).
    pub fn write_at(&self, i: usize) -> (u32, u32) {
        assert!(i < self.log_count.get().min(LOG_SLOTS), "no write #{}", i);
        self.log[i].get()
    }

    /// Number of logged writes to `offset`.
    pub fn writes_to(&self, offset: u32) -> usize {
        let n = self.log_count.get().min(LOG_SLOTS);
        (0..n).filter(|&i| self.log[i].get().0 == offset).count()
    }

    pub fn clear_log(&self) {
        self.log_count.set(0);
    }
}

impl RegisterAccess for MockRegs {
    fn read(&self, offset: u32) -> u32 {
        self.read_reg(offset)
    }

    fn write(&self, offset: u32, value: u32) {
        let n = self.log_count.get();
        if n < LOG_SLOTS {
            self.log[n].set((offset, value));
        }
        self.log_count.set(n + 1);

        if self.w1c.get() == Some(offset) {
            self.set_reg(offset, self.read_reg(offset) & !value);
            return;
        }
        self.set_reg(offset, value);

        if let Some((ctrl, init, start, ptr)) = self.ptr_reload.get() {
            if offset == ctrl && value & init != 0 {
                self.set_reg(ptr, self.read_reg(start));
            }
        }
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────

pub struct MockClock {
    rate: Cell<u32>,
    enabled: Cell<bool>,
    enables: Cell<usize>,
    fail_enable: Cell<bool>,
    fail_set_rate: Cell<bool>,
    disabled_at: Cell<u32>,
}

impl MockClock {
    pub fn new(rate: u32) -> Self {
        MockClock {
            rate: Cell::new(rate),
            enabled: Cell::new(false),
            enables: Cell::new(0),
            fail_enable: Cell::new(false),
            fail_set_rate: Cell::new(false),
            disabled_at: Cell::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn rate(&self) -> u32 {
        self.rate.get()
    }

    pub fn enables(&self) -> usize {
        self.enables.get()
    }

    pub fn fail_enable(&self) {
        self.fail_enable.set(true);
    }

    pub fn fail_set_rate(&self) {
        self.fail_set_rate.set(true);
    }

    pub fn disabled_at(&self) -> u32 {
        self.disabled_at.get()
    }
}

impl ClockSource for &MockClock {
    type Error = MockError;

    fn prepare_enable(&mut self) -> Result<(), MockError> {
        if self.fail_enable.get() {
            return Err(MockError);
        }
        assert!(!self.enabled.get(), "clock enabled twice");
        self.enabled.set(true);
        self.enables.set(self.enables.get() + 1);
        Ok(())
    }

    fn disable_unprepare(&mut self) {
        assert!(self.enabled.get(), "clock disabled while off");
        self.enabled.set(false);
        self.disabled_at.set(tick());
    }

    fn rate(&self) -> u32 {
        self.rate.get()
    }

    fn set_rate(&mut self, hz: u32) -> Result<(), MockError> {
        if self.fail_set_rate.get() {
            return Err(MockError);
        }
        self.rate.set(hz);
        Ok(())
    }
}

// ── DMA allocator ─────────────────────────────────────────────────────────

/// Hands out one region at a time at a fixed device address.
pub struct MockAlloc {
    base: u64,
    fail: Cell<bool>,
    outstanding: Cell<Option<u64>>,
    allocs: Cell<usize>,
    frees: Cell<usize>,
    last_request: Cell<usize>,
    freed_at: Cell<u32>,
}

impl MockAlloc {
    pub fn new(base: u64) -> Self {
        MockAlloc {
            base,
            fail: Cell::new(false),
            outstanding: Cell::new(None),
            allocs: Cell::new(0),
            frees: Cell::new(0),
            last_request: Cell::new(0),
            freed_at: Cell::new(0),
        }
    }

    /// Make the next allocation fail.
    pub fn fail_next(&self) {
        self.fail.set(true);
    }

    /// Regions currently allocated.
    pub fn live(&self) -> usize {
        self.outstanding.get().map_or(0, |_| 1)
    }

    pub fn allocs(&self) -> usize {
        self.allocs.get()
    }

    pub fn frees(&self) -> usize {
        self.frees.get()
    }

    pub fn last_request(&self) -> usize {
        self.last_request.get()
    }

    pub fn freed_at(&self) -> u32 {
        self.freed_at.get()
    }
}

impl DmaAllocator for &MockAlloc {
    fn alloc_coherent(&mut self, bytes: usize) -> Option<DmaRegion> {
        self.last_request.set(bytes);
        if self.fail.replace(false) {
            return None;
        }
        assert!(self.outstanding.get().is_none(), "second live allocation");
        self.outstanding.set(Some(self.base));
        self.allocs.set(self.allocs.get() + 1);
        Some(DmaRegion {
            dma_addr: self.base,
            cpu_addr: NonNull::dangling(),
            bytes,
        })
    }

    fn free_coherent(&mut self, region: DmaRegion) {
        assert_eq!(
            self.outstanding.take(),
            Some(region.dma_addr),
            "free of a region that is not live"
        );
        self.frees.set(self.frees.get() + 1);
        self.freed_at.set(tick());
    }
}

// ── Interrupt line ────────────────────────────────────────────────────────

pub struct MockIrq<'n, R> {
    handler: RefCell<Option<PeriodHandler<'n, R>>>,
    enabled: Cell<bool>,
    requests: Cell<usize>,
    fail_request: Cell<bool>,
    freed_at: Cell<u32>,
    disabled_at: Cell<u32>,
}

impl<'n, R: RegisterAccess> MockIrq<'n, R> {
    pub fn new() -> Self {
        MockIrq {
            handler: RefCell::new(None),
            enabled: Cell::new(false),
            requests: Cell::new(0),
            fail_request: Cell::new(false),
            freed_at: Cell::new(0),
            disabled_at: Cell::new(0),
        }
    }

    pub fn fail_request(&self) {
        self.fail_request.set(true);
    }

    pub fn is_registered(&self) -> bool {
        self.handler.borrow().is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn freed_at(&self) -> u32 {
        self.freed_at.get()
    }

    pub fn disabled_at(&self) -> u32 {
        self.disabled_at.get()
    }

    /// Raise the interrupt. Returns whether a period event was queued; a
    /// masked or unregistered line delivers nothing.
    pub fn fire(&self) -> bool {
        if !self.enabled.get() {
            return false;
        }
        match self.handler.borrow().as_ref() {
            Some(h) => h.handle(),
            None => false,
        }
    }
}

impl<'a, 'n, R: RegisterAccess> IrqLine<'n, R> for &'a MockIrq<'n, R> {
    type Error = MockError;

    fn request(&mut self, handler: PeriodHandler<'n, R>) -> Result<(), MockError> {
        if self.fail_request.get() {
            return Err(MockError);
        }
        let mut slot = self.handler.borrow_mut();
        assert!(slot.is_none(), "irq requested twice");
        *slot = Some(handler);
        self.requests.set(self.requests.get() + 1);
        Ok(())
    }

    fn free(&mut self) {
        if self.enabled.get() {
            self.disable();
        }
        self.handler.borrow_mut().take();
        self.freed_at.set(tick());
    }

    fn enable(&mut self) {
        assert!(self.is_registered(), "irq enabled without a handler");
        self.enabled.set(true);
    }

    fn disable(&mut self) {
        self.enabled.set(false);
        self.disabled_at.set(tick());
    }
}

// ── Power graph ───────────────────────────────────────────────────────────

pub struct MockGraph {
    updates: Cell<usize>,
    last: Cell<Option<(&'static str, RoutingSelection)>>,
}

impl MockGraph {
    pub fn new() -> Self {
        MockGraph {
            updates: Cell::new(0),
            last: Cell::new(None),
        }
    }

    pub fn updates(&self) -> usize {
        self.updates.get()
    }

    pub fn last(&self) -> Option<(&'static str, RoutingSelection)> {
        self.last.get()
    }
}

impl PowerGraph for &MockGraph {
    fn mux_update(&mut self, control: &'static str, selection: RoutingSelection) {
        self.updates.set(self.updates.get() + 1);
        self.last.set(Some((control, selection)));
    }
}

// ── GPIO ──────────────────────────────────────────────────────────────────

#[cfg(feature = "codecs")]
pub use self::pin::MockPin;

#[cfg(feature = "codecs")]
mod pin {
    use core::cell::Cell;

    use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PinError;

    impl digital::Error for PinError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Output pin recording its level and every change.
    pub struct MockPin {
        level: Cell<Option<bool>>,
        sets: Cell<usize>,
        fail: Cell<bool>,
    }

    impl MockPin {
        pub fn new() -> Self {
            MockPin {
                level: Cell::new(None),
                sets: Cell::new(0),
                fail: Cell::new(false),
            }
        }

        /// `None` until first driven.
        pub fn level(&self) -> Option<bool> {
            self.level.get()
        }

        pub fn sets(&self) -> usize {
            self.sets.get()
        }

        pub fn fail(&self) {
            self.fail.set(true);
        }

        fn drive(&self, high: bool) -> Result<(), PinError> {
            if self.fail.get() {
                return Err(PinError);
            }
            self.level.set(Some(high));
            self.sets.set(self.sets.get() + 1);
            Ok(())
        }
    }

    impl ErrorType for &MockPin {
        type Error = PinError;
    }

    impl OutputPin for &MockPin {
        fn set_low(&mut self) -> Result<(), PinError> {
            self.drive(false)
        }

        fn set_high(&mut self) -> Result<(), PinError> {
            self.drive(true)
        }
    }
}
