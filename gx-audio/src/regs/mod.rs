//! Register access surface and register maps.
//!
//! The engine never touches MMIO directly: every component is handed a
//! [`RegisterAccess`] implementation for the register block it drives (AIU for
//! playback, AUDIN for capture). Production code uses [`Mmio`]; tests use an
//! in-memory register file with a write log.
//!
//! Register maps:
//!
//! - [`aiu`]: audio output unit (I2S encoder, playback FIFO, clock dividers)
//! - [`audin`]: audio input unit (TODDR capture FIFOs, I2S-in dividers)

pub mod aiu;
pub mod audin;

use core::ptr::NonNull;

/// Read/write access to one 32-bit register block, keyed by byte offset.
///
/// Accesses are atomic on the bus but not against other software: callers
/// serialize their own read-modify-write sequences.
pub trait RegisterAccess {
    /// Read the register at `offset`.
    fn read(&self, offset: u32) -> u32;

    /// Write `value` to the register at `offset`.
    fn write(&self, offset: u32, value: u32);

    /// Read-modify-write: `new = (current & !mask) | (value & mask)`.
    ///
    /// The write is skipped when the register already holds `new`.
    fn update_bits(&self, offset: u32, mask: u32, value: u32) {
        let current = self.read(offset);
        let new = (current & !mask) | (value & mask);
        if new != current {
            self.write(offset, new);
        }
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &T {
    fn read(&self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: u32, value: u32) {
        (**self).write(offset, value)
    }

    fn update_bits(&self, offset: u32, mask: u32, value: u32) {
        (**self).update_bits(offset, mask, value)
    }
}

/// Memory-mapped register block.
#[derive(Debug, Clone, Copy)]
pub struct Mmio {
    base: NonNull<u32>,
}

// SAFETY: the block is plain device memory. Individual 32-bit accesses are
// atomic on the bus; sequencing between contexts is the caller's contract.
unsafe impl Send for Mmio {}
unsafe impl Sync for Mmio {}

impl Mmio {
    /// Wrap the register block mapped at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped, 4-byte aligned register block covering
    /// every offset later passed to [`read`](RegisterAccess::read) or
    /// [`write`](RegisterAccess::write), valid for the lifetime of the handle.
    pub const unsafe fn new(base: NonNull<u32>) -> Self {
        Mmio { base }
    }
}

impl RegisterAccess for Mmio {
    fn read(&self, offset: u32) -> u32 {
        debug_assert_eq!(offset % 4, 0);
        // SAFETY: guaranteed by the contract of `Mmio::new`.
        unsafe { self.base.as_ptr().add(offset as usize / 4).read_volatile() }
    }

    fn write(&self, offset: u32, value: u32) {
        debug_assert_eq!(offset % 4, 0);
        // SAFETY: guaranteed by the contract of `Mmio::new`.
        unsafe {
            self.base
                .as_ptr()
                .add(offset as usize / 4)
                .write_volatile(value)
        }
    }
}

/// Contiguous mask with bits `hi..=lo` set.
pub const fn genmask(hi: u32, lo: u32) -> u32 {
    (u32::MAX >> (31 - hi)) & (u32::MAX << lo)
}

/// A (register offset, bit mask) pair naming one hardware field.
///
/// The mask must be non-zero and contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegField {
    pub offset: u32,
    pub mask: u32,
}

impl RegField {
    pub const fn new(offset: u32, mask: u32) -> Self {
        RegField { offset, mask }
    }

    const fn shift(&self) -> u32 {
        self.mask.trailing_zeros()
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u32 {
        self.mask >> self.shift()
    }

    /// Shift `value` into field position (bits outside the field are dropped).
    pub const fn prep(&self, value: u32) -> u32 {
        (value << self.shift()) & self.mask
    }

    /// Extract the field from a full register value.
    pub const fn get(&self, reg: u32) -> u32 {
        (reg & self.mask) >> self.shift()
    }

    /// Read the field.
    pub fn read<R: RegisterAccess + ?Sized>(&self, regs: &R) -> u32 {
        self.get(regs.read(self.offset))
    }

    /// Write the field, leaving the rest of the register untouched.
    pub fn write<R: RegisterAccess + ?Sized>(&self, regs: &R, value: u32) {
        regs.update_bits(self.offset, self.mask, self.prep(value));
    }

    /// Set every bit of the field.
    pub fn set<R: RegisterAccess + ?Sized>(&self, regs: &R) {
        regs.update_bits(self.offset, self.mask, self.mask);
    }

    /// Clear every bit of the field.
    pub fn clear<R: RegisterAccess + ?Sized>(&self, regs: &R) {
        regs.update_bits(self.offset, self.mask, 0);
    }
}
