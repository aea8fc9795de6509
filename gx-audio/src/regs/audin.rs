//! AUDIN (audio input unit) register map.
//!
//! The AUDIN block carries the I2S-in clock dividers and a bank of capture
//! FIFOs ("TODDR": to-DDR). Each FIFO owns a window of registers at
//! [`fifo_base`]`(n)`; the per-FIFO offsets below are relative to it.

use bitflags::bitflags;

use super::{genmask, RegField};

// ── I2S-in clocking ────────────────────────────────────────────────────────

/// I2S-in clock control.
/// - Bits 13:8: BCLK_DIV (bit clock divisor − 1)
/// - Bit     0: DIV_EN
pub const AUDIN_I2SIN_CLK_CTRL: u32 = 0x040;

/// I2S-in LR clock control.
/// - Bits 11:0: LRCLK_DIV (bit clocks per frame − 1)
pub const AUDIN_I2SIN_LRCLK_CTRL: u32 = 0x044;

pub const I2SIN_CLK_DIV_EN: RegField = RegField::new(AUDIN_I2SIN_CLK_CTRL, 1 << 0);
pub const I2SIN_CLK_BCLK_DIV: RegField = RegField::new(AUDIN_I2SIN_CLK_CTRL, genmask(13, 8));
pub const I2SIN_LRCLK_DIV: RegField = RegField::new(AUDIN_I2SIN_LRCLK_CTRL, genmask(11, 0));

// ── Capture FIFO window ────────────────────────────────────────────────────

/// Number of capture FIFOs in the block.
pub const FIFO_COUNT: u32 = 3;

/// Offset of FIFO `n`'s register window.
pub const fn fifo_base(n: u32) -> u32 {
    0x080 + n * 0x40
}

/// DMA start address.
pub const FIFO_START: u32 = 0x00;

/// DMA end address (address of the last FIFO block).
pub const FIFO_END: u32 = 0x04;

/// DMA write pointer (current hardware position).
pub const FIFO_PTR: u32 = 0x08;

/// Interrupt pacing.
/// - Bits 15:0: BLOCKS (FIFO blocks per address interrupt)
pub const FIFO_INTR: u32 = 0x0C;

/// FIFO control.
/// - Bits 14:11: CHAN (channel count)
/// - Bits  5:3 : DIN_SEL (source: 0 = SPDIF, 1 = I2S, 2 = PCM)
/// - remaining bits: [`FifoCtrl`]
pub const FIFO_CTRL: u32 = 0x14;

bitflags! {
    /// `FIFO_CTRL` single-bit flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoCtrl: u32 {
        /// Accept samples from the selected source into the FIFO.
        const FILL_EN = 1 << 0;
        /// Pointer reset: reloads the write pointer from START.
        const INIT = 1 << 2;
        /// Samples are stored 16 bits wide.
        const MODE_16BIT = 1 << 6;
        /// Drain the FIFO to memory.
        const EMPTY_EN = 1 << 15;
    }
}

/// Channel count field of FIFO `n`.
pub const fn fifo_chan(n: u32) -> RegField {
    RegField::new(fifo_base(n) + FIFO_CTRL, genmask(14, 11))
}

/// Source selector field of FIFO `n`.
pub const fn fifo_din_sel(n: u32) -> RegField {
    RegField::new(fifo_base(n) + FIFO_CTRL, genmask(5, 3))
}

/// Interrupt pacing field of FIFO `n`.
pub const fn fifo_intr_blocks(n: u32) -> RegField {
    RegField::new(fifo_base(n) + FIFO_INTR, genmask(15, 0))
}

// ── Interrupts ─────────────────────────────────────────────────────────────

/// Address interrupt enable, one bit per FIFO.
pub const AUDIN_INT_CTRL: u32 = 0x140;

/// Address interrupt status, one bit per FIFO, write 1 to clear.
pub const AUDIN_FIFO_INT: u32 = 0x144;

/// Interrupt enable bit of FIFO `n`.
pub const fn fifo_irq_enable(n: u32) -> RegField {
    RegField::new(AUDIN_INT_CTRL, 1 << n)
}

/// Interrupt status bit of FIFO `n`.
pub const fn fifo_irq_status(n: u32) -> RegField {
    RegField::new(AUDIN_FIFO_INT, 1 << n)
}
