//! AIU (audio output unit) register map.
//!
//! Offsets are byte offsets into the AIU register block. Only the registers
//! used by the I2S encoder, its memory FIFO and its clock dividers are listed.

use bitflags::bitflags;

use super::{genmask, RegField};

// ── I2S encoder ────────────────────────────────────────────────────────────

/// I2S source descriptor (sample layout fed to the encoder).
pub const AIU_I2S_SOURCE_DESC: u32 = 0x034;

/// I2S sync register. Reading it latches the encoder after a soft reset.
pub const AIU_I2S_SYNC: u32 = 0x044;

/// I2S miscellaneous control.
pub const AIU_I2S_MISC: u32 = 0x048;

/// Soft reset of the AIU clock domains (write-only, self-clearing).
pub const AIU_RST_SOFT: u32 = 0x054;

// ── Clocking ───────────────────────────────────────────────────────────────

/// Clock control.
/// - Bits 3:2: I2S_DIV (pre-divider, always 0)
/// - Bit    0: I2S_DIV_EN
pub const AIU_CLK_CTRL: u32 = 0x058;

/// Extended clock control.
/// - Bits 5:0: I2S_DIV (bit clock divisor − 1)
pub const AIU_CLK_CTRL_MORE: u32 = 0x064;

/// DAC LR clock control.
/// - Bits 11:0: DIV (bit clocks per frame − 1)
pub const AIU_CODEC_DAC_LRCLK_CTRL: u32 = 0x0A0;

// ── Playback memory FIFO ───────────────────────────────────────────────────

/// DMA start address.
pub const AIU_MEM_I2S_START_PTR: u32 = 0x140;

/// DMA read pointer (current hardware position).
pub const AIU_MEM_I2S_RD_PTR: u32 = 0x144;

/// DMA end address (address of the last FIFO block).
pub const AIU_MEM_I2S_END_PTR: u32 = 0x148;

/// Channel masks and interrupt block count.
/// - Bits 31:16: IRQ_BLOCK (FIFO blocks per interrupt)
/// - Bits 15:8 : CH_MEM
/// - Bits  7:0 : CH_RD
pub const AIU_MEM_I2S_MASKS: u32 = 0x14C;

/// Memory FIFO control.
pub const AIU_MEM_I2S_CONTROL: u32 = 0x150;

bitflags! {
    /// `AIU_MEM_I2S_CONTROL` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MemI2sControl: u32 {
        /// Pointer reset: reloads the read pointer from START_PTR.
        const INIT = 1 << 0;
        /// Fill the FIFO from memory.
        const FILL_EN = 1 << 1;
        /// Drain the FIFO into the encoder.
        const EMPTY_EN = 1 << 2;
        /// Samples in memory are 16 bits wide.
        const MODE_16BIT = 1 << 6;
    }

    /// `AIU_I2S_SOURCE_DESC` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceDesc: u32 {
        const MODE_8CH = 1 << 0;
        const MODE_24BIT = 1 << 5;
        const MODE_32BIT = 1 << 9;
        const MODE_SPLIT = 1 << 11;
    }

    /// `AIU_I2S_MISC` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct I2sMisc: u32 {
        /// Hold the encoder output (emits silence, stops consuming).
        const HOLD_EN = 1 << 2;
    }

    /// `AIU_RST_SOFT` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RstSoft: u32 {
        const I2S_FAST = 1 << 0;
    }
}

pub const CLK_CTRL_I2S_DIV_EN: RegField = RegField::new(AIU_CLK_CTRL, 1 << 0);
pub const CLK_CTRL_I2S_DIV: RegField = RegField::new(AIU_CLK_CTRL, genmask(3, 2));
pub const CLK_CTRL_MORE_I2S_DIV: RegField = RegField::new(AIU_CLK_CTRL_MORE, genmask(5, 0));
pub const CODEC_DAC_LRCLK_DIV: RegField = RegField::new(AIU_CODEC_DAC_LRCLK_CTRL, genmask(11, 0));

pub const MEM_I2S_MASKS_IRQ_BLOCK: RegField = RegField::new(AIU_MEM_I2S_MASKS, genmask(31, 16));
pub const MEM_I2S_MASKS_CH_MEM: RegField = RegField::new(AIU_MEM_I2S_MASKS, genmask(15, 8));
pub const MEM_I2S_MASKS_CH_RD: RegField = RegField::new(AIU_MEM_I2S_MASKS, genmask(7, 0));
