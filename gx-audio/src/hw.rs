//! Hardware channel descriptors and negotiated stream parameters.
//!
//! A [`HardwareChannel`] describes one physical streaming path: what it can
//! do (direction, channel counts, formats, rates, buffer geometry) and where
//! its registers live. Descriptors are `'static` and shared read-only by every
//! stream that opens the channel.
//!
//! | Descriptor | Direction | Block | Channels | Rates |
//! |------------|-----------|-------|----------|-------|
//! | [`I2S_PLAYBACK`] | playback | 256 B | 2 or 8 | 8–192 kHz |
//! | [`TODDR0`] / [`TODDR1`] | capture | 512 B | 1–8 | 8–48 kHz |

use bitflags::bitflags;
use log::error;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::regs::{aiu, audin, RegField};

/// Stream direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Playback,
    Capture,
}

/// Sample format as negotiated with the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcmFormat {
    /// Signed 16-bit, little endian.
    S16Le,
    /// Signed 24-bit in a 32-bit container, little endian.
    S24Le,
    /// Signed 32-bit, little endian.
    S32Le,
}

impl PcmFormat {
    /// Bits one sample occupies in memory and on the wire.
    pub const fn physical_width(self) -> u32 {
        match self {
            PcmFormat::S16Le => 16,
            PcmFormat::S24Le | PcmFormat::S32Le => 32,
        }
    }

    /// The matching bit in a [`Formats`] set.
    pub const fn flag(self) -> Formats {
        match self {
            PcmFormat::S16Le => Formats::S16_LE,
            PcmFormat::S24Le => Formats::S24_LE,
            PcmFormat::S32Le => Formats::S32_LE,
        }
    }
}

bitflags! {
    /// Set of supported sample formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Formats: u32 {
        const S16_LE = 1 << 0;
        const S24_LE = 1 << 1;
        const S32_LE = 1 << 2;
    }
}

/// Inclusive sample-rate range in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRange {
    pub min: u32,
    pub max: u32,
}

impl RateRange {
    pub const fn contains(&self, rate: u32) -> bool {
        rate >= self.min && rate <= self.max
    }
}

/// Parameters negotiated for one stream (`hw_params`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwParams {
    /// Sample rate in Hz.
    pub rate: u32,
    pub channels: u32,
    pub format: PcmFormat,
    /// Ring buffer size in bytes.
    pub buffer_bytes: usize,
    /// Period size in bytes.
    pub period_bytes: usize,
}

impl HwParams {
    pub const fn physical_width(&self) -> u32 {
        self.format.physical_width()
    }

    /// Bytes per frame (one sample for every channel).
    pub const fn frame_bytes(&self) -> usize {
        (self.channels * self.physical_width() / 8) as usize
    }

    /// Number of periods in the ring buffer.
    pub const fn periods(&self) -> usize {
        if self.period_bytes == 0 {
            0
        } else {
            self.buffer_bytes / self.period_bytes
        }
    }
}

/// Registers of one DMA-backed memory FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoLayout {
    /// DMA start address register.
    pub start: u32,
    /// DMA end address register (last block).
    pub end: u32,
    /// Hardware position register (read pointer for playback, write pointer
    /// for capture).
    pub ptr: u32,
    /// Control register.
    pub ctrl: u32,
    /// Pointer-reset bit in `ctrl`.
    pub init: u32,
    /// Fill/empty enable bits in `ctrl`, set while running.
    pub run: u32,
    /// 16-bit storage mode bit in `ctrl`.
    pub mode_16bit: u32,
    /// FIFO blocks per period interrupt.
    pub irq_blocks: RegField,
    /// Interrupt source enable, when the source is gated in the block itself.
    pub irq_enable: Option<RegField>,
    /// Interrupt status to acknowledge (write 1 to clear), if any.
    pub irq_status: Option<RegField>,
}

impl FifoLayout {
    /// Bits of `ctrl` reinitialized on every prepare.
    pub const fn ctrl_reset_mask(&self) -> u32 {
        self.init | self.run | self.mode_16bit
    }
}

/// Registers of a frame/bit clock divider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerLayout {
    /// Divider enable bit. Must be clear while the divisor fields change.
    pub enable: RegField,
    /// Bit clocks per frame − 1.
    pub frame: RegField,
    /// Bit clock divisor − 1.
    pub bit: RegField,
    /// Pre-divider forced to zero, if the block has one.
    pub pre: Option<RegField>,
}

/// Serializer in front of the FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEnd {
    /// AIU I2S encoder (playback).
    AiuI2s,
    /// AUDIN capture FIFO; channel count lives in the FIFO control register.
    Audin { chan: RegField },
}

/// Source selector of a capture FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxLayout {
    /// Control name exposed to the host framework.
    pub name: &'static str,
    pub field: RegField,
}

/// One physical streaming path.
#[derive(Debug)]
pub struct HardwareChannel {
    pub name: &'static str,
    pub direction: Direction,
    pub channels_min: u32,
    pub channels_max: u32,
    /// Discrete channel counts the serializer accepts; empty means any count
    /// in `channels_min..=channels_max`.
    pub channel_list: &'static [u32],
    pub formats: Formats,
    pub rates: RateRange,
    /// FIFO block size in bytes.
    pub fifo_block: usize,
    pub periods_min: usize,
    pub periods_max: usize,
    pub period_bytes_min: usize,
    pub period_bytes_max: usize,
    pub buffer_bytes_max: usize,
    pub fifo: FifoLayout,
    pub divider: DividerLayout,
    pub front_end: FrontEnd,
    pub mux: Option<MuxLayout>,
}

impl HardwareChannel {
    /// Check `params` against this channel's limits.
    ///
    /// Sizes are never rounded: a buffer or period that is not a whole number
    /// of FIFO blocks is rejected.
    pub fn validate(&self, params: &HwParams) -> Result<()> {
        if !self.formats.contains(params.format.flag()) {
            error!("{}: unsupported format {:?}", self.name, params.format);
            return Err(Error::UnsupportedFormat(params.format));
        }

        let channels_ok = if self.channel_list.is_empty() {
            params.channels >= self.channels_min && params.channels <= self.channels_max
        } else {
            self.channel_list.contains(&params.channels)
        };
        if !channels_ok {
            error!("{}: unsupported channel number {}", self.name, params.channels);
            return Err(Error::UnsupportedChannelCount(params.channels));
        }

        if !self.rates.contains(params.rate) {
            error!("{}: unsupported rate {}", self.name, params.rate);
            return Err(Error::UnsupportedRate(params.rate));
        }

        let buffer = params.buffer_bytes;
        let period = params.period_bytes;
        let geometry_ok = period != 0
            && buffer % self.fifo_block == 0
            && period % self.fifo_block == 0
            && buffer % period == 0
            && (self.period_bytes_min..=self.period_bytes_max).contains(&period)
            && buffer <= self.buffer_bytes_max
            && (self.periods_min..=self.periods_max).contains(&params.periods());
        if !geometry_ok {
            error!(
                "{}: invalid buffer geometry {} / {} (block {})",
                self.name, buffer, period, self.fifo_block
            );
            return Err(Error::InvalidBufferGeometry {
                buffer_bytes: buffer,
                period_bytes: period,
            });
        }

        Ok(())
    }
}

const fn toddr(n: u32, name: &'static str, mux_name: &'static str) -> HardwareChannel {
    let base = audin::fifo_base(n);
    HardwareChannel {
        name,
        direction: Direction::Capture,
        channels_min: 1,
        channels_max: 8,
        channel_list: &[],
        formats: Formats::S16_LE.union(Formats::S24_LE),
        rates: RateRange {
            min: 8_000,
            max: 48_000,
        },
        fifo_block: TODDR_FIFO_BLOCK_BYTES,
        periods_min: PERIODS_MIN,
        periods_max: PERIODS_MAX,
        period_bytes_min: TODDR_FIFO_BLOCK_BYTES,
        period_bytes_max: TODDR_FIFO_BLOCK_BYTES * PERIOD_BLOCKS_MAX,
        buffer_bytes_max: TODDR_FIFO_BLOCK_BYTES * PERIOD_BLOCKS_MAX * PERIODS_MAX,
        fifo: FifoLayout {
            start: base + audin::FIFO_START,
            end: base + audin::FIFO_END,
            ptr: base + audin::FIFO_PTR,
            ctrl: base + audin::FIFO_CTRL,
            init: audin::FifoCtrl::INIT.bits(),
            run: audin::FifoCtrl::FILL_EN
                .union(audin::FifoCtrl::EMPTY_EN)
                .bits(),
            mode_16bit: audin::FifoCtrl::MODE_16BIT.bits(),
            irq_blocks: audin::fifo_intr_blocks(n),
            irq_enable: Some(audin::fifo_irq_enable(n)),
            irq_status: Some(audin::fifo_irq_status(n)),
        },
        divider: DividerLayout {
            enable: audin::I2SIN_CLK_DIV_EN,
            frame: audin::I2SIN_LRCLK_DIV,
            bit: audin::I2SIN_CLK_BCLK_DIV,
            pre: None,
        },
        front_end: FrontEnd::Audin {
            chan: audin::fifo_chan(n),
        },
        mux: Some(MuxLayout {
            name: mux_name,
            field: audin::fifo_din_sel(n),
        }),
    }
}

/// AIU I2S playback FIFO and encoder.
pub static I2S_PLAYBACK: HardwareChannel = HardwareChannel {
    name: "I2S",
    direction: Direction::Playback,
    channels_min: 2,
    channels_max: 8,
    channel_list: &[2, 8],
    formats: Formats::S16_LE.union(Formats::S24_LE),
    rates: RateRange {
        min: 8_000,
        max: 192_000,
    },
    fifo_block: I2S_FIFO_BLOCK_BYTES,
    periods_min: PERIODS_MIN,
    periods_max: PERIODS_MAX,
    period_bytes_min: I2S_FIFO_BLOCK_BYTES,
    period_bytes_max: I2S_FIFO_BLOCK_BYTES * PERIOD_BLOCKS_MAX,
    buffer_bytes_max: I2S_FIFO_BLOCK_BYTES * PERIOD_BLOCKS_MAX * PERIODS_MAX,
    fifo: FifoLayout {
        start: aiu::AIU_MEM_I2S_START_PTR,
        end: aiu::AIU_MEM_I2S_END_PTR,
        ptr: aiu::AIU_MEM_I2S_RD_PTR,
        ctrl: aiu::AIU_MEM_I2S_CONTROL,
        init: aiu::MemI2sControl::INIT.bits(),
        run: aiu::MemI2sControl::FILL_EN
            .union(aiu::MemI2sControl::EMPTY_EN)
            .bits(),
        mode_16bit: aiu::MemI2sControl::MODE_16BIT.bits(),
        irq_blocks: aiu::MEM_I2S_MASKS_IRQ_BLOCK,
        // The AIU FIFO interrupt is gated at the interrupt controller only.
        irq_enable: None,
        irq_status: None,
    },
    divider: DividerLayout {
        enable: aiu::CLK_CTRL_I2S_DIV_EN,
        frame: aiu::CODEC_DAC_LRCLK_DIV,
        bit: aiu::CLK_CTRL_MORE_I2S_DIV,
        pre: Some(aiu::CLK_CTRL_I2S_DIV),
    },
    front_end: FrontEnd::AiuI2s,
    mux: None,
};

/// AUDIN capture FIFO 0.
pub static TODDR0: HardwareChannel = toddr(0, "TODDR0", "TODDR0 SRC SEL");

/// AUDIN capture FIFO 1.
pub static TODDR1: HardwareChannel = toddr(1, "TODDR1", "TODDR1 SRC SEL");
