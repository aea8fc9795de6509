/// Bit clocks per sample frame. Fixed by the serializers; every divider
/// computation assumes it.
pub const FRAME_BITS: u32 = 64;

/// Largest bit-clock divisor the divider fields can encode.
pub const MAX_BIT_CLOCK_DIVISOR: u32 = 64;

/// FIFO block size of the AIU I2S playback FIFO, in bytes.
pub const I2S_FIFO_BLOCK_BYTES: usize = 256;

/// FIFO block size of the AUDIN capture FIFOs (TODDR), in bytes.
pub const TODDR_FIFO_BLOCK_BYTES: usize = 512;

/// Minimum number of periods in a ring buffer.
pub const PERIODS_MIN: usize = 2;

/// Maximum number of periods in a ring buffer.
pub const PERIODS_MAX: usize = 64;

/// Largest period, in FIFO blocks.
pub const PERIOD_BLOCKS_MAX: usize = 32;

/// Exclusive upper bound of device addresses the FIFO DMA engines can reach.
pub const DMA_ADDRESS_LIMIT: u64 = 1 << 32;

/// Slots in a period event queue: one full ring buffer's worth of periods.
/// Must be a power of two.
pub const PERIOD_QUEUE_SLOTS: usize = PERIODS_MAX;
