//! Crate-wide error type.
//!
//! Every fallible operation returns [`Result`]. Nothing is retried inside the
//! crate; the caller decides whether to try again.

use thiserror::Error;

use crate::hw::PcmFormat;
use crate::stream::StreamState;

/// Platform resource that failed underneath a stream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Master clock prepare/enable.
    Clock,
    /// Master clock rate change.
    ClockRate,
    /// Period event channel already owned by another open stream.
    EventChannel,
}

/// Errors reported by the streaming engine, the front ends and the mux.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// `osc / rate` is not an exact multiple of [`FRAME_BITS`](crate::constants::FRAME_BITS).
    #[error("{osc} Hz cannot be divided down to exactly {rate} Hz")]
    ClockConfiguration { osc: u32, rate: u32 },

    /// The bit-clock divisor does not fit the divider field.
    #[error("bit clock divisor {divisor} exceeds the hardware maximum of {max}")]
    ClockRange { divisor: u32, max: u32 },

    /// The DMA allocator could not provide the requested region.
    #[error("unable to allocate {bytes} bytes of DMA memory")]
    OutOfMemory { bytes: usize },

    /// The DMA region is not reachable with the FIFO's 32-bit address mask.
    #[error("DMA region at {addr:#x} is outside the 32-bit DMA window")]
    DmaAddressRange { addr: u64 },

    /// Buffer or period size violates the FIFO block / period count limits.
    #[error("invalid buffer geometry: {buffer_bytes} byte buffer, {period_bytes} byte periods")]
    InvalidBufferGeometry {
        buffer_bytes: usize,
        period_bytes: usize,
    },

    /// Lifecycle call made in the wrong state.
    #[error("{op} is not allowed while the stream is {from:?}")]
    InvalidStateTransition { from: StreamState, op: &'static str },

    #[error("unsupported sample format {0:?}")]
    UnsupportedFormat(PcmFormat),

    #[error("unsupported channel count {0}")]
    UnsupportedChannelCount(u32),

    #[error("unsupported sample rate {0} Hz")]
    UnsupportedRate(u32),

    /// The interrupt line could not be requested.
    #[error("interrupt line registration failed")]
    InterruptRegistrationFailure,

    #[error("platform resource failure: {0:?}")]
    PlatformResource(Resource),

    /// The mux selector field holds a value outside the enumeration.
    #[error("routing selector holds unknown value {0}")]
    InvalidRoutingValue(u32),

    #[error("unsupported clock id {0}")]
    UnsupportedClockId(u32),
}

/// Shorthand used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
