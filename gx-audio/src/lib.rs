//! # gx-audio
//!
//! A `no_std` driver core for the audio blocks of Amlogic GX SoCs (S905,
//! S912): the AIU I2S playback FIFO and encoder, the AUDIN capture FIFOs
//! ("TODDR"), their clock dividers, the capture source mux, and GPIO shims for
//! two common external codecs.
//!
//! The crate owns no hardware by itself. Register blocks, clocks, DMA memory
//! and interrupt lines are handed in through the traits in [`regs`] and
//! [`platform`], so the same engine runs on real MMIO or on the mocks used by
//! the tests.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Registers | [`regs`] | `RegisterAccess`, MMIO handle, AIU and AUDIN register maps |
//! | Descriptors | [`hw`] | `HardwareChannel` capabilities and register layouts |
//! | Platform | [`platform`] | Clock, DMA allocator, IRQ line and routing-graph traits |
//! | Clocking | [`clock`] | Frame/bit divider calculation and programming |
//! | Memory | [`ring`] | DMA buffer ownership and FIFO pointer registers |
//! | Interrupts | [`notify`] | ISR handler and lock-free period event channel |
//! | Lifecycle | [`stream`] | Open → configure → prepare → run state machine |
//! | Routing | [`mux`] | TODDR source selector control |
//! | Codec | [`codec`] | INMP441 / PCM5102A GPIO shims (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use gx_audio::clock::SharedDivider;
//! use gx_audio::control::TriggerCmd;
//! use gx_audio::hw::{HwParams, PcmFormat, TODDR0};
//! use gx_audio::notify::PeriodChannel;
//! use gx_audio::stream::Stream;
//!
//! static EVENTS: PeriodChannel = PeriodChannel::new();
//! // Shared by TODDR0 and TODDR1
//! static I2SIN_DIV: SharedDivider = SharedDivider::new();
//!
//! let mut capture = Stream::new(&TODDR0, audin, mclk, dma, irq, &EVENTS, &I2SIN_DIV);
//! capture.open()?;
//! capture.hw_params(HwParams {
//!     rate: 48_000,
//!     channels: 2,
//!     format: PcmFormat::S16Le,
//!     buffer_bytes: 32768,
//!     period_bytes: 4096,
//! })?;
//! capture.prepare()?;
//! capture.trigger(TriggerCmd::Start)?;
//!
//! // From the control loop:
//! let elapsed = capture.take_periods();
//! let frame = capture.pointer()?;
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `codecs` | yes | INMP441 / PCM5102A drivers (requires `embedded-hal`) |
//!
//! ## Hardware parameters
//!
//! - **Frame:** 64 bit clocks ([`constants::FRAME_BITS`])
//! - **FIFO block:** 256 B playback, 512 B capture
//! - **Periods:** 2–64 per buffer, 1–32 blocks each
//! - **DMA window:** 32-bit device addresses

#![no_std]

pub mod constants;
pub mod error;
pub mod regs;
pub mod hw;
pub mod platform;
pub mod clock;
pub mod ring;
pub mod notify;
pub mod control;
pub mod mux;
pub mod stream;

#[cfg(feature = "codecs")]
pub mod codec;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
