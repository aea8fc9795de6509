//! Platform services consumed by the streaming engine.
//!
//! Resource lookup (which clock, which interrupt number, which DMA device) is
//! done by the platform glue before a [`Stream`](crate::stream::Stream) is
//! built. The engine only sees these narrow traits.

use core::fmt::Debug;
use core::ptr::NonNull;

use crate::mux::RoutingSelection;
use crate::notify::PeriodHandler;

/// A gateable master clock.
pub trait ClockSource {
    type Error: Debug;

    /// Prepare and enable the clock.
    fn prepare_enable(&mut self) -> Result<(), Self::Error>;

    /// Disable and unprepare the clock. Never fails.
    fn disable_unprepare(&mut self);

    /// Current rate in Hz.
    fn rate(&self) -> u32;

    /// Retune the clock.
    fn set_rate(&mut self, hz: u32) -> Result<(), Self::Error>;
}

/// One coherent DMA region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaRegion {
    /// Bus address the FIFO is programmed with.
    pub dma_addr: u64,
    /// CPU mapping of the same memory.
    pub cpu_addr: NonNull<u8>,
    pub bytes: usize,
}

/// Coherent DMA memory provider.
pub trait DmaAllocator {
    /// Allocate exactly `bytes` of coherent memory, or `None` when exhausted.
    fn alloc_coherent(&mut self, bytes: usize) -> Option<DmaRegion>;

    /// Return a region obtained from [`alloc_coherent`](Self::alloc_coherent).
    fn free_coherent(&mut self, region: DmaRegion);
}

/// An interrupt line dedicated to one stream.
///
/// `request` installs the handler with the line masked; the engine calls
/// `enable` only after a successful request.
pub trait IrqLine<'n, R> {
    type Error: Debug;

    /// Install `handler` for this line.
    fn request(&mut self, handler: PeriodHandler<'n, R>) -> Result<(), Self::Error>;

    /// Remove the handler. The line is masked first if still enabled.
    fn free(&mut self);

    fn enable(&mut self);

    fn disable(&mut self);
}

/// The host framework's routing graph.
pub trait PowerGraph {
    /// A mux control changed value; re-evaluate power along its routes.
    fn mux_update(&mut self, control: &'static str, selection: RoutingSelection);
}
