//! DMA ring buffer management.
//!
//! A [`RingBuffer`] owns at most one [`AudioBuffer`] and programs the FIFO's
//! start/end/pointer registers for it. The hardware wraps from the last block
//! back to START on its own, so `end` is the address of the last block, not
//! one past the buffer.

use log::{debug, warn};

use crate::constants::DMA_ADDRESS_LIMIT;
use crate::error::{Error, Result};
use crate::hw::FifoLayout;
use crate::platform::{DmaAllocator, DmaRegion};
use crate::regs::RegisterAccess;

/// One DMA region bound to one stream.
#[derive(Debug, PartialEq, Eq)]
pub struct AudioBuffer {
    region: DmaRegion,
}

impl AudioBuffer {
    /// Allocate exactly `bytes` of DMA memory reachable by the FIFO.
    pub fn allocate<A: DmaAllocator>(alloc: &mut A, bytes: usize) -> Result<Self> {
        let region = alloc
            .alloc_coherent(bytes)
            .ok_or(Error::OutOfMemory { bytes })?;

        let last = region.dma_addr.saturating_add(bytes as u64);
        if last > DMA_ADDRESS_LIMIT {
            warn!("ring: region at {:#x} is outside the DMA window", region.dma_addr);
            let addr = region.dma_addr;
            alloc.free_coherent(region);
            return Err(Error::DmaAddressRange { addr });
        }

        Ok(AudioBuffer { region })
    }

    /// Device address as programmed into the 32-bit FIFO registers.
    pub fn dma_addr(&self) -> u32 {
        // Checked against DMA_ADDRESS_LIMIT in `allocate`.
        self.region.dma_addr as u32
    }

    pub fn cpu_addr(&self) -> *mut u8 {
        self.region.cpu_addr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.region.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.region.bytes == 0
    }
}

/// FIFO pointer registers plus the buffer bound to them.
#[derive(Debug)]
pub struct RingBuffer {
    layout: FifoLayout,
    block: usize,
    buffer: Option<AudioBuffer>,
    period_bytes: usize,
}

impl RingBuffer {
    pub const fn new(layout: FifoLayout, block: usize) -> Self {
        RingBuffer {
            layout,
            block,
            buffer: None,
            period_bytes: 0,
        }
    }

    pub fn buffer(&self) -> Option<&AudioBuffer> {
        self.buffer.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn period_bytes(&self) -> usize {
        self.period_bytes
    }

    /// Take ownership of `buffer` and point the FIFO at it.
    ///
    /// Sizes are validated against the channel before allocation; here they
    /// are only asserted.
    pub fn bind<R: RegisterAccess + ?Sized>(
        &mut self,
        regs: &R,
        buffer: AudioBuffer,
        period_bytes: usize,
    ) {
        debug_assert!(self.buffer.is_none());
        debug_assert!(buffer.len() >= self.block && buffer.len() % self.block == 0);
        debug_assert!(period_bytes >= self.block && period_bytes % self.block == 0);

        let start = buffer.dma_addr();
        let end = start + (buffer.len() - self.block) as u32;
        debug!("ring: bind {:#x}..{:#x}, period {}", start, end, period_bytes);

        regs.write(self.layout.start, start);
        regs.write(self.layout.end, end);
        regs.write(self.layout.ptr, start);
        self.layout
            .irq_blocks
            .write(regs, (period_bytes / self.block) as u32);

        self.buffer = Some(buffer);
        self.period_bytes = period_bytes;
        self.reset_pointers(regs);
    }

    /// Pulse INIT so the hardware reloads its pointer from START.
    pub fn reset_pointers<R: RegisterAccess + ?Sized>(&self, regs: &R) {
        let init = self.layout.init;
        regs.update_bits(self.layout.ctrl, init, init);
        regs.update_bits(self.layout.ctrl, init, 0);
    }

    /// Hardware position as a frame offset from the start of the buffer.
    ///
    /// Reads the pointer register directly, so the result does not depend on
    /// interrupt delivery. A pointer outside the bound buffer reads as 0.
    pub fn position<R: RegisterAccess + ?Sized>(&self, regs: &R, frame_bytes: usize) -> usize {
        let Some(buffer) = &self.buffer else {
            return 0;
        };
        if frame_bytes == 0 {
            return 0;
        }

        let start = buffer.dma_addr();
        let ptr = regs.read(self.layout.ptr);
        let offset = ptr.wrapping_sub(start) as usize;
        if ptr < start || offset >= buffer.len() {
            warn!("ring: pointer {:#x} outside {:#x}+{}", ptr, start, buffer.len());
            return 0;
        }

        offset / frame_bytes
    }

    /// Give the buffer back to `alloc`. Idempotent.
    pub fn release<A: DmaAllocator>(&mut self, alloc: &mut A) {
        if let Some(buffer) = self.buffer.take() {
            debug!("ring: release {} bytes", buffer.len());
            alloc.free_coherent(buffer.region);
        }
        self.period_bytes = 0;
    }
}
