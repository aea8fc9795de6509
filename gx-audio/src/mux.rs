//! Capture source routing.
//!
//! Each TODDR FIFO selects its input from one of the AUDIN sources through a
//! register field. The selection is exposed as an enumerated control; changing
//! it tells the host routing graph to re-evaluate power along the new path.

use log::{debug, error};

use crate::error::{Error, Result};
use crate::hw::{HardwareChannel, MuxLayout};
use crate::platform::PowerGraph;
use crate::regs::RegisterAccess;

/// Capture source. The discriminant is the selector field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RoutingSelection {
    Spdif = 0,
    I2s = 1,
    Pcm = 2,
}

impl RoutingSelection {
    pub const ALL: [RoutingSelection; 3] = [
        RoutingSelection::Spdif,
        RoutingSelection::I2s,
        RoutingSelection::Pcm,
    ];

    /// Control texts, indexed by field value.
    pub const TEXTS: [&'static str; 3] = ["SPDIF", "I2S", "PCM"];

    pub const fn name(self) -> &'static str {
        Self::TEXTS[self as usize]
    }

    pub const fn index(self) -> u32 {
        self as u32
    }

    pub const fn from_index(value: u32) -> Option<Self> {
        match value {
            0 => Some(RoutingSelection::Spdif),
            1 => Some(RoutingSelection::I2s),
            2 => Some(RoutingSelection::Pcm),
            _ => None,
        }
    }
}

/// Enumerated control descriptor handed to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumControl {
    pub name: &'static str,
    pub texts: &'static [&'static str],
}

/// Source selector of one capture FIFO.
pub struct RoutingMux<R, G> {
    regs: R,
    layout: MuxLayout,
    graph: G,
}

impl<R: RegisterAccess, G: PowerGraph> RoutingMux<R, G> {
    /// `None` if `channel` has no source selector.
    pub fn new(regs: R, channel: &'static HardwareChannel, graph: G) -> Option<Self> {
        let layout = channel.mux?;
        Some(RoutingMux {
            regs,
            layout,
            graph,
        })
    }

    pub fn control(&self) -> EnumControl {
        EnumControl {
            name: self.layout.name,
            texts: &RoutingSelection::TEXTS,
        }
    }

    /// Current selection, read back from the hardware.
    pub fn get(&self) -> Result<RoutingSelection> {
        let value = self.layout.field.read(&self.regs);
        RoutingSelection::from_index(value).ok_or_else(|| {
            error!("{}: selector holds {}", self.layout.name, value);
            Error::InvalidRoutingValue(value)
        })
    }

    /// Select `selection`. Returns `true` if the value changed.
    ///
    /// A put of the current value touches neither the register nor the graph.
    pub fn put(&mut self, selection: RoutingSelection) -> Result<bool> {
        let field = self.layout.field;
        let current = field.read(&self.regs);
        if current == selection.index() {
            return Ok(false);
        }

        debug!("{}: {}", self.layout.name, selection.name());
        field.write(&self.regs, selection.index());
        self.graph.mux_update(self.layout.name, selection);
        Ok(true)
    }

    /// Control put by raw enumeration index.
    pub fn put_index(&mut self, index: u32) -> Result<bool> {
        let selection =
            RoutingSelection::from_index(index).ok_or(Error::InvalidRoutingValue(index))?;
        self.put(selection)
    }

    pub fn release(self) -> (R, G) {
        (self.regs, self.graph)
    }
}
