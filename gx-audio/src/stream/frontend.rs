//! Serializer front ends: the blocks between the FIFO and the pins.
//!
//! | Front end | `configure` | `release` / `hold` |
//! |-----------|-------------|--------------------|
//! | AIU I2S | soft reset, sync, source descriptor, channel masks | clear / set HOLD_EN |
//! | AUDIN | channel count in the FIFO control register | nothing (FIFO enable bits gate it) |

use log::debug;

use crate::hw::{FrontEnd, HardwareChannel, HwParams};
use crate::regs::aiu::{self, I2sMisc, RstSoft, SourceDesc};
use crate::regs::RegisterAccess;

/// Source descriptor bits for `params`.
pub(crate) fn source_desc(params: &HwParams) -> SourceDesc {
    let mut desc = SourceDesc::MODE_SPLIT;
    if params.physical_width() == 32 {
        desc |= SourceDesc::MODE_24BIT | SourceDesc::MODE_32BIT;
    }
    if params.channels == 8 {
        desc |= SourceDesc::MODE_8CH;
    }
    desc
}

/// Program the front end for `params`. Leaves the output held.
pub(crate) fn configure<R: RegisterAccess + ?Sized>(
    regs: &R,
    channel: &HardwareChannel,
    params: &HwParams,
) {
    match channel.front_end {
        FrontEnd::AiuI2s => {
            hold(regs, channel);
            regs.write(aiu::AIU_RST_SOFT, RstSoft::I2S_FAST.bits());
            // The read latches the encoder out of reset.
            let _ = regs.read(aiu::AIU_I2S_SYNC);

            let desc = source_desc(params);
            debug!("{}: source desc {:?}", channel.name, desc);
            regs.update_bits(aiu::AIU_I2S_SOURCE_DESC, SourceDesc::all().bits(), desc.bits());

            aiu::MEM_I2S_MASKS_CH_MEM.set(regs);
            aiu::MEM_I2S_MASKS_CH_RD.set(regs);
        }
        FrontEnd::Audin { chan } => {
            chan.write(regs, params.channels);
        }
    }
}

/// Let samples flow to the pins.
pub(crate) fn release<R: RegisterAccess + ?Sized>(regs: &R, channel: &HardwareChannel) {
    if let FrontEnd::AiuI2s = channel.front_end {
        regs.update_bits(aiu::AIU_I2S_MISC, I2sMisc::HOLD_EN.bits(), 0);
    }
}

/// Stop the serializer from consuming samples.
pub(crate) fn hold<R: RegisterAccess + ?Sized>(regs: &R, channel: &HardwareChannel) {
    if let FrontEnd::AiuI2s = channel.front_end {
        let hold = I2sMisc::HOLD_EN.bits();
        regs.update_bits(aiu::AIU_I2S_MISC, hold, hold);
    }
}
