//! PCM5102A stereo DAC.
//!
//! The optional XSMT line is active low: driven low at construction, released
//! (high) when playback starts and pulled low again when it stops.

use embedded_hal::digital::OutputPin;
use log::debug;

use super::CodecDai;
use crate::control::{AudioControl, TriggerCmd};
use crate::hw::{Direction, Formats, RateRange};

pub static PCM5102A_DAI: CodecDai = CodecDai {
    name: "pcm5102a",
    stream_name: "Playback",
    direction: Direction::Playback,
    channels_min: 2,
    channels_max: 2,
    formats: Formats::S16_LE.union(Formats::S24_LE).union(Formats::S32_LE),
    rates: RateRange {
        min: 8_000,
        max: 192_000,
    },
};

pub struct Pcm5102a<P> {
    mute: Option<P>,
}

impl<P: OutputPin> Pcm5102a<P> {
    /// Take the (optional) mute pin and drive it low (muted).
    pub fn new(mut mute: Option<P>) -> Result<Self, P::Error> {
        if let Some(pin) = mute.as_mut() {
            pin.set_low()?;
        }
        Ok(Pcm5102a { mute })
    }

    pub fn dai(&self) -> &'static CodecDai {
        &PCM5102A_DAI
    }

    pub fn release(self) -> Option<P> {
        self.mute
    }
}

impl<P: OutputPin> AudioControl for Pcm5102a<P> {
    type Error = P::Error;

    fn trigger(&mut self, cmd: TriggerCmd) -> Result<(), P::Error> {
        let Some(pin) = self.mute.as_mut() else {
            return Ok(());
        };
        debug!("pcm5102a: {:?}", cmd);
        if cmd.is_run() {
            pin.set_high()
        } else {
            pin.set_low()
        }
    }
}
