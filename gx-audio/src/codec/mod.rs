//! External codec shims.
//!
//! Both supported parts need no register programming; the driver's only job
//! is one optional GPIO that follows stream events.
//!
//! | Codec | Direction | Pin | Follows |
//! |-------|-----------|-----|---------|
//! | [`Inmp441`] | capture, mono | enable | widget power (post power-up / down) |
//! | [`Pcm5102a`] | playback, stereo | mute | trigger (run / stop) |
//!
//! # Feature gate
//!
//! This module is available when the `codecs` feature is enabled (on by default).

mod inmp441;
mod pcm5102a;

pub use inmp441::{Inmp441, INMP441_DAI};
pub use pcm5102a::{Pcm5102a, PCM5102A_DAI};

use crate::hw::{Direction, Formats, RateRange};

/// Capabilities a codec advertises for its digital audio interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecDai {
    pub name: &'static str,
    pub stream_name: &'static str,
    pub direction: Direction,
    pub channels_min: u32,
    pub channels_max: u32,
    pub formats: Formats,
    pub rates: RateRange,
}
