//! INMP441 I2S MEMS microphone.
//!
//! The optional enable line is driven low at construction, high once the
//! capture widget has powered up and low again after it has powered down.

use embedded_hal::digital::OutputPin;
use log::debug;

use super::CodecDai;
use crate::control::{AudioControl, PowerEvent};
use crate::hw::{Direction, Formats, RateRange};

/// DAI capabilities. The microphone follows whatever bit clock it gets.
pub static INMP441_DAI: CodecDai = CodecDai {
    name: "INMP441",
    stream_name: "Capture",
    direction: Direction::Capture,
    channels_min: 1,
    channels_max: 1,
    formats: Formats::S16_LE.union(Formats::S24_LE),
    rates: RateRange {
        min: 1,
        max: u32::MAX,
    },
};

pub struct Inmp441<P> {
    enable: Option<P>,
}

impl<P: OutputPin> Inmp441<P> {
    /// Take the (optional) enable pin and drive it low.
    pub fn new(mut enable: Option<P>) -> Result<Self, P::Error> {
        if let Some(pin) = enable.as_mut() {
            pin.set_low()?;
        }
        Ok(Inmp441 { enable })
    }

    pub fn dai(&self) -> &'static CodecDai {
        &INMP441_DAI
    }

    /// Give back the pin.
    pub fn release(self) -> Option<P> {
        self.enable
    }
}

impl<P: OutputPin> AudioControl for Inmp441<P> {
    type Error = P::Error;

    fn power_event(&mut self, event: PowerEvent) -> Result<(), P::Error> {
        let Some(pin) = self.enable.as_mut() else {
            return Ok(());
        };
        debug!("inmp441: {:?}", event);
        match event {
            PowerEvent::PostPowerUp => pin.set_high(),
            PowerEvent::PostPowerDown => pin.set_low(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::TriggerCmd;
    use crate::testing::MockPin;

    #[test]
    fn new_drives_enable_low() {
        let pin = MockPin::new();
        let _mic = Inmp441::new(Some(&pin)).unwrap();
        assert_eq!(pin.level(), Some(false));
    }

    #[test]
    fn enable_follows_power() {
        let pin = MockPin::new();
        let mut mic = Inmp441::new(Some(&pin)).unwrap();

        mic.power_event(PowerEvent::PostPowerUp).unwrap();
        assert_eq!(pin.level(), Some(true));
        mic.power_event(PowerEvent::PostPowerDown).unwrap();
        assert_eq!(pin.level(), Some(false));
    }

    #[test]
    fn triggers_do_not_touch_the_pin() {
        let pin = MockPin::new();
        let mut mic = Inmp441::new(Some(&pin)).unwrap();
        mic.trigger(TriggerCmd::Start).unwrap();
        mic.trigger(TriggerCmd::Stop).unwrap();
        assert_eq!(pin.sets(), 1);
    }

    #[test]
    fn absent_pin_is_not_an_error() {
        let mut mic = Inmp441::<&MockPin>::new(None).unwrap();
        assert!(mic.power_event(PowerEvent::PostPowerUp).is_ok());
        assert!(mic.release().is_none());
    }

    #[test]
    fn pin_error_propagates() {
        let pin = MockPin::new();
        let mut mic = Inmp441::new(Some(&pin)).unwrap();
        pin.fail();
        assert!(mic.power_event(PowerEvent::PostPowerUp).is_err());
    }

    #[test]
    fn advertises_mono_capture() {
        assert_eq!(INMP441_DAI.direction, Direction::Capture);
        assert_eq!((INMP441_DAI.channels_min, INMP441_DAI.channels_max), (1, 1));
        assert!(INMP441_DAI.formats.contains(Formats::S24_LE));
        assert!(!INMP441_DAI.formats.contains(Formats::S32_LE));
    }
}
