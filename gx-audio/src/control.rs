//! Stream events delivered to external components.

/// Trigger command issued by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCmd {
    Start,
    Stop,
    PausePush,
    PauseRelease,
    Suspend,
    Resume,
}

impl TriggerCmd {
    /// `true` for commands that start data flowing (START, RESUME,
    /// PAUSE_RELEASE), `false` for those that stop it.
    pub const fn is_run(self) -> bool {
        matches!(
            self,
            TriggerCmd::Start | TriggerCmd::Resume | TriggerCmd::PauseRelease
        )
    }
}

/// Power transition of the routing widget a component sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    /// The widget has just been powered up.
    PostPowerUp,
    /// The widget has just been powered down.
    PostPowerDown,
}

/// Trait for external components (codec chips) that follow stream events.
///
/// Both hooks default to doing nothing; a component implements the ones it
/// cares about.
pub trait AudioControl {
    /// Error type for control operations.
    type Error;

    /// The component's routing widget changed power state.
    fn power_event(&mut self, event: PowerEvent) -> Result<(), Self::Error> {
        let _ = event;
        Ok(())
    }

    /// The stream the component is attached to was triggered.
    fn trigger(&mut self, cmd: TriggerCmd) -> Result<(), Self::Error> {
        let _ = cmd;
        Ok(())
    }
}
