//! Stream lifecycle: one direction on one hardware FIFO.
//!
//! A [`Stream`] sequences the divider, the ring buffer, the front end and the
//! interrupt line through the lifecycle the host framework drives:
//!
//! | Call | From | To |
//! |------|------|----|
//! | `open` | Closed | Open |
//! | `hw_params` | Open, Configured, Prepared | Configured |
//! | `hw_free` | Open, Configured, Prepared | Open |
//! | `prepare` | Configured, Prepared, Paused | Prepared |
//! | `trigger(Start)` | Prepared | Running |
//! | `trigger(PausePush \| Suspend)` | Running | Paused |
//! | `trigger(PauseRelease \| Resume)` | Paused | Running |
//! | `trigger(Stop)` | Running, Paused | Prepared |
//! | `close` | any but Closed | Closed |
//!
//! `close` unwinds whatever is in place. Calls made in the wrong state fail with
//! [`Error::InvalidStateTransition`] and change nothing. `Stop` re-issues the
//! pointer-reset pulse, so every `Start` begins at the top of the buffer.
//!
//! The divider is held through a [`SharedDivider`]. Streams whose channels
//! program the same divider (`TODDR0` and `TODDR1`) must be given the same
//! instance; one of them stopping or reconfiguring never disturbs the other.
//!
//! The interrupt handler is registered on `open` with its source disabled, and
//! the source is only enabled by a run trigger. On teardown the source is
//! disabled and the handler removed before the buffer goes back to the
//! allocator.

mod frontend;


use log::{debug, error};

use crate::clock::{self, ClockPlan, SharedDivider};
use crate::control::TriggerCmd;
use crate::error::{Error, Resource, Result};
use crate::hw::{HardwareChannel, HwParams};
use crate::notify::{PeriodChannel, PeriodHandler};
use crate::platform::{ClockSource, DmaAllocator, IrqLine};
use crate::regs::RegisterAccess;
use crate::ring::{AudioBuffer, RingBuffer};

/// Lifecycle state of a [`Stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Closed,
    /// Clocks on, interrupt handler registered, source disabled.
    Open,
    /// Parameters accepted, divider running, buffer bound.
    Configured,
    /// FIFO control initialized, pointer reset.
    Prepared,
    /// Data flowing, interrupt source enabled.
    Running,
    /// FIFO stopped, handler still registered, buffer still bound.
    Paused,
}

/// Direction argument of [`Stream::set_sysclk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockDirection {
    /// The clock is an input to the block; nothing to do.
    In,
    /// The block drives the clock.
    Out,
}

/// One streaming engine instance.
///
/// Owns its register handle, master clock, DMA allocator and interrupt line.
/// `events` is shared with the interrupt handler and belongs to this stream
/// alone while it is open; `divider` is shared with every stream on the same
/// divider.
pub struct Stream<'n, R, C, A, I>
where
    R: RegisterAccess + Clone,
    C: ClockSource,
    A: DmaAllocator,
    I: IrqLine<'n, R>,
{
    channel: &'static HardwareChannel,
    regs: R,
    clock: C,
    alloc: A,
    irq: I,
    events: &'n PeriodChannel,
    divider: &'n SharedDivider,
    ring: RingBuffer,
    state: StreamState,
    params: Option<HwParams>,
    plan: Option<ClockPlan>,
}

impl<'n, R, C, A, I> Stream<'n, R, C, A, I>
where
    R: RegisterAccess + Clone,
    C: ClockSource,
    A: DmaAllocator,
    I: IrqLine<'n, R>,
{
    /// Build a closed stream. Nothing is touched until [`open`](Self::open).
    pub fn new(
        channel: &'static HardwareChannel,
        regs: R,
        clock: C,
        alloc: A,
        irq: I,
        events: &'n PeriodChannel,
        divider: &'n SharedDivider,
    ) -> Self {
        Stream {
            channel,
            regs,
            clock,
            alloc,
            irq,
            events,
            divider,
            ring: RingBuffer::new(channel.fifo, channel.fifo_block),
            state: StreamState::Closed,
            params: None,
            plan: None,
        }
    }

    pub fn channel(&self) -> &'static HardwareChannel {
        self.channel
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn params(&self) -> Option<&HwParams> {
        self.params.as_ref()
    }

    pub fn clock_plan(&self) -> Option<&ClockPlan> {
        self.plan.as_ref()
    }

    pub fn buffer(&self) -> Option<&AudioBuffer> {
        self.ring.buffer()
    }

    pub fn events(&self) -> &'n PeriodChannel {
        self.events
    }

    fn check_state(&self, op: &'static str, allowed: &[StreamState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            error!("{}: {} while {:?}", self.channel.name, op, self.state);
            Err(Error::InvalidStateTransition {
                from: self.state,
                op,
            })
        }
    }

    /// Claim the event channel, enable the master clock and register the
    /// interrupt handler.
    pub fn open(&mut self) -> Result<()> {
        self.check_state("open", &[StreamState::Closed])?;
        debug!("{}: open", self.channel.name);

        if !self.events.claim() {
            error!("{}: period channel is in use by another stream", self.channel.name);
            return Err(Error::PlatformResource(Resource::EventChannel));
        }

        if let Err(e) = self.clock.prepare_enable() {
            error!("{}: failed to enable clock: {:?}", self.channel.name, e);
            self.events.unclaim();
            return Err(Error::PlatformResource(Resource::Clock));
        }

        self.disable_source();
        let fifo = self.channel.fifo;
        let handler = PeriodHandler::new(self.events, self.regs.clone(), fifo.irq_status);
        if let Err(e) = self.irq.request(handler) {
            error!("{}: failed to request irq: {:?}", self.channel.name, e);
            self.clock.disable_unprepare();
            self.events.unclaim();
            return Err(Error::InterruptRegistrationFailure);
        }

        self.state = StreamState::Open;
        Ok(())
    }

    /// Retune the master clock. Only clock id 0 exists; an input clock needs
    /// no programming.
    pub fn set_sysclk(&mut self, clk_id: u32, freq: u32, dir: ClockDirection) -> Result<()> {
        self.check_state("set_sysclk", &[StreamState::Open])?;
        if clk_id != 0 {
            error!("{}: invalid clock id {}", self.channel.name, clk_id);
            return Err(Error::UnsupportedClockId(clk_id));
        }
        if dir == ClockDirection::In {
            return Ok(());
        }

        debug!("{}: sysclk {} Hz", self.channel.name, freq);
        self.clock.set_rate(freq).map_err(|e| {
            error!("{}: failed to set sysclk to {}: {:?}", self.channel.name, freq, e);
            Error::PlatformResource(Resource::ClockRate)
        })
    }

    /// Validate `params`, program the divider and front end, and bind a
    /// freshly allocated buffer.
    ///
    /// Re-issuing from `Configured`/`Prepared` drops the previous
    /// configuration first, which disables the divider if this stream was its
    /// only user. On failure the stream is left `Open` with nothing held; a
    /// failure from `Open` writes no registers at all.
    ///
    /// When another stream already runs the shared divider, `params.rate` must
    /// produce the same plan or the call fails with
    /// [`Error::ClockConfiguration`].
    pub fn hw_params(&mut self, params: HwParams) -> Result<()> {
        self.check_state(
            "hw_params",
            &[StreamState::Open, StreamState::Configured, StreamState::Prepared],
        )?;
        debug!(
            "{}: hw_params {} Hz, {} ch, {:?}, {}/{}",
            self.channel.name,
            params.rate,
            params.channels,
            params.format,
            params.buffer_bytes,
            params.period_bytes
        );

        if self.state != StreamState::Open {
            self.unconfigure();
        }

        self.channel.validate(&params)?;
        let osc = self.clock.rate();
        let plan = ClockPlan::compute(osc, params.rate)?;
        let first = self.divider.claim(plan, osc, params.rate)?;
        let buffer = match AudioBuffer::allocate(&mut self.alloc, params.buffer_bytes) {
            Ok(buffer) => buffer,
            Err(e) => {
                // Nothing was programmed yet
                self.divider.release();
                return Err(e);
            }
        };

        frontend::configure(&self.regs, self.channel, &params);
        if first {
            plan.apply(&self.regs, &self.channel.divider);
        }
        self.ring.bind(&self.regs, buffer, params.period_bytes);

        self.params = Some(params);
        self.plan = Some(plan);
        self.state = StreamState::Configured;
        Ok(())
    }

    /// Stop the divider and release the buffer.
    pub fn hw_free(&mut self) -> Result<()> {
        self.check_state(
            "hw_free",
            &[StreamState::Open, StreamState::Configured, StreamState::Prepared],
        )?;
        debug!("{}: hw_free", self.channel.name);
        self.unconfigure();
        Ok(())
    }

    fn unconfigure(&mut self) {
        self.release_divider();
        self.ring.release(&mut self.alloc);
        self.params = None;
        self.state = StreamState::Open;
    }

    fn release_divider(&mut self) {
        if self.plan.take().is_some() && self.divider.release() {
            clock::disable(&self.regs, &self.channel.divider);
        }
    }

    /// Initialize the FIFO control register and reset the hardware pointer.
    ///
    /// Can be repeated; only the pointer-reset pulse is re-issued.
    pub fn prepare(&mut self) -> Result<()> {
        self.check_state(
            "prepare",
            &[StreamState::Configured, StreamState::Prepared, StreamState::Paused],
        )?;
        let Some(params) = self.params else {
            return Err(Error::InvalidStateTransition {
                from: self.state,
                op: "prepare",
            });
        };
        debug!("{}: prepare", self.channel.name);

        if self.state == StreamState::Paused {
            self.halt();
        }

        let fifo = self.channel.fifo;
        let mode = if params.physical_width() == 16 {
            fifo.mode_16bit
        } else {
            0
        };
        self.regs.update_bits(fifo.ctrl, fifo.ctrl_reset_mask(), mode);
        self.ring.reset_pointers(&self.regs);
        self.events.clear();

        self.state = StreamState::Prepared;
        Ok(())
    }

    /// Start, stop, pause or resume data flow.
    ///
    /// `Stop` rewinds the hardware pointer; events reported before it stay
    /// queued until the next `prepare` or `Start`.
    pub fn trigger(&mut self, cmd: TriggerCmd) -> Result<()> {
        let allowed: &[StreamState] = match cmd {
            TriggerCmd::Start => &[StreamState::Prepared],
            TriggerCmd::Resume | TriggerCmd::PauseRelease => &[StreamState::Paused],
            TriggerCmd::PausePush | TriggerCmd::Suspend => &[StreamState::Running],
            TriggerCmd::Stop => &[StreamState::Running, StreamState::Paused],
        };
        self.check_state("trigger", allowed)?;
        let next = match cmd {
            TriggerCmd::Start | TriggerCmd::Resume | TriggerCmd::PauseRelease => {
                StreamState::Running
            }
            TriggerCmd::PausePush | TriggerCmd::Suspend => StreamState::Paused,
            TriggerCmd::Stop => StreamState::Prepared,
        };
        debug!("{}: trigger {:?}", self.channel.name, cmd);

        match cmd {
            TriggerCmd::Start => {
                self.events.clear();
                self.run();
            }
            TriggerCmd::Stop => {
                self.halt();
                self.ring.reset_pointers(&self.regs);
            }
            _ if cmd.is_run() => self.run(),
            _ => self.halt(),
        }
        self.state = next;
        Ok(())
    }

    fn run(&mut self) {
        let fifo = self.channel.fifo;
        self.events.set_active(true);
        self.regs.update_bits(fifo.ctrl, fifo.run, fifo.run);
        if let Some(enable) = fifo.irq_enable {
            enable.set(&self.regs);
        }
        self.irq.enable();
        frontend::release(&self.regs, self.channel);
    }

    fn halt(&mut self) {
        let fifo = self.channel.fifo;
        frontend::hold(&self.regs, self.channel);
        self.disable_source();
        self.regs.update_bits(fifo.ctrl, fifo.run, 0);
        self.events.set_active(false);
    }

    fn disable_source(&mut self) {
        self.irq.disable();
        if let Some(enable) = self.channel.fifo.irq_enable {
            enable.clear(&self.regs);
        }
    }

    /// Hardware position in frames from the start of the buffer.
    pub fn pointer(&self) -> Result<usize> {
        self.check_state(
            "pointer",
            &[
                StreamState::Configured,
                StreamState::Prepared,
                StreamState::Running,
                StreamState::Paused,
            ],
        )?;
        let frame_bytes = self.params.map_or(0, |p| p.frame_bytes());
        Ok(self.ring.position(&self.regs, frame_bytes))
    }

    /// Consume pending period notifications and return how many there were.
    pub fn take_periods(&mut self) -> usize {
        self.events.drain()
    }

    /// Tear the stream down from any state after `Open`.
    pub fn close(&mut self) -> Result<()> {
        self.check_state(
            "close",
            &[
                StreamState::Open,
                StreamState::Configured,
                StreamState::Prepared,
                StreamState::Running,
                StreamState::Paused,
            ],
        )?;
        debug!("{}: close from {:?}", self.channel.name, self.state);

        self.halt();
        self.irq.free();
        self.release_divider();
        self.ring.release(&mut self.alloc);
        self.clock.disable_unprepare();
        self.events.unclaim();

        self.params = None;
        self.state = StreamState::Closed;
        Ok(())
    }
}

impl<'n, R, C, A, I> Drop for Stream<'n, R, C, A, I>
where
    R: RegisterAccess + Clone,
    C: ClockSource,
    A: DmaAllocator,
    I: IrqLine<'n, R>,
{
    fn drop(&mut self) {
        if self.state != StreamState::Closed {
            let _ = self.close();
        }
    }
}
