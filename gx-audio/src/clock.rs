//! Frame and bit clock divider calculation.
//!
//! The serializers run a fixed 64-bit frame, so for an oscillator `osc` and a
//! sample rate `rate`:
//!
//! ```text
//! fs = osc / rate        (must be exact and a multiple of 64)
//! bs = fs / 64           (bit clock divisor, at most 64)
//! ```
//!
//! The frame divider field gets `64 − 1`, the bit divider field `bs − 1`.
//!
//! Engines that share one divider (both AUDIN capture FIFOs hang off the
//! I2S-in divider) hold it through a [`SharedDivider`]: the first user
//! programs it, later users must agree on the plan, and the last one out
//! turns it off.

use core::sync::atomic::{AtomicU32, Ordering};

use log::{debug, error};

use crate::constants::{FRAME_BITS, MAX_BIT_CLOCK_DIVISOR};
use crate::error::{Error, Result};
use crate::hw::DividerLayout;
use crate::regs::RegisterAccess;

/// Divider values for one (oscillator, rate) pair.
///
/// `frame_divisor * bit_divisor * rate == osc` holds for every plan returned
/// by [`ClockPlan::compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockPlan {
    /// Bit clocks per frame.
    pub frame_divisor: u32,
    /// Oscillator cycles per bit clock.
    pub bit_divisor: u32,
}

impl ClockPlan {
    /// Compute the dividers for `rate` from `osc`. Pure; touches no registers.
    pub fn compute(osc: u32, rate: u32) -> Result<Self> {
        if osc == 0 || rate == 0 || osc % rate != 0 {
            error!("clock: {} Hz is not an integer multiple of {} Hz", osc, rate);
            return Err(Error::ClockConfiguration { osc, rate });
        }

        let fs = osc / rate;
        if fs % FRAME_BITS != 0 {
            error!("clock: oscillator rate {} is not a multiple of {}", fs, FRAME_BITS);
            return Err(Error::ClockConfiguration { osc, rate });
        }

        let bs = fs / FRAME_BITS;
        if bs > MAX_BIT_CLOCK_DIVISOR {
            error!("clock: bit clock divisor {} out of range", bs);
            return Err(Error::ClockRange {
                divisor: bs,
                max: MAX_BIT_CLOCK_DIVISOR,
            });
        }

        Ok(ClockPlan {
            frame_divisor: FRAME_BITS,
            bit_divisor: bs,
        })
    }

    /// Sample rate this plan produces from `osc`.
    pub const fn rate(&self, osc: u32) -> u32 {
        osc / (self.frame_divisor * self.bit_divisor)
    }

    /// Program the divider: disable, write both fields, enable.
    pub fn apply<R: RegisterAccess + ?Sized>(&self, regs: &R, layout: &DividerLayout) {
        disable(regs, layout);
        if let Some(pre) = layout.pre {
            pre.write(regs, 0);
        }
        layout.frame.write(regs, self.frame_divisor - 1);
        layout.bit.write(regs, self.bit_divisor - 1);
        layout.enable.set(regs);
    }
}

/// Stop the divider output.
pub fn disable<R: RegisterAccess + ?Sized>(regs: &R, layout: &DividerLayout) {
    layout.enable.clear(regs);
}

/// User count and active plan of one hardware divider.
///
/// Pass the same instance to every stream whose channel programs the same
/// divider. Claims and releases come from the control path, which the host
/// framework serializes.
pub struct SharedDivider {
    users: AtomicU32,
    // frame_divisor << 16 | bit_divisor, 0 when unused
    plan: AtomicU32,
}

impl SharedDivider {
    pub const fn new() -> Self {
        SharedDivider {
            users: AtomicU32::new(0),
            plan: AtomicU32::new(0),
        }
    }

    pub fn users(&self) -> u32 {
        self.users.load(Ordering::Acquire)
    }

    /// Plan the divider is currently running, if anyone holds it.
    pub fn plan(&self) -> Option<ClockPlan> {
        match self.plan.load(Ordering::Acquire) {
            0 => None,
            packed => Some(ClockPlan {
                frame_divisor: packed >> 16,
                bit_divisor: packed & 0xffff,
            }),
        }
    }

    /// Register a user that needs `plan`. Touches no registers.
    ///
    /// Returns `true` for the first user, who must then program the divider.
    /// A later user asking for a different plan is rejected with
    /// [`Error::ClockConfiguration`] and the running divider is left alone.
    pub fn claim(&self, plan: ClockPlan, osc: u32, rate: u32) -> Result<bool> {
        let packed = (plan.frame_divisor << 16) | plan.bit_divisor;
        if self
            .users
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.plan.store(packed, Ordering::Release);
            return Ok(true);
        }

        let current = self.plan.load(Ordering::Acquire);
        if current != packed {
            error!(
                "clock: divider busy at bit divisor {}, cannot run {} Hz from {} Hz",
                current & 0xffff,
                rate,
                osc
            );
            return Err(Error::ClockConfiguration { osc, rate });
        }
        let users = self.users.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("clock: divider shared by {} users", users);
        Ok(false)
    }

    /// Drop one user. Returns `true` when the last user left and the divider
    /// should be disabled.
    pub fn release(&self) -> bool {
        let prev = self
            .users
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match prev {
            Ok(1) => {
                self.plan.store(0, Ordering::Release);
                true
            }
            _ => false,
        }
    }
}

impl Default for SharedDivider {
    fn default() -> Self {
        Self::new()
    }
}
