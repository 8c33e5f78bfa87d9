//! Timer-driven playback of an [`Mmu`].
//!
//! The player owns the simulator and is ticked by whatever clock the caller
//! has; [`Player::next_delay`] says how long to wait before the next tick.

use std::time::Duration;

use rand::{rngs::StdRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    page_loader::{PageLoader, SimulatedDisk},
    page_replacer::PageReplacer,
    Mmu, Result, StepReport,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Requests come from the caller only.
    #[default]
    Manual,
    /// A new random request starts whenever the previous one is done.
    Auto,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub step_delay_ms: u64,
    pub autoplay_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            step_delay_ms: 1000,
            autoplay_delay_ms: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Stepped(StepReport),
    Idle,
}

pub struct Player<REPLACER = Box<dyn PageReplacer>, LOADER = SimulatedDisk, RNG = StdRng> {
    mmu: Mmu<REPLACER, LOADER, RNG>,
    timing: Timing,
    mode: Mode,
}

impl<REPLACER, LOADER, RNG> Player<REPLACER, LOADER, RNG>
where
    REPLACER: PageReplacer,
    LOADER: PageLoader,
    RNG: RngCore,
{
    pub fn new(mmu: Mmu<REPLACER, LOADER, RNG>, timing: Timing, mode: Mode) -> Self {
        Player { mmu, timing, mode }
    }

    /// Runs one step, starting a new request first if auto-play is on and
    /// the simulator is idle.
    pub fn tick(&mut self) -> Result<Tick> {
        if !self.mmu.is_busy() {
            match self.mode {
                Mode::Auto => {
                    self.mmu.request_access(None)?;
                }
                Mode::Manual => return Ok(Tick::Idle),
            }
        }

        Ok(match self.mmu.advance_one_step()? {
            Some(report) => Tick::Stepped(report),
            None => Tick::Idle,
        })
    }

    pub fn next_delay(&self) -> Duration {
        match self.mode {
            Mode::Auto => Duration::from_millis(self.timing.autoplay_delay_ms),
            Mode::Manual => Duration::from_millis(self.timing.step_delay_ms),
        }
    }

    pub fn request(&mut self, vpn: Option<usize>) -> Result<bool> {
        self.mmu.request_access(vpn)
    }

    /// Switching modes never cuts a request short; turning auto-play off
    /// only stops the next one from starting.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn reset(&mut self) {
        self.mmu.reset();
    }

    pub fn mmu(&self) -> &Mmu<REPLACER, LOADER, RNG> {
        &self.mmu
    }
}
