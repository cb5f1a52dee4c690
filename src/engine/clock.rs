use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Time is frozen and every block renders silence.
    Suspended,
    Running,
    /// Shut down for good; cannot be resumed.
    Closed,
}

/// Frame counter that defines "now" for everything the engine schedules.
///
/// Time only moves while the clock runs, one rendered block at a time, so a
/// step scheduled at `t` lands on the same frame however late the control
/// side got to it.
#[derive(Debug, Clone)]
pub struct AudioClock {
    sample_rate: f32,
    frames: u64,
    state: ClockState,
}

impl AudioClock {
    pub fn new(sample_rate: f32, suspended: bool) -> Self {
        Self {
            sample_rate,
            frames: 0,
            state: if suspended {
                ClockState::Suspended
            } else {
                ClockState::Running
            },
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Seconds rendered so far.
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            ClockState::Closed => Err(EngineError::ClockClosed),
            ClockState::Suspended => {
                log::debug!("audio clock resumed at {:.3}s", self.now());
                self.state = ClockState::Running;
                Ok(())
            }
            ClockState::Running => Ok(()),
        }
    }

    pub fn suspend(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Suspended;
        }
    }

    pub fn close(&mut self) {
        self.state = ClockState::Closed;
    }

    /// Count `frames` as rendered. Ignored unless running.
    pub fn advance(&mut self, frames: usize) {
        if self.is_running() {
            self.frames += frames as u64;
        }
    }
}
