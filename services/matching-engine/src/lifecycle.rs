//! Engine lifecycle state
//!
//! While halted, place commands are rejected outright: nothing is queued,
//! nothing is admitted, no events fire. Queries keep serving current state.
//! Start restores normal processing with no carry-over from the halted
//! period.

use tracing::info;

/// Running/halted lifecycle flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Running,
    Halted,
}

impl EngineState {
    pub fn is_running(&self) -> bool {
        matches!(self, EngineState::Running)
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, EngineState::Halted)
    }

    /// Stop accepting orders; takes effect on receipt
    pub fn halt(&mut self) {
        if self.is_running() {
            info!("engine halted");
        }
        *self = EngineState::Halted;
    }

    /// Resume accepting orders; takes effect on receipt
    pub fn start(&mut self) {
        if self.is_halted() {
            info!("engine started");
        }
        *self = EngineState::Running;
    }
}
