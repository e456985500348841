//! Vocabulary for the gate lines wired into the voice array.

/// The two levels a gate line can take.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateState {
    /// When the gate is high, the voice will sound.
    High,
    /// When the gate is low, the voice will rest.
    Low,
}

/// A level change for a single gate line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateCommand {
    /// Index of the gate line to drive.
    pub voice: usize,
    /// The level the line should be set to.
    pub state: GateState,
}

impl GateCommand {
    /// Convenience constructor for an opening gate.
    pub fn high(voice: usize) -> Self {
        Self {
            voice,
            state: GateState::High,
        }
    }

    /// Convenience constructor for a closing gate.
    pub fn low(voice: usize) -> Self {
        Self {
            voice,
            state: GateState::Low,
        }
    }
}
