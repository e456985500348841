//! This module describes the instrument attached to the adapter, in fixed structs validated at startup.

use enum_dispatch::enum_dispatch;
use measurements::Voltage;
use pocket_overture_lib::configuration::{PitchTable, VoiceMap};

/// Everything the firmware needs to know about the attached instrument: which notes it can voice
/// at what control voltage, how its voice inputs are assigned to MIDI channels, and the reference
/// against which pitch voltages are scaled.
///
/// Strictly speaking, this struct describes the combination of the instrument and the build that
/// drives it. The pitch table, for example, is a property of the particular row of voices this
/// device was calibrated against; a second build would carry its own measurements.
pub struct InstrumentConfig {
    /// Calibrated note-to-voltage table for the instrument's pitch CV input.
    pub pitch_table: PitchTable,
    /// How MIDI channels reach the instrument's voice inputs.
    pub voice_map: VoiceMap,
    /// The DAC's output at full code.
    pub full_scale: Voltage,
}

/// A trait for reading an instrument's configuration.
#[enum_dispatch(Instrument)]
pub trait Config {
    fn config(&self) -> &InstrumentConfig;
}
