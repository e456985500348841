//! The event-driven core of the device: deciding, note event by note event, what the gate
//! lines and the pitch DAC must do.

use crate::{
    configuration::{PitchTable, VoiceMap},
    dac,
    gate::GateCommand,
    midi_state::MidiState,
    note_event::NoteEvent,
};
use measurements::Voltage;

/// The hardware writes a single note event calls for.
///
/// Consumers should commit the DAC code before the gate level, so that a voice whose gate is
/// opening never sounds at a stale pitch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputUpdate {
    /// A new 12-bit code for the pitch CV DAC, when the event retunes it.
    pub dac: Option<u16>,
    /// A level change for one gate line, when the event requires one.
    pub gate: Option<GateCommand>,
}

/// Turns note events into voice-array writes, one [`handle`][Self::handle] call per event.
///
/// A `VoiceController` owns the [`MidiState`] it tracks held notes in; construct one per
/// device and feed it every note event in arrival order. Each call returns the writes that
/// event requires, which keeps gate transitions in step with input no matter how quickly
/// messages arrive.
pub struct VoiceController {
    state: MidiState,
    pitch_table: PitchTable,
    voice_map: VoiceMap,
    full_scale: Voltage,
}

impl VoiceController {
    /// Constructs a [`VoiceController`] for an instrument described by its pitch calibration,
    /// channel-to-voice assignment, and DAC full-scale voltage.
    pub fn new(pitch_table: PitchTable, voice_map: VoiceMap, full_scale: Voltage) -> Self {
        Self {
            state: MidiState::default(),
            pitch_table,
            voice_map,
            full_scale,
        }
    }

    /// Processes one note event, returning the hardware writes it requires.
    ///
    /// Held notes are tracked for every channel, but only events on channels the [`VoiceMap`]
    /// resolves produce writes. On a resolved channel:
    ///
    /// - A note beginning always reasserts the channel's gate, and retunes the shared pitch
    ///   CV when the note has a calibrated voltage. The newest note holds the pitch.
    /// - A note ending closes the gate only when it was the channel's last. The pitch CV is
    ///   left wherever it was, so releasing the newest note while an older one is held keeps
    ///   the older note sounding at the newer note's pitch.
    ///
    /// A NoteOn with velocity zero is handled as the release it conventionally means, whether
    /// or not the event was normalized upstream.
    pub fn handle(&mut self, event: NoteEvent) -> OutputUpdate {
        match event.normalized() {
            NoteEvent::On(channel, note, _velocity) => {
                self.state.note_on(channel, note);
                match self.voice_map.resolve(channel) {
                    Some(voice) => OutputUpdate {
                        dac: self
                            .pitch_table
                            .lookup(note)
                            .map(|voltage| dac::encode(voltage, self.full_scale)),
                        gate: Some(GateCommand::high(voice)),
                    },
                    None => OutputUpdate::default(),
                }
            }
            NoteEvent::Off(channel, note) => {
                let released_last = self.state.note_off(channel, note);
                match self.voice_map.resolve(channel) {
                    Some(voice) if released_last => OutputUpdate {
                        dac: None,
                        gate: Some(GateCommand::low(voice)),
                    },
                    _ => OutputUpdate::default(),
                }
            }
        }
    }

    /// Returns the held notes being tracked.
    pub fn state(&self) -> &MidiState {
        &self.state
    }
}
