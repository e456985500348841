//! A closed vocabulary for the only MIDI messages this device acts on.

use wmidi::{Channel, MidiMessage, Note, Velocity};

/// A note beginning or ending on a channel.
///
/// [`MidiMessage`] is far wider than this device's behavior; narrowing to `NoteEvent` at the
/// decode boundary lets everything downstream match exhaustively. The MIDI convention that a
/// NoteOn with velocity zero means NoteOff is applied during the narrowing, so an `On` value
/// normally carries a sounding velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoteEvent {
    /// A note has been struck on a channel.
    On(Channel, Note, Velocity),
    /// A note has been released on a channel.
    Off(Channel, Note),
}

impl NoteEvent {
    /// Extracts the note event carried by a [`MidiMessage`], if any.
    ///
    /// Velocity-zero NoteOns come back as [`NoteEvent::Off`]. Messages other than NoteOn and
    /// NoteOff carry no note event.
    pub fn from_midi(message: &MidiMessage) -> Option<Self> {
        match message {
            MidiMessage::NoteOn(channel, note, velocity) => {
                Some(Self::On(*channel, *note, *velocity).normalized())
            }
            MidiMessage::NoteOff(channel, note, _velocity) => Some(Self::Off(*channel, *note)),
            _ => None,
        }
    }

    /// Applies the MIDI convention that a NoteOn with velocity zero is a release.
    pub fn normalized(self) -> Self {
        match self {
            Self::On(channel, note, velocity) if u8::from(velocity) == 0 => {
                Self::Off(channel, note)
            }
            other => other,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NoteEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::On(channel, note, velocity) => defmt::write!(
                fmt,
                "NoteOn: channel {}, note {}, velocity {}",
                channel.number(),
                note.to_str(),
                u8::from(*velocity)
            ),
            Self::Off(channel, note) => defmt::write!(
                fmt,
                "NoteOff: channel {}, note {}",
                channel.number(),
                note.to_str()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmidi::{ControlFunction, U7};

    const MEZZO_FORTE: Velocity = U7::from_u8_lossy(64);

    #[test]
    fn extracts_a_note_on() {
        let message = MidiMessage::NoteOn(Channel::Ch1, Note::C2, MEZZO_FORTE);
        assert_eq!(
            Some(NoteEvent::On(Channel::Ch1, Note::C2, MEZZO_FORTE)),
            NoteEvent::from_midi(&message),
            "Expected left but got right"
        );
    }

    #[test]
    fn extracts_a_note_off() {
        let message = MidiMessage::NoteOff(Channel::Ch1, Note::C2, MEZZO_FORTE);
        assert_eq!(
            Some(NoteEvent::Off(Channel::Ch1, Note::C2)),
            NoteEvent::from_midi(&message),
            "Expected left but got right"
        );
    }

    #[test]
    fn a_silent_note_on_is_a_release() {
        let message = MidiMessage::NoteOn(Channel::Ch1, Note::C2, U7::from_u8_lossy(0));
        assert_eq!(
            Some(NoteEvent::Off(Channel::Ch1, Note::C2)),
            NoteEvent::from_midi(&message),
            "Expected left but got right"
        );
    }

    #[test]
    fn other_messages_carry_no_note_event() {
        let message = MidiMessage::ControlChange(
            Channel::Ch1,
            ControlFunction::PORTAMENTO_TIME,
            U7::from_u8_lossy(10),
        );
        assert_eq!(
            None,
            NoteEvent::from_midi(&message),
            "Expected left but got right"
        );
    }

    #[test]
    fn normalization_leaves_sounding_notes_alone() {
        let event = NoteEvent::On(Channel::Ch1, Note::C2, MEZZO_FORTE);
        assert_eq!(event, event.normalized(), "Expected left but got right");
    }
}
