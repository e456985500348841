use wmidi::{Channel, Note};

mod activated_notes;
pub use activated_notes::*;

/// The number of channels MIDI defines per port.
pub const CHANNEL_COUNT: usize = 16;

/// A straightforward representation of the note messages the device has received, kept per channel.
///
/// Notes are represented in a more convenient format than that in which they were received: when a note is
/// activated, it is added to its channel's list; when released, it is dropped from the list. As a result, the
/// state object does not explicitly persist data about NoteOff events, and a channel's gate level can be read
/// off directly as whether its list is non-empty.
///
/// Every channel's list exists for the life of the process. A channel nothing has ever played simply holds an
/// empty list.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiState {
    /// Holds a representation of the notes which are currently activated, one list per channel.
    channels: [ActivatedNotes; CHANNEL_COUNT],
}

impl Default for MidiState {
    fn default() -> Self {
        Self {
            channels: [ActivatedNotes::new(); CHANNEL_COUNT],
        }
    }
}

impl MidiState {
    /// Records a note as activated on a channel.
    ///
    /// Returns whether this was the channel's first activated note, i.e. whether its gate line should open.
    /// Re-activating a note that is already held changes nothing and reports no transition.
    pub fn note_on(&mut self, channel: Channel, note: Note) -> bool {
        self.channels[usize::from(channel.index())].add(note)
    }

    /// Records a note as released on a channel.
    ///
    /// Returns whether this was the channel's last activated note, i.e. whether its gate line should close.
    /// Releasing a note that was never activated changes nothing and reports no transition.
    pub fn note_off(&mut self, channel: Channel, note: Note) -> bool {
        self.channels[usize::from(channel.index())].remove(note)
    }

    /// Returns the [`ActivatedNotes`] held on a channel.
    pub fn notes(&self, channel: Channel) -> &ActivatedNotes {
        &self.channels[usize::from(channel.index())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_channels_start_empty() {
        let state = MidiState::default();
        for index in 0..CHANNEL_COUNT {
            let channel = Channel::from_index(index as u8).expect("index should be in range");
            assert!(state.notes(channel).is_empty());
        }
    }

    #[test]
    fn tracks_notes_on_their_own_channel() {
        let mut state = MidiState::default();
        state.note_on(Channel::Ch1, Note::C2);

        assert!(state.notes(Channel::Ch1).contains(Note::C2));
        assert!(
            state.notes(Channel::Ch2).is_empty(),
            "Expected other channels to be unaffected"
        );
    }

    #[test]
    fn note_off_only_touches_its_own_channel() {
        let mut state = MidiState::default();
        state.note_on(Channel::Ch1, Note::C2);
        state.note_on(Channel::Ch2, Note::C2);

        state.note_off(Channel::Ch1, Note::C2);

        assert!(state.notes(Channel::Ch1).is_empty());
        assert!(state.notes(Channel::Ch2).contains(Note::C2));
    }

    #[test]
    fn reports_gate_transitions_per_channel() {
        let mut state = MidiState::default();

        assert!(state.note_on(Channel::Ch1, Note::C2), "First note");
        assert!(!state.note_on(Channel::Ch1, Note::D2), "Second note");
        assert!(
            state.note_on(Channel::Ch2, Note::C2),
            "First note of another channel"
        );

        assert!(!state.note_off(Channel::Ch1, Note::C2), "One note remains");
        assert!(state.note_off(Channel::Ch1, Note::D2), "Last note released");
    }

    #[test]
    fn reactivating_a_held_note_is_idempotent() {
        let mut state = MidiState::default();
        state.note_on(Channel::Ch1, Note::C2);
        state.note_on(Channel::Ch1, Note::C2);

        assert!(
            state.note_off(Channel::Ch1, Note::C2),
            "Expected a single release to empty the channel"
        );
    }

    #[test]
    fn releasing_an_untracked_note_changes_nothing() {
        let mut state = MidiState::default();
        state.note_on(Channel::Ch1, Note::C2);

        assert!(!state.note_off(Channel::Ch1, Note::D2));
        assert!(state.notes(Channel::Ch1).contains(Note::C2));
    }
}
