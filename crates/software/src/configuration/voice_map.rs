use wmidi::Channel;

/// The most voice inputs a single build can wire up, one per MIDI channel.
pub const MAX_VOICES: usize = 16;

/// Assigns MIDI channels to the voice array's physical inputs.
///
/// The assignment is the identity: channel 1 plays the first voice, channel 2 the second, and
/// so on through however many voices are wired. Channels beyond the last voice resolve to
/// nothing and the notes sent on them make no sound.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoiceMap {
    voice_count: usize,
}

impl VoiceMap {
    /// Constructs a [`VoiceMap`] for an array of `voice_count` wired inputs.
    ///
    /// Panics if `voice_count` exceeds [`MAX_VOICES`], since MIDI cannot address more channels
    /// than that.
    pub fn new(voice_count: usize) -> Self {
        assert!(
            voice_count <= MAX_VOICES,
            "A voice map cannot address more voices than there are MIDI channels"
        );
        Self { voice_count }
    }

    /// The number of voice inputs this map addresses.
    pub fn voice_count(&self) -> usize {
        self.voice_count
    }

    /// Returns the voice input assigned to a [`Channel`], or [`None`] for channels beyond the
    /// wired voices.
    pub fn resolve(&self, channel: Channel) -> Option<usize> {
        let voice = usize::from(channel.index());
        (voice < self.voice_count).then_some(voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_wired_channels_in_order() {
        let map = VoiceMap::new(15);
        assert_eq!(
            Some(0),
            map.resolve(Channel::Ch1),
            "Expected left but got right"
        );
        assert_eq!(
            Some(14),
            map.resolve(Channel::Ch15),
            "Expected left but got right"
        );
    }

    #[test]
    fn channels_beyond_the_wired_voices_resolve_to_nothing() {
        let map = VoiceMap::new(15);
        assert_eq!(
            None,
            map.resolve(Channel::Ch16),
            "Expected left but got right"
        );
    }

    #[test]
    fn a_full_complement_of_voices_uses_every_channel() {
        let map = VoiceMap::new(MAX_VOICES);
        assert_eq!(
            Some(15),
            map.resolve(Channel::Ch16),
            "Expected left but got right"
        );
    }

    #[test]
    fn reports_its_voice_count() {
        assert_eq!(15, VoiceMap::new(15).voice_count());
    }

    #[test]
    #[should_panic(expected = "more voices than there are MIDI channels")]
    fn rejects_more_voices_than_channels() {
        VoiceMap::new(MAX_VOICES + 1);
    }
}
