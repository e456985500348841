//! Unpacking of USB-MIDI Event Packets into MIDI messages.

use wmidi::MidiMessage;

/// Construct MIDI messages from data assumed to be USB-MIDI Event Packets.
///
/// Given bytes, returns an iterator over the MIDI messages therein. Undersized trailing chunks
/// and packets that do not decode to a MIDI message are skipped.
pub fn messages(data: &[u8]) -> impl Iterator<Item = MidiMessage<'_>> {
    data.chunks(4).filter_map(|potential_packet| {
        if potential_packet.len() != 4 {
            #[cfg(feature = "defmt")]
            defmt::error!("USB-MIDI Event Packets must always be 32 bits long");
            None
        } else {
            // the zeroth byte is intentionally ignored because the Packet Header is not of interest;
            // the remaining three bytes contain the actual MIDI event
            MidiMessage::from_bytes(&potential_packet[1..]).ok()
        }
    })
}
