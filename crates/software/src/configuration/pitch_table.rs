use measurements::Voltage;
use wmidi::Note;

/// Control voltages measured against the reference build's voice array, one entry per playable
/// note. The array does not track a volt-per-octave law, so each note was tuned by ear and the
/// voltage it landed on recorded.
const POCKET_OPERATOR_CALIBRATION: [(Note, f64); 15] = [
    (Note::A1, 0.0),
    (Note::B1, 0.35),
    (Note::C2, 0.53),
    (Note::D2, 0.78),
    (Note::E2, 1.0),
    (Note::F2, 1.25),
    (Note::G2, 1.5),
    (Note::A2, 1.7),
    (Note::B2, 1.9),
    (Note::C3, 2.15),
    (Note::D3, 2.3),
    (Note::E3, 2.55),
    (Note::F3, 2.78),
    (Note::G3, 2.9),
    (Note::A3, 3.2),
];

/// A calibrated note-to-voltage map for a voice array's pitch CV input.
///
/// This is a sparse table rather than a conversion formula: only the notes the hardware was
/// actually measured against appear in it. Notes in between the calibration points have no
/// defined pitch at all, and [`lookup`][Self::lookup] reflects that by returning [`None`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchTable {
    entries: &'static [(Note, f64)],
}

impl Default for PitchTable {
    fn default() -> Self {
        Self::new(&POCKET_OPERATOR_CALIBRATION)
    }
}

impl PitchTable {
    /// Constructs a [`PitchTable`] from measured calibration points.
    ///
    /// Panics unless the entries ascend strictly by note and no voltage is negative, catching
    /// mistyped calibration data the first time the firmware runs.
    pub fn new(entries: &'static [(Note, f64)]) -> Self {
        for pair in entries.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "Calibration entries must ascend strictly by note"
            );
        }
        for (_, volts) in entries {
            assert!(*volts >= 0.0, "Calibration voltages must not be negative");
        }
        Self { entries }
    }

    /// Returns the measured [`Voltage`] for a [`Note`], or [`None`] if the note was never
    /// calibrated and so has no defined pitch.
    pub fn lookup(&self, note: Note) -> Option<Voltage> {
        self.entries
            .iter()
            .find(|(calibrated, _)| *calibrated == note)
            .map(|(_, volts)| Voltage::from_volts(*volts))
    }

    /// Returns an [`Iterator`] over the calibrated [`Note`]s, in ascending order.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.entries.iter().map(|(note, _)| *note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wmidi::U7;

    #[test]
    fn looks_up_a_calibrated_note() {
        let table = PitchTable::default();
        assert_eq!(
            Some(Voltage::from_volts(2.15)),
            table.lookup(Note::C3),
            "Expected left but got right"
        );
    }

    #[test]
    fn lowest_calibrated_note_sits_at_zero_volts() {
        let table = PitchTable::default();
        assert_eq!(
            Some(Voltage::from_volts(0.0)),
            table.lookup(Note::A1),
            "Expected left but got right"
        );
    }

    #[test]
    fn notes_outside_the_calibrated_span_have_no_pitch() {
        let table = PitchTable::default();
        assert_eq!(None, table.lookup(Note::C1), "Expected left but got right");
        assert_eq!(None, table.lookup(Note::C4), "Expected left but got right");
    }

    #[test]
    fn notes_between_calibration_points_have_no_pitch() {
        let table = PitchTable::default();
        // 34 lands between the calibrated A1 (33) and B1 (35)
        let in_gap = Note::from(U7::from_u8_lossy(34));
        assert_eq!(None, table.lookup(in_gap), "Expected left but got right");
    }

    #[test]
    fn lists_calibrated_notes_in_order() {
        let table = PitchTable::default();
        let mut notes = table.notes();
        assert_eq!(Some(Note::A1), notes.next());
        assert_eq!(Some(Note::B1), notes.next());
        assert_eq!(Some(Note::A3), notes.last());
    }

    #[test]
    #[should_panic(expected = "ascend strictly")]
    fn rejects_out_of_order_entries() {
        static BACKWARDS: [(Note, f64); 2] = [(Note::C3, 2.15), (Note::C2, 0.53)];
        PitchTable::new(&BACKWARDS);
    }

    #[test]
    #[should_panic(expected = "ascend strictly")]
    fn rejects_duplicate_entries() {
        static DOUBLED: [(Note, f64); 2] = [(Note::C2, 0.53), (Note::C2, 0.54)];
        PitchTable::new(&DOUBLED);
    }

    #[test]
    #[should_panic(expected = "must not be negative")]
    fn rejects_negative_voltages() {
        static BELOW_GROUND: [(Note, f64); 2] = [(Note::A1, -0.1), (Note::B1, 0.35)];
        PitchTable::new(&BELOW_GROUND);
    }
}
