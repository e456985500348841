//! Provides a struct [`ActivatedNotes`] for managing the activated notes of a single MIDI channel. Here "activated
//! notes" means the notes that are currently held (e.g., depressed on a keyboard), regardless of whether or not
//! those notes are actually voiced. (Each voice in the array is monophonic, so many notes might be held on a
//! channel while only the most recent one sounds.)

use tinyvec::{ArrayVec, array_vec};
use wmidi::{Note, U7};

/// Per the General MIDI Level 2 specification, compliant devices "must be capable of supplying polyphony of
/// 32 or more allocated notes simultaneously." Thus, this will be the default size of an ActivatedNotes instance.
const GM2_SIMUL_NOTE_NUM: usize = 32;

/// A struct for managing the activated notes of a single MIDI channel.
///
/// Internally, this struct uses the [`U7`] type because [`tinyvec`] requires that `Items` implement [`Default`].
/// However, [`U7`] can be a bit unwieldy, so public interfaces will deal with the related [`Note`] type instead.
///
/// The mutators report when the set crosses between empty and non-empty, which is the moment the channel's gate
/// line must change state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivatedNotes<const N: usize = GM2_SIMUL_NOTE_NUM> {
    /// [`U7`] representations of the currently activated notes
    data: ArrayVec<[U7; N]>,
}

impl Default for ActivatedNotes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for ActivatedNotes<N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "ActivatedNotes {{ ");
        defmt::write!(fmt, "data: [");
        for (i, &note) in self.data.iter().enumerate() {
            if i == 0 {
                defmt::write!(fmt, " ");
            } else {
                defmt::write!(fmt, ", ");
            }
            defmt::write!(fmt, "{} ({})", Note::from(note).to_str(), u8::from(note));
        }
        defmt::write!(fmt, " ]");
        defmt::write!(fmt, " }}");
    }
}

impl ActivatedNotes {
    /// Construct a new `ActivatedNotes`.
    pub fn new() -> Self {
        Self { data: array_vec!() }
    }

    /// Add a [`Note`] to the list of those currently activated. Equivalent to depressing a key on a keyboard.
    ///
    /// Returns whether the addition made the list non-empty, i.e. whether this was the channel's first note.
    /// A note that is already activated is not added again, and when the list is full further additions are
    /// ignored rather than overflowing; neither case can report a transition.
    pub fn add(&mut self, note: Note) -> bool {
        let u7 = U7::from_u8_lossy(note as u8);
        if self.data.len() == self.data.capacity() || self.data.contains(&u7) {
            return false;
        }
        let was_empty = self.data.is_empty();
        self.data.push(u7);
        was_empty
    }

    /// Remove a [`Note`] from the list of those currently activated. Equivalent to releasing a depressed key
    /// on a keyboard.
    ///
    /// Returns whether the removal left the list empty, i.e. whether the channel's last note was just
    /// released. Removing a note that was never activated is ignored and reports no transition.
    pub fn remove(&mut self, note: Note) -> bool {
        let u7 = U7::from_u8_lossy(note as u8);
        if !self.data.contains(&u7) {
            return false;
        }
        self.data.retain(|&n| n != u7);
        self.data.is_empty()
    }

    /// Determine if a particular [`Note`] is activated.
    pub fn contains(&self, note: Note) -> bool {
        self.data.contains(&U7::from_u8_lossy(note as u8))
    }

    /// Determine if any [`Note`]s are activated.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns an [`Iterator`] over the activated [`Note`]s.
    ///
    /// Order is preserved; e.g., the first performed `Note` can be accessed via the first call to `.next()`, and the
    /// last performed `Note` is accessible via `.last()`.
    pub fn iter(&self) -> impl Iterator<Item = Note> {
        self.data.iter().map(|&i| Note::from(i))
    }
}
