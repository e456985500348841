//! This module describes the attached voice array: which notes it can voice at what control
//! voltage, and how MIDI channels reach its voice inputs. Everything here is fixed for the life
//! of the process and validated when constructed.

mod pitch_table;
pub use pitch_table::*;

mod voice_map;
pub use voice_map::*;
