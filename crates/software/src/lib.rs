//! This crate contains architecture-agnostic logic for the Pocket Overture, a device which lets a row of
//! [Pocket Operator](https://teenage.engineering/products/po) synthesizers be played from modern music equipment by
//! translating [MIDI](https://midi.org/midi-1-0) messages into the [CV/gate](https://en.wikipedia.org/wiki/CV/gate)
//! signals wired into the row's voice inputs.

#![deny(missing_docs)]
#![no_std]

/// Data structures for tracking MIDI messages the device has received.
pub mod midi_state;

pub mod configuration;
pub mod controller;
pub mod dac;
pub mod gate;
pub mod note_event;
pub mod usb_midi;
