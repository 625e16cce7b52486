//! Music generation — maps classified brain states to note patterns and
//! manages the lifetime of the transient voices that play them.
//!
//! The engine is pure computation: it emits fully materialized
//! [`NoteEvent`](pattern::NoteEvent) lists and never touches an audio
//! device. Rendering belongs to the external sink.

pub mod engine;
pub mod pattern;
pub mod voice;
