//! glance: a terminal RSVP reader.
//!
//! The playback engine lives in [`engine`]: raw text is tokenized into
//! words annotated with pause and headline flags, and a background
//! timing loop shows them one at a time with the fixation character
//! highlighted. The [`app`] and [`ui`] modules wrap the engine in a
//! command deck and a ratatui shell; [`input`] loads text from files
//! and the clipboard.

pub mod app;
pub mod engine;
pub mod input;
pub mod ui;

pub use app::{App, AppEvent, AppMode};
pub use engine::{
    delay_for, fixation_index, tokenize, ChannelSink, MemorySink, Phase, PlaybackConfig,
    PlaybackError, PlaybackEvent, Player, PresentationSink, SinkError, Token,
};
pub use input::LoadError;
