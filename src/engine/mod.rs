//! The RSVP playback engine: tokenization, fixation points, the delay
//! model, and the playback controller with its background timing loop.

pub mod config;
pub mod error;
pub mod fixation;
pub mod player;
pub mod sink;
pub mod timing;
pub mod token;
pub mod tokenizer;

pub use config::PlaybackConfig;
pub use error::PlaybackError;
pub use fixation::fixation_index;
pub use player::{Phase, Player};
pub use sink::{ChannelSink, MemorySink, PlaybackEvent, PresentationSink, SinkError};
pub use timing::delay_for;
pub use token::Token;
pub use tokenizer::tokenize;
