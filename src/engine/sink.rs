//! The seam between the playback worker and whatever renders words.
//!
//! The worker never touches the terminal; it hands every notification to
//! a [`PresentationSink`]. The TUI uses [`ChannelSink`] so events arrive
//! on its own thread through an ordered queue; tests and headless callers
//! use [`MemorySink`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use thiserror::Error;

/// One notification from the playback engine, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Show this word with its fixation char index highlighted.
    Word { text: String, fixation: usize },
    /// `current` of `total` tokens shown, 1-based.
    Progress { current: usize, total: usize },
    /// The sequence finished naturally; `replay` echoes the policy flag
    /// given at start.
    Completed { replay: bool },
}

/// Sink delivery failures. The worker logs these and keeps reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("presentation channel disconnected")]
    Disconnected,
    #[error("sink rejected event: {0}")]
    Rejected(String),
}

/// Receives playback notifications. Implementations must be callable
/// from the worker thread; rendering happens wherever the implementation
/// forwards the events to.
pub trait PresentationSink: Send + Sync {
    fn display(&self, word: &str, fixation: usize) -> Result<(), SinkError>;
    fn progress(&self, current: usize, total: usize) -> Result<(), SinkError>;
    fn completed(&self, replay: bool) -> Result<(), SinkError>;
}

/// Forwards events into an mpsc channel drained by the render loop.
pub struct ChannelSink {
    tx: Sender<PlaybackEvent>,
}

impl ChannelSink {
    /// Creates the sink and the receiver the render loop will drain.
    pub fn pair() -> (Self, Receiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: PlaybackEvent) -> Result<(), SinkError> {
        self.tx.send(event).map_err(|_| SinkError::Disconnected)
    }
}

impl PresentationSink for ChannelSink {
    fn display(&self, word: &str, fixation: usize) -> Result<(), SinkError> {
        self.send(PlaybackEvent::Word {
            text: word.to_string(),
            fixation,
        })
    }

    fn progress(&self, current: usize, total: usize) -> Result<(), SinkError> {
        self.send(PlaybackEvent::Progress { current, total })
    }

    fn completed(&self, replay: bool) -> Result<(), SinkError> {
        self.send(PlaybackEvent::Completed { replay })
    }
}

/// Accumulates events in memory; used by tests and headless callers.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<PlaybackEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far, in order.
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.lock().clone()
    }

    /// The words displayed so far, in order.
    pub fn words(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::Word { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: PlaybackEvent) {
        self.lock().push(event);
    }

    // A poisoned lock only means a panicking reader; the event log is
    // still intact and useful.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PlaybackEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PresentationSink for MemorySink {
    fn display(&self, word: &str, fixation: usize) -> Result<(), SinkError> {
        self.push(PlaybackEvent::Word {
            text: word.to_string(),
            fixation,
        });
        Ok(())
    }

    fn progress(&self, current: usize, total: usize) -> Result<(), SinkError> {
        self.push(PlaybackEvent::Progress { current, total });
        Ok(())
    }

    fn completed(&self, replay: bool) -> Result<(), SinkError> {
        self.push(PlaybackEvent::Completed { replay });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_preserves_order() {
        let (sink, rx) = ChannelSink::pair();
        sink.display("hello", 2).unwrap();
        sink.progress(1, 2).unwrap();
        sink.display("world", 2).unwrap();
        sink.progress(2, 2).unwrap();
        sink.completed(true).unwrap();

        let events: Vec<PlaybackEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 5);
        assert_eq!(
            events[0],
            PlaybackEvent::Word {
                text: "hello".to_string(),
                fixation: 2
            }
        );
        assert_eq!(events[4], PlaybackEvent::Completed { replay: true });
    }

    #[test]
    fn test_channel_sink_reports_disconnect() {
        let (sink, rx) = ChannelSink::pair();
        drop(rx);
        assert_eq!(sink.display("word", 1), Err(SinkError::Disconnected));
    }

    #[test]
    fn test_memory_sink_collects_words() {
        let sink = MemorySink::new();
        sink.display("one", 1).unwrap();
        sink.display("two", 1).unwrap();
        assert_eq!(sink.words(), vec!["one", "two"]);
    }
}
