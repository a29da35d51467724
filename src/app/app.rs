//! Application shell: owns the playback engine, the command deck, and
//! the mode machine that decides how keys are interpreted.
//!
//! The engine reports through a channel sink; [`App::drain_playback_events`]
//! applies whatever arrived since the last frame, so all rendering state
//! lives here on the UI thread.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use log::debug;

use crate::app::event::AppEvent;
use crate::app::mode::AppMode;
use crate::engine::config::PlaybackConfig;
use crate::engine::player::{Phase, Player};
use crate::engine::sink::{ChannelSink, PlaybackEvent};
use crate::input::{clipboard, file};
use crate::ui::command::{command_to_app_event, parse_command};

/// How much one keypress changes the live settings.
const WPM_STEP: i32 = 25;
const PAUSE_STEP: i32 = 50;

pub struct App {
    player: Player,
    playback_events: Receiver<PlaybackEvent>,
    mode: AppMode,
    input: String,
    status: Option<String>,
    show_help: bool,
    word: Option<(String, usize)>,
    progress: (usize, usize),
}

impl App {
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        let (sink, playback_events) = ChannelSink::pair();
        Self {
            player: Player::new(Arc::new(sink), config),
            playback_events,
            mode: AppMode::Deck,
            input: String::new(),
            status: None,
            show_help: false,
            word: None,
            progress: (0, 0),
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn deck_input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn help_visible(&self) -> bool {
        self.show_help
    }

    /// The word on screen and its fixation char index.
    pub fn current_word(&self) -> Option<(&str, usize)> {
        self.word
            .as_ref()
            .map(|(text, fixation)| (text.as_str(), *fixation))
    }

    pub fn progress(&self) -> (usize, usize) {
        self.progress
    }

    pub fn phase(&self) -> Phase {
        self.player.phase()
    }

    pub fn position(&self) -> usize {
        self.player.position()
    }

    pub fn wpm(&self) -> u32 {
        self.player.wpm()
    }

    pub fn base_pause_ms(&self) -> u32 {
        self.player.base_pause_ms()
    }

    /// Applies everything the playback worker reported since the last
    /// frame. Called once per render tick by the terminal session.
    pub fn drain_playback_events(&mut self) {
        while let Ok(event) = self.playback_events.try_recv() {
            self.apply_playback_event(event);
        }
    }

    fn apply_playback_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Word { text, fixation } => self.word = Some((text, fixation)),
            PlaybackEvent::Progress { current, total } => self.progress = (current, total),
            PlaybackEvent::Completed { replay } => {
                // A Completed can trail a stop that already left the
                // session; only a live reading screen moves to Done.
                if matches!(self.mode, AppMode::Reading | AppMode::Paused) {
                    debug!("app: session completed (replay hint: {})", replay);
                    self.mode = AppMode::Done;
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            AppMode::Deck => self.handle_deck_key(key),
            AppMode::Reading => self.handle_reading_key(key),
            AppMode::Paused => self.handle_paused_key(key),
            AppMode::Done => self.handle_done_key(key),
            AppMode::Quit => {}
        }
    }

    fn handle_deck_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                let event = command_to_app_event(parse_command(&line));
                self.handle_event(event);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => {
                self.input.clear();
                self.status = None;
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_reading_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => {
                // A pause can race the session finishing on its own;
                // the trailing Completed event settles the mode then.
                if self.player.pause().is_ok() {
                    self.mode = AppMode::Paused;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.player.adjust_wpm(WPM_STEP),
            KeyCode::Char('-') => self.player.adjust_wpm(-WPM_STEP),
            KeyCode::Char('[') => self.player.adjust_pause(-PAUSE_STEP),
            KeyCode::Char(']') => self.player.adjust_pause(PAUSE_STEP),
            KeyCode::Char(c) if c.is_ascii_digit() => self.seek_digit(c),
            KeyCode::Esc | KeyCode::Char('q') => self.stop_to_deck(),
            _ => {}
        }
    }

    fn handle_paused_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => match self.player.resume() {
                Ok(()) => self.mode = AppMode::Reading,
                Err(err) => debug!("app: resume rejected: {}", err),
            },
            KeyCode::Left => {
                if let Err(err) = self.player.step_backward() {
                    debug!("app: step rejected: {}", err);
                }
            }
            KeyCode::Right => {
                if let Err(err) = self.player.step_forward() {
                    debug!("app: step rejected: {}", err);
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => self.seek_digit(c),
            KeyCode::Esc | KeyCode::Char('q') => self.stop_to_deck(),
            _ => {}
        }
    }

    fn handle_done_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => match self.player.start(true) {
                Ok(()) => {
                    self.word = None;
                    self.progress = (0, self.player.len());
                    self.mode = AppMode::Reading;
                }
                Err(err) => debug!("app: replay rejected: {}", err),
            },
            KeyCode::Esc | KeyCode::Char('q') => self.stop_to_deck(),
            _ => {}
        }
    }

    /// Digit keys jump to that tenth of the text and park there.
    fn seek_digit(&mut self, digit: char) {
        let tenth = digit.to_digit(10).unwrap_or(0);
        match self.player.seek_fraction(f64::from(tenth) / 10.0) {
            Ok(()) => self.mode = AppMode::Paused,
            Err(err) => debug!("app: seek rejected: {}", err),
        }
    }

    fn stop_to_deck(&mut self) {
        self.player.stop();
        self.word = None;
        self.progress = (0, 0);
        self.mode = AppMode::Deck;
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.mode = AppMode::Quit,
            AppEvent::Help => self.show_help = !self.show_help,
            AppEvent::LoadFile(path) => match file::load_file(&path) {
                Ok(text) => self.start_reading(&text),
                Err(err) => self.status = Some(err.to_string()),
            },
            AppEvent::LoadClipboard => match clipboard::load_clipboard() {
                Ok(text) => self.start_reading(&text),
                Err(err) => self.status = Some(err.to_string()),
            },
            AppEvent::ReadText(text) => self.start_reading(&text),
            AppEvent::SetWpm(wpm) => {
                self.player.set_wpm(wpm);
                self.status = Some(format!("{} wpm", self.player.wpm()));
            }
            AppEvent::SetPause(pause_ms) => {
                self.player.set_base_pause_ms(pause_ms);
                self.status = Some(format!("{} ms pause", self.player.base_pause_ms()));
            }
            AppEvent::Invalid(input) => {
                self.status = Some(format!("unrecognized command: {}", input));
            }
            AppEvent::None => {}
        }
    }

    fn start_reading(&mut self, text: &str) {
        self.player.load(text);
        if self.player.is_empty() {
            self.status = Some("nothing to read".to_string());
            return;
        }
        if let Err(err) = self.player.start(true) {
            debug!("app: start rejected: {}", err);
            return;
        }
        self.word = None;
        self.progress = (0, self.player.len());
        self.status = None;
        self.mode = AppMode::Reading;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
