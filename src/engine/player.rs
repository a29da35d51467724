//! Playback controller and its background timing loop.
//!
//! A [`Player`] owns one reading session: the token sequence, the shared
//! session state, and at most one worker thread running the timing loop.
//! Operations are called from the UI thread; the worker only reads the
//! live settings and cancel flag and only writes `position`, `phase`,
//! and `last_shown`. Every operation that writes `position` joins the
//! outgoing worker first, so the position has exactly one writer at any
//! instant. All rendering goes through the [`PresentationSink`]; the
//! worker never touches the terminal.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::engine::config::PlaybackConfig;
use crate::engine::error::PlaybackError;
use crate::engine::fixation::fixation_index;
use crate::engine::sink::PresentationSink;
use crate::engine::timing::delay_for;
use crate::engine::token::Token;
use crate::engine::tokenizer::tokenize;

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    Playing = 1,
    Paused = 2,
    Completed = 3,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Phase::Playing,
            2 => Phase::Paused,
            3 => Phase::Completed,
            _ => Phase::Idle,
        }
    }
}

/// Sentinel for "the worker has not shown any token this session".
const NOTHING_SHOWN: usize = usize::MAX;

/// Session state shared between the controller and the worker thread.
///
/// Relaxed ordering throughout: controller operations join the worker
/// before writing `position`, and the flags only need eventual
/// visibility, which atomics give regardless of ordering.
struct SharedState {
    phase: AtomicU8,
    position: AtomicUsize,
    last_shown: AtomicUsize,
    cancel_requested: AtomicBool,
    wpm: AtomicU32,
    base_pause_ms: AtomicU32,
}

impl SharedState {
    fn new(config: &PlaybackConfig) -> Self {
        Self {
            phase: AtomicU8::new(Phase::Idle as u8),
            position: AtomicUsize::new(0),
            last_shown: AtomicUsize::new(NOTHING_SHOWN),
            cancel_requested: AtomicBool::new(false),
            wpm: AtomicU32::new(config.clamp_wpm(config.wpm)),
            base_pause_ms: AtomicU32::new(config.clamp_pause(config.base_pause_ms)),
        }
    }

    fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Relaxed))
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Relaxed);
    }

    /// Atomic `from` → `to` transition; fails with the phase actually
    /// observed, so double-presses lose cleanly.
    fn transition(&self, from: Phase, to: Phase) -> Result<(), Phase> {
        self.phase
            .compare_exchange(from as u8, to as u8, Ordering::Relaxed, Ordering::Relaxed)
            .map(|_| ())
            .map_err(Phase::from_u8)
    }

    fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    fn set_position(&self, position: usize) {
        self.position.store(position, Ordering::Relaxed);
    }

    fn last_shown(&self) -> Option<usize> {
        match self.last_shown.load(Ordering::Relaxed) {
            NOTHING_SHOWN => None,
            position => Some(position),
        }
    }

    fn set_last_shown(&self, position: usize) {
        self.last_shown.store(position, Ordering::Relaxed);
    }

    fn clear_last_shown(&self) {
        self.last_shown.store(NOTHING_SHOWN, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_requested.load(Ordering::Relaxed)
    }

    fn set_cancel(&self, cancel: bool) {
        self.cancel_requested.store(cancel, Ordering::Relaxed);
    }

    fn wpm(&self) -> u32 {
        self.wpm.load(Ordering::Relaxed)
    }

    fn base_pause_ms(&self) -> u32 {
        self.base_pause_ms.load(Ordering::Relaxed)
    }
}

/// The playback controller: one reading session at a time.
pub struct Player {
    tokens: Arc<[Token]>,
    shared: Arc<SharedState>,
    sink: Arc<dyn PresentationSink>,
    config: PlaybackConfig,
    worker: Option<JoinHandle<()>>,
    replay_on_complete: bool,
}

impl Player {
    pub fn new(sink: Arc<dyn PresentationSink>, config: PlaybackConfig) -> Self {
        let shared = Arc::new(SharedState::new(&config));
        Self {
            tokens: Arc::from(Vec::new()),
            shared,
            sink,
            config,
            worker: None,
            replay_on_complete: false,
        }
    }

    /// Replaces the session with freshly tokenized `text`: position 0,
    /// `Idle`, or straight to `Completed` when the text has no words.
    /// Any running loop is cancelled and joined first.
    pub fn load(&mut self, text: &str) {
        self.shared.set_cancel(true);
        self.join_worker();

        let tokens = tokenize(text);
        debug!("playback: loaded {} tokens", tokens.len());
        self.tokens = tokens.into();
        self.shared.set_position(0);
        self.shared.clear_last_shown();
        self.shared.set_cancel(false);
        self.shared.set_phase(if self.tokens.is_empty() {
            Phase::Completed
        } else {
            Phase::Idle
        });
    }

    /// Begins playback from `Idle`, or replays from token 0 when the
    /// previous session ran to `Completed`. `replay_on_complete` is the
    /// caller's policy flag, held for the whole session and echoed in
    /// the completion notification. Starting an empty sequence is a safe
    /// no-op.
    pub fn start(&mut self, replay_on_complete: bool) -> Result<(), PlaybackError> {
        match self.phase() {
            Phase::Idle => {}
            Phase::Completed => {
                self.shared.set_position(0);
                self.shared.clear_last_shown();
            }
            phase => return Err(PlaybackError::InvalidPhase { op: "start", phase }),
        }
        if self.tokens.is_empty() {
            debug!("playback: start with no tokens is a no-op");
            return Ok(());
        }

        self.join_worker();
        self.replay_on_complete = replay_on_complete;
        self.shared.set_cancel(false);
        self.shared.set_phase(Phase::Playing);
        self.spawn_worker();
        Ok(())
    }

    /// Stops at the next token boundary without moving `position`: the
    /// word on screen stays current. Returns immediately; the worker
    /// winds down on its own within one token's delay.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        self.shared
            .transition(Phase::Playing, Phase::Paused)
            .map_err(|phase| PlaybackError::InvalidPhase { op: "pause", phase })?;
        self.shared.set_cancel(true);
        debug!("playback: paused at token {}", self.position());
        Ok(())
    }

    /// Continues a paused session from where it stands. When the worker
    /// had fully shown the current token before the pause landed, resume
    /// picks up with the next one so nothing repeats; after a step or
    /// seek, the selected token gets its full dwell instead.
    pub fn resume(&mut self) -> Result<(), PlaybackError> {
        if self.phase() != Phase::Paused {
            return Err(PlaybackError::InvalidPhase {
                op: "resume",
                phase: self.phase(),
            });
        }
        self.join_worker();
        // The session may have finished while the worker wound down.
        if self.phase() != Phase::Paused {
            return Err(PlaybackError::InvalidPhase {
                op: "resume",
                phase: self.phase(),
            });
        }

        let position = self.shared.position();
        if self.shared.last_shown() == Some(position) {
            self.shared.set_position(position + 1);
        }
        self.shared.set_cancel(false);
        self.shared.set_phase(Phase::Playing);
        self.spawn_worker();
        Ok(())
    }

    /// Shows the next token immediately, clamped to the last one.
    pub fn step_forward(&mut self) -> Result<(), PlaybackError> {
        self.step(true)
    }

    /// Shows the previous token immediately, clamped to the first one.
    pub fn step_backward(&mut self) -> Result<(), PlaybackError> {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> Result<(), PlaybackError> {
        let op = if forward { "step forward" } else { "step backward" };
        if self.phase() != Phase::Paused {
            return Err(PlaybackError::InvalidPhase {
                op,
                phase: self.phase(),
            });
        }
        self.join_worker();
        if self.phase() != Phase::Paused {
            return Err(PlaybackError::InvalidPhase {
                op,
                phase: self.phase(),
            });
        }

        let position = self.shared.position();
        let last = self.tokens.len().saturating_sub(1);
        let target = if forward {
            (position + 1).min(last)
        } else {
            position.saturating_sub(1)
        };
        self.shared.set_position(target.min(last));
        self.shared.clear_last_shown();
        self.show_current();
        Ok(())
    }

    /// Jumps to `index`, clamped into the sequence. Pauses first when
    /// called mid-playback, then shows the selected token immediately.
    pub fn seek_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        match self.phase() {
            Phase::Playing => self.pause()?,
            Phase::Paused => {}
            phase => return Err(PlaybackError::InvalidPhase { op: "seek", phase }),
        }
        self.join_worker();
        if self.phase() != Phase::Paused {
            return Err(PlaybackError::InvalidPhase {
                op: "seek",
                phase: self.phase(),
            });
        }

        let last = self.tokens.len().saturating_sub(1);
        self.shared.set_position(index.min(last));
        self.shared.clear_last_shown();
        self.show_current();
        Ok(())
    }

    /// Jumps to a fraction of the way through the sequence, 0.0 to 1.0.
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<(), PlaybackError> {
        let clamped = fraction.clamp(0.0, 1.0);
        let index = (clamped * self.tokens.len() as f64) as usize;
        self.seek_to(index)
    }

    /// Abandons the session from any phase: cancels, joins, and resets
    /// to `Idle` at token 0.
    pub fn stop(&mut self) {
        self.shared.set_cancel(true);
        self.join_worker();
        self.shared.set_phase(Phase::Idle);
        self.shared.set_position(0);
        self.shared.clear_last_shown();
        debug!("playback: stopped");
    }

    pub fn phase(&self) -> Phase {
        self.shared.phase()
    }

    pub fn position(&self) -> usize {
        self.shared.position()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn wpm(&self) -> u32 {
        self.shared.wpm()
    }

    pub fn base_pause_ms(&self) -> u32 {
        self.shared.base_pause_ms()
    }

    /// Applies from the next token of any running loop.
    pub fn set_wpm(&mut self, wpm: u32) {
        let clamped = self.config.clamp_wpm(wpm);
        self.shared.wpm.store(clamped, Ordering::Relaxed);
        debug!("playback: wpm set to {}", clamped);
    }

    pub fn adjust_wpm(&mut self, delta: i32) {
        let target = i64::from(self.wpm()) + i64::from(delta);
        self.set_wpm(target.clamp(0, i64::from(u32::MAX)) as u32);
    }

    /// Applies from the next token of any running loop.
    pub fn set_base_pause_ms(&mut self, pause_ms: u32) {
        let clamped = self.config.clamp_pause(pause_ms);
        self.shared.base_pause_ms.store(clamped, Ordering::Relaxed);
        debug!("playback: base pause set to {}ms", clamped);
    }

    pub fn adjust_pause(&mut self, delta: i32) {
        let target = i64::from(self.base_pause_ms()) + i64::from(delta);
        self.set_base_pause_ms(target.clamp(0, i64::from(u32::MAX)) as u32);
    }

    /// Emits the show-token and progress notifications for the current
    /// position, used by steps and seeks. Only called with the worker
    /// joined.
    fn show_current(&self) {
        let position = self.shared.position();
        if let Some(token) = self.tokens.get(position) {
            emit_display(self.sink.as_ref(), &token.text, position);
            emit_progress(self.sink.as_ref(), position + 1, self.tokens.len());
        }
    }

    fn spawn_worker(&mut self) {
        let tokens = Arc::clone(&self.tokens);
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(&self.sink);
        let replay = self.replay_on_complete;
        debug!(
            "playback: loop starting at token {} of {}",
            shared.position(),
            tokens.len()
        );
        self.worker = Some(thread::spawn(move || {
            run_timing_loop(&tokens, &shared, sink.as_ref(), replay);
        }));
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("playback: timing loop panicked");
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shared.set_cancel(true);
        self.join_worker();
    }
}

/// The background timing loop: show, record, sleep, advance, repeat.
/// Cancellation is honored at the loop top and again after the sleep;
/// once observed, `position` is left on the token already on screen.
fn run_timing_loop(
    tokens: &[Token],
    shared: &SharedState,
    sink: &dyn PresentationSink,
    replay: bool,
) {
    let total = tokens.len();
    loop {
        if shared.is_cancelled() {
            return;
        }
        let position = shared.position();
        if position >= total {
            break;
        }
        let token = &tokens[position];

        emit_display(sink, &token.text, position);
        shared.set_last_shown(position);
        emit_progress(sink, position + 1, total);

        let delay = delay_for(token, shared.wpm(), shared.base_pause_ms());
        thread::sleep(delay);

        if shared.is_cancelled() {
            return;
        }
        shared.set_position(position + 1);
    }

    shared.set_phase(Phase::Completed);
    if let Err(err) = sink.completed(replay) {
        warn!("playback: completed callback failed: {}", err);
    }
    debug!("playback: sequence completed");
}

fn emit_display(sink: &dyn PresentationSink, text: &str, position: usize) {
    if let Err(err) = sink.display(text, fixation_index(text)) {
        warn!("playback: display callback failed at token {}: {}", position, err);
    }
}

fn emit_progress(sink: &dyn PresentationSink, current: usize, total: usize) {
    if let Err(err) = sink.progress(current, total) {
        warn!("playback: progress callback failed: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sink::{MemorySink, PlaybackEvent};
    use std::time::{Duration, Instant};

    /// Player over a MemorySink with a test-friendly WPM floor.
    fn player_with(text: &str, wpm: u32, pause_ms: u32) -> (Player, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let config = PlaybackConfig {
            wpm,
            wpm_range: 10..=2000,
            base_pause_ms: pause_ms,
            pause_range: 0..=3000,
        };
        let mut player = Player::new(sink.clone(), config);
        player.load(text);
        (player, sink)
    }

    fn wait_until(timeout_ms: u64, mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    fn completed_count(sink: &MemorySink) -> usize {
        sink.events()
            .iter()
            .filter(|e| matches!(e, PlaybackEvent::Completed { .. }))
            .count()
    }

    #[test]
    fn test_load_empty_text_goes_straight_to_completed() {
        let (mut player, sink) = player_with("   \n\n  ", 300, 0);
        assert_eq!(player.phase(), Phase::Completed);
        assert_eq!(player.len(), 0);

        // Starting an empty sequence is a safe no-op with no events
        assert!(player.start(false).is_ok());
        assert_eq!(player.phase(), Phase::Completed);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_load_resets_position_and_phase() {
        let (mut player, _sink) = player_with("one two three", 300, 0);
        assert_eq!(player.phase(), Phase::Idle);
        assert_eq!(player.position(), 0);
        assert_eq!(player.len(), 3);
    }

    #[test]
    fn test_plays_to_completion_in_order() {
        let (mut player, sink) = player_with("one two", 1000, 0);
        player.start(false).unwrap();
        assert!(wait_until(3000, || player.phase() == Phase::Completed));

        let events = sink.events();
        assert_eq!(
            events,
            vec![
                PlaybackEvent::Word {
                    text: "one".to_string(),
                    fixation: 1
                },
                PlaybackEvent::Progress {
                    current: 1,
                    total: 2
                },
                PlaybackEvent::Word {
                    text: "two".to_string(),
                    fixation: 1
                },
                PlaybackEvent::Progress {
                    current: 2,
                    total: 2
                },
                PlaybackEvent::Completed { replay: false },
            ]
        );
        assert_eq!(player.position(), player.len());
    }

    #[test]
    fn test_completed_fires_exactly_once_per_session() {
        let (mut player, sink) = player_with("solo", 1000, 0);
        player.start(true).unwrap();
        assert!(wait_until(3000, || player.phase() == Phase::Completed));
        // Give a hypothetical stray emission time to land
        thread::sleep(Duration::from_millis(50));
        assert_eq!(completed_count(&sink), 1);
    }

    #[test]
    fn test_replay_flag_is_echoed_on_completion() {
        let (mut player, sink) = player_with("done", 1000, 0);
        player.start(true).unwrap();
        assert!(wait_until(3000, || player.phase() == Phase::Completed));
        assert!(sink
            .events()
            .contains(&PlaybackEvent::Completed { replay: true }));
    }

    #[test]
    fn test_start_from_completed_replays_from_the_top() {
        let (mut player, sink) = player_with("alpha beta", 1000, 0);
        player.start(false).unwrap();
        assert!(wait_until(3000, || player.phase() == Phase::Completed));

        player.start(false).unwrap();
        assert!(wait_until(3000, || player.phase() == Phase::Completed));
        assert_eq!(sink.words(), vec!["alpha", "beta", "alpha", "beta"]);
        assert_eq!(completed_count(&sink), 2);
    }

    #[test]
    fn test_start_is_rejected_while_playing() {
        // 10 WPM keeps the loop busy for seconds
        let (mut player, _sink) = player_with("one two three", 10, 0);
        player.start(false).unwrap();
        let err = player.start(false).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::InvalidPhase {
                op: "start",
                phase: Phase::Playing
            }
        );
        player.stop();
    }

    #[test]
    fn test_pause_parks_on_the_shown_token() {
        let (mut player, sink) = player_with("alpha beta gamma", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));

        player.pause().unwrap();
        assert_eq!(player.position(), 0, "pause must not advance position");
        assert_eq!(player.phase(), Phase::Paused);

        // Even after the worker wakes and exits, the position stays put
        thread::sleep(Duration::from_millis(100));
        player.resume().unwrap();
        assert!(wait_until(10_000, || sink.words().len() >= 2));
        assert_eq!(
            sink.words()[..2],
            ["alpha".to_string(), "beta".to_string()],
            "resume continues with the next token, no repeat, no skip"
        );
        player.stop();
    }

    #[test]
    fn test_double_pause_is_a_reported_no_op() {
        let (mut player, sink) = player_with("alpha beta gamma", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));

        player.pause().unwrap();
        let err = player.pause().unwrap_err();
        assert_eq!(
            err,
            PlaybackError::InvalidPhase {
                op: "pause",
                phase: Phase::Paused
            }
        );
        assert_eq!(player.position(), 0);
        player.stop();
    }

    #[test]
    fn test_step_clamps_at_both_ends() {
        let (mut player, sink) = player_with("one two three", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));
        player.pause().unwrap();

        player.step_backward().unwrap();
        assert_eq!(player.position(), 0, "no negative index");

        player.seek_to(usize::MAX).unwrap();
        assert_eq!(player.position(), 2, "seek clamps to the last token");

        player.step_forward().unwrap();
        assert_eq!(player.position(), 2, "no index past the end");
        player.stop();
    }

    #[test]
    fn test_step_shows_the_new_token_immediately() {
        let (mut player, sink) = player_with("one two three", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));
        player.pause().unwrap();

        player.step_forward().unwrap();
        assert_eq!(player.position(), 1);
        let words = sink.words();
        assert_eq!(words.last().map(String::as_str), Some("two"));
        player.stop();
    }

    #[test]
    fn test_resume_after_step_re_dwells_on_the_selected_token() {
        let (mut player, sink) = player_with("alpha beta gamma", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));
        player.pause().unwrap();

        player.step_forward().unwrap();
        player.resume().unwrap();
        assert!(wait_until(1000, || sink.words().len() >= 3));
        assert_eq!(
            sink.words()[..3],
            ["alpha".to_string(), "beta".to_string(), "beta".to_string()],
            "the stepped-to token gets its full dwell on resume"
        );
        player.stop();
    }

    #[test]
    fn test_seek_while_playing_pauses_first() {
        let (mut player, sink) = player_with("one two three four", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));

        player.seek_to(2).unwrap();
        assert_eq!(player.phase(), Phase::Paused);
        assert_eq!(player.position(), 2);
        assert_eq!(sink.words().last().map(String::as_str), Some("three"));
        player.stop();
    }

    #[test]
    fn test_seek_fraction_maps_onto_indices() {
        let (mut player, sink) = player_with("a b c d e f g h i j", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));

        player.seek_fraction(0.5).unwrap();
        assert_eq!(player.position(), 5);
        player.seek_fraction(1.0).unwrap();
        assert_eq!(player.position(), 9, "full fraction clamps to the last token");
        player.seek_fraction(-2.0).unwrap();
        assert_eq!(player.position(), 0);
        player.stop();
        let _ = sink;
    }

    #[test]
    fn test_stop_resets_to_idle_from_any_phase() {
        let (mut player, sink) = player_with("one two three", 10, 0);
        player.stop();
        assert_eq!(player.phase(), Phase::Idle);

        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));
        player.stop();
        assert_eq!(player.phase(), Phase::Idle);
        assert_eq!(player.position(), 0);
    }

    #[test]
    fn test_operations_report_invalid_phases() {
        let (mut player, _sink) = player_with("some words here", 300, 0);

        assert!(matches!(
            player.pause(),
            Err(PlaybackError::InvalidPhase { op: "pause", .. })
        ));
        assert!(matches!(
            player.resume(),
            Err(PlaybackError::InvalidPhase { op: "resume", .. })
        ));
        assert!(matches!(
            player.step_forward(),
            Err(PlaybackError::InvalidPhase { .. })
        ));
        assert!(matches!(
            player.seek_to(1),
            Err(PlaybackError::InvalidPhase { op: "seek", .. })
        ));
    }

    #[test]
    fn test_settings_clamp_to_the_config_ranges() {
        let sink = Arc::new(MemorySink::new());
        let mut player = Player::new(sink, PlaybackConfig::default());

        player.set_wpm(5000);
        assert_eq!(player.wpm(), 1000);
        player.adjust_wpm(-100_000);
        assert_eq!(player.wpm(), 100);
        player.set_base_pause_ms(99_999);
        assert_eq!(player.base_pause_ms(), 3000);
        player.adjust_pause(-50_000);
        assert_eq!(player.base_pause_ms(), 0);
    }

    #[test]
    fn test_load_supersedes_a_running_session() {
        let (mut player, sink) = player_with("first text here", 10, 0);
        player.start(false).unwrap();
        assert!(wait_until(1000, || !sink.words().is_empty()));

        player.load("second");
        assert_eq!(player.phase(), Phase::Idle);
        assert_eq!(player.position(), 0);
        assert_eq!(player.len(), 1);
    }
}
