//! Terminal session: raw mode and alternate screen with panic-safe
//! restore, plus the frame loop that drives the app.

use std::io::{self, Stdout};
use std::sync::Once;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{App, AppMode};
use crate::ui::view;

/// How long the input poll waits before the next frame. The playback
/// worker owns word timing; this only bounds input latency and the
/// event-drain cadence.
const FRAME_TICK: Duration = Duration::from_millis(33);

static PANIC_HOOK_SET: Once = Once::new();

pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        set_panic_hook();

        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }

    /// Runs until the app enters `Quit`. Each pass drains playback
    /// events, draws a frame, and waits up to one tick for input.
    pub fn run(&mut self, app: &mut App) -> io::Result<()> {
        loop {
            app.drain_playback_events();
            if app.mode() == AppMode::Quit {
                return Ok(());
            }

            self.terminal.draw(|frame| view::draw(frame, app))?;

            if event::poll(FRAME_TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        app.handle_key(key);
                    }
                }
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// A panic anywhere must put the terminal back before the message
/// prints, or it lands on the alternate screen and vanishes with it.
fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            restore_terminal();
            default_hook(panic_info);
        }));
    });
}
