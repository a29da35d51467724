use std::error::Error;
use std::fs::File;

use glance::app::{App, AppEvent};
use glance::ui::TerminalSession;

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let mut app = App::new();
    let mut session = TerminalSession::new()?;

    // An optional file argument goes through the same path as @file.
    // The session exists first, so the frame loop starts draining right
    // away and no opening words play against a half-built terminal.
    if let Some(path) = std::env::args().nth(1) {
        app.handle_event(AppEvent::LoadFile(path));
    }

    session.run(&mut app)?;
    Ok(())
}

/// Diagnostics go to a file so the alternate screen stays clean.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    match File::create("glance.log") {
        Ok(file) => env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init(),
        Err(_) => env_logger::init(),
    }
}
