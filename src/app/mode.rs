/// Which screen owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// The command deck: typing text or commands.
    Deck,
    /// Words are on screen and the timing loop is running.
    Reading,
    /// Playback is parked; steps and seeks are available.
    Paused,
    /// The sequence finished; replay is one keypress away.
    Done,
    /// Tear down the terminal and exit.
    Quit,
}
