/// Application events produced by the command deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    LoadFile(String),
    LoadClipboard,
    ReadText(String),
    SetWpm(u32),
    SetPause(u32),
    Help,
    Quit,
    Invalid(String),
    None,
}
