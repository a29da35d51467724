/// One displayable unit of text, produced once per playback session.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub text: String,
    /// The word sat at the end of a source line with more text below it,
    /// so a rendered line break follows and earns an extra pause.
    pub forces_pause_after: bool,
    /// First word of a line judged to be a headline; the reader dwells
    /// on titles, so this earns an extra pause too.
    pub is_headline_start: bool,
}

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            forces_pause_after: false,
            is_headline_start: false,
        }
    }
}
