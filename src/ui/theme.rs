use ratatui::style::Color;

/// Dusk palette: a low-glare backdrop with a warm fixation accent.
///
/// Built once per frame in the view layer and passed down to every
/// widget builder, so a future second scheme is a constructor away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub fixation: Color,
    pub dim: Color,
    pub bar: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::dusk()
    }
}

impl Palette {
    pub fn dusk() -> Self {
        Self {
            background: Color::Rgb(24, 24, 32),
            text: Color::Rgb(205, 209, 222),
            fixation: Color::Rgb(235, 143, 94),
            dim: Color::Rgb(108, 114, 138),
            bar: Color::Rgb(142, 160, 204),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_is_dusk() {
        assert_eq!(Palette::default(), Palette::dusk());
    }
}
