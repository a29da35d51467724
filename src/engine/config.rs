use std::ops::RangeInclusive;

/// Playback configuration seeded into each player session.
///
/// The live values can be adjusted mid-playback and take effect from the
/// next token; the ranges bound those adjustments.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Words per minute reading speed (default 300)
    pub wpm: u32,

    /// Minimum and maximum allowed WPM (default 100-1000)
    pub wpm_range: RangeInclusive<u32>,

    /// Unit pause in milliseconds for punctuation, line breaks, and
    /// headlines (default 500)
    pub base_pause_ms: u32,

    /// Minimum and maximum allowed base pause (default 0-3000)
    pub pause_range: RangeInclusive<u32>,
}

impl PlaybackConfig {
    pub fn clamp_wpm(&self, wpm: u32) -> u32 {
        wpm.clamp(*self.wpm_range.start(), *self.wpm_range.end())
    }

    pub fn clamp_pause(&self, pause_ms: u32) -> u32 {
        pause_ms.clamp(*self.pause_range.start(), *self.pause_range.end())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            wpm: 300,
            wpm_range: 100..=1000,
            base_pause_ms: 500,
            pause_range: 0..=3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = PlaybackConfig::default();
        assert_eq!(config.wpm, 300);
        assert_eq!(config.base_pause_ms, 500);
        assert!(config.wpm_range.contains(&config.wpm));
        assert!(config.pause_range.contains(&config.base_pause_ms));
    }

    #[test]
    fn test_clamp_wpm_bounds() {
        let config = PlaybackConfig::default();
        assert_eq!(config.clamp_wpm(50), 100);
        assert_eq!(config.clamp_wpm(400), 400);
        assert_eq!(config.clamp_wpm(5000), 1000);
    }

    #[test]
    fn test_clamp_pause_bounds() {
        let config = PlaybackConfig::default();
        assert_eq!(config.clamp_pause(0), 0);
        assert_eq!(config.clamp_pause(9999), 3000);
    }
}
