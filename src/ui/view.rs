//! Reader, deck, and done views.
//!
//! The reader pins the fixation glyph to a fixed column so the eye
//! never moves between words: each word is shifted left by the display
//! width of everything before its fixation character.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppMode};
use crate::engine::player::Phase;
use crate::ui::theme::Palette;

/// Column within the word area that the fixation glyph is pinned to.
const FIXATION_COLUMN: usize = 14;
/// Width of the word area in the middle of the screen.
const WORD_AREA_WIDTH: u16 = 44;
/// Cells in the progress bar.
const PROGRESS_BAR_CELLS: usize = 20;

pub fn draw(frame: &mut Frame, app: &App) {
    let palette = Palette::default();
    let background = Block::default().style(Style::default().bg(palette.background));
    frame.render_widget(background, frame.area());

    match app.mode() {
        AppMode::Deck => draw_deck(frame, app, &palette),
        AppMode::Reading | AppMode::Paused => draw_reader(frame, app, &palette),
        AppMode::Done => draw_done(frame, app, &palette),
        AppMode::Quit => {}
    }
}

fn draw_reader(frame: &mut Frame, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1), // word
            Constraint::Length(1),
            Constraint::Length(1), // progress bar
            Constraint::Min(0),
            Constraint::Length(1), // status line
        ])
        .split(frame.area());

    if let Some((word, fixation)) = app.current_word() {
        let word_area = centered_columns(rows[1], WORD_AREA_WIDTH);
        frame.render_widget(render_word(word, fixation, palette), word_area);
    }
    frame.render_widget(
        Paragraph::new(render_progress_bar(app.progress(), palette)),
        rows[3],
    );
    frame.render_widget(render_status_line(app, palette), rows[5]);
}

fn draw_deck(frame: &mut Frame, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(1), // prompt
            Constraint::Length(1),
            Constraint::Length(1), // status
            Constraint::Min(0),    // help panel
        ])
        .split(frame.area());

    let prompt = Line::from(vec![
        Span::styled("> ", Style::default().fg(palette.dim)),
        Span::styled(
            app.deck_input().to_string(),
            Style::default().fg(palette.text),
        ),
        Span::styled("_", Style::default().fg(palette.fixation)),
    ]);
    frame.render_widget(
        Paragraph::new(prompt).alignment(Alignment::Left),
        centered_columns(rows[1], WORD_AREA_WIDTH),
    );

    if let Some(status) = app.status() {
        frame.render_widget(
            Paragraph::new(status.to_string())
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.dim)),
            rows[3],
        );
    }

    if app.help_visible() {
        frame.render_widget(
            render_help(palette),
            centered_columns(rows[4], WORD_AREA_WIDTH),
        );
    } else {
        frame.render_widget(
            Paragraph::new("type text and press enter, or :h for help")
                .alignment(Alignment::Center)
                .style(Style::default().fg(palette.dim)),
            rows[4],
        );
    }
}

fn draw_done(frame: &mut Frame, app: &App, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let (_, total) = app.progress();
    frame.render_widget(
        Paragraph::new(format!("read {} words", total))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.text)),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new("space to read again, esc for the deck")
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.dim)),
        rows[3],
    );
}

/// Builds the one-line word display: padding so the fixation glyph sits
/// at [`FIXATION_COLUMN`], with the fixation glyph bold in the accent
/// color. `fixation` is a char index; the grapheme containing that char
/// is the one highlighted.
pub fn render_word(word: &str, fixation: usize, palette: &Palette) -> Paragraph<'static> {
    let mut pieces: Vec<(String, bool)> = Vec::new();
    let mut chars_seen = 0usize;
    let mut fixation_found = false;

    for grapheme in word.graphemes(true) {
        let char_count = grapheme.chars().count().max(1);
        let is_fixation = !fixation_found && fixation < chars_seen + char_count;
        if is_fixation {
            fixation_found = true;
        }
        pieces.push((grapheme.to_string(), is_fixation));
        chars_seen += char_count;
    }

    let mut spans = vec![Span::raw(" ".repeat(fixation_padding(word, fixation)))];
    for (text, is_fixation) in pieces {
        let style = if is_fixation {
            Style::default()
                .fg(palette.fixation)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        spans.push(Span::styled(text, style));
    }

    Paragraph::new(Line::from(spans)).alignment(Alignment::Left)
}

/// Spaces to insert before `word` so the grapheme holding the fixation
/// char lands at [`FIXATION_COLUMN`]. Extremely long prefixes saturate
/// to zero and the word simply starts at the left edge.
fn fixation_padding(word: &str, fixation: usize) -> usize {
    let mut chars_seen = 0usize;
    let mut prefix_width = 0usize;
    for grapheme in word.graphemes(true) {
        let char_count = grapheme.chars().count().max(1);
        if fixation < chars_seen + char_count {
            break;
        }
        prefix_width += grapheme.width();
        chars_seen += char_count;
    }
    FIXATION_COLUMN.saturating_sub(prefix_width)
}

/// A fixed-width bar with the token counts alongside.
pub fn render_progress_bar(progress: (usize, usize), palette: &Palette) -> Line<'static> {
    let (current, total) = progress;
    let filled = if total == 0 {
        0
    } else {
        (current * PROGRESS_BAR_CELLS) / total
    };

    let mut spans = Vec::new();
    for _ in 0..filled {
        spans.push(Span::styled("─", Style::default().fg(palette.bar)));
    }
    for _ in filled..PROGRESS_BAR_CELLS {
        spans.push(Span::styled("─", Style::default().fg(palette.dim)));
    }
    spans.push(Span::styled(
        format!(" {}/{}", current, total),
        Style::default().fg(palette.dim),
    ));

    Line::from(spans).alignment(Alignment::Center)
}

fn render_status_line(app: &App, palette: &Palette) -> Paragraph<'static> {
    let phase = match app.phase() {
        Phase::Playing => "reading",
        Phase::Paused => "paused",
        Phase::Completed => "done",
        Phase::Idle => "idle",
    };
    let text = format!(
        "{} wpm   {} ms pause   {}",
        app.wpm(),
        app.base_pause_ms(),
        phase
    );
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.dim))
}

fn render_help(palette: &Palette) -> Paragraph<'static> {
    let lines = [
        ":q :quit        leave glance",
        ":h :help        toggle this panel",
        ":w :wpm N       words per minute (100-1000)",
        ":p :pause N     pause unit in ms (0-3000)",
        "@path           read a text file",
        "@@              read the clipboard",
        "anything else   read the typed text itself",
        "",
        "while reading:  space pause, + - speed, [ ] pause,",
        "                digits seek, arrows step when paused",
    ];
    let text: Vec<Line> = lines.iter().map(|l| Line::from(*l)).collect();
    Paragraph::new(text)
        .alignment(Alignment::Left)
        .style(Style::default().fg(palette.dim))
}

fn centered_columns(area: Rect, width: u16) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(area)[1]
}
