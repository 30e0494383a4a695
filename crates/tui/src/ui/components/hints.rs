use ratatui::{style::Style, text::Span};

use crate::{app::Mode, ui::theme::Theme};

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

const BROWSE: &[KeyHint] = &[
    KeyHint::new("1-5", "preset"),
    KeyHint::new("c", "custom"),
    KeyHint::new("b", "breakdown"),
    KeyHint::new("j/k", "move"),
    KeyHint::new("Enter", "detail"),
    KeyHint::new("r", "refresh"),
];

const PICKER: &[KeyHint] = &[
    KeyHint::new("←↑↓→", "day"),
    KeyHint::new("</>", "month"),
    KeyHint::new("Space", "pick"),
    KeyHint::new("a", "apply"),
    KeyHint::new("Esc", "cancel"),
];

const DETAIL: &[KeyHint] = &[KeyHint::new("Esc", "back")];

/// Hints for the current mode.
pub fn for_mode(mode: Mode) -> &'static [KeyHint] {
    match mode {
        Mode::Browse => BROWSE,
        Mode::Picker => PICKER,
        Mode::Detail => DETAIL,
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}
