use engine::{DateRange, PRESETS, active_preset};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Renders the preset bar: `1 7D  2 1M ... c Custom`.
///
/// The preset matching the current range is highlighted; a range matching no
/// preset highlights "Custom" instead.
pub fn render_presets(frame: &mut Frame<'_>, area: Rect, range: Option<&DateRange>, theme: &Theme) {
    let active = range.and_then(active_preset).map(|preset| preset.days);
    let custom_active = range.is_some() && active.is_none();

    let mut spans = vec![Span::raw(" ")];
    for (i, preset) in PRESETS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("{} ", i + 1),
            Style::default().fg(theme.dim),
        ));
        spans.extend(label(preset.label, active == Some(preset.days), theme));
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled("c ", Style::default().fg(theme.dim)));
    spans.extend(label("Custom", custom_active, theme));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn label(text: &'static str, active: bool, theme: &Theme) -> Vec<Span<'static>> {
    if active {
        vec![
            Span::styled("[", Style::default().fg(theme.accent)),
            Span::styled(
                text,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("]", Style::default().fg(theme.accent)),
        ]
    } else {
        vec![Span::styled(text, Style::default().fg(theme.text_muted))]
    }
}
