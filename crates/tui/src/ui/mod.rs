pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    // Main layout: info bar, preset bar, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Preset bar
            Constraint::Min(0),    // History
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::presets::render_presets(frame, layout[1], state.history.range(), &theme);
    screens::history::render(frame, layout[2], state);
    render_bottom_bar(frame, layout[3], state, &theme);

    match state.mode {
        Mode::Browse => {}
        Mode::Picker => screens::picker::render(frame, area, state),
        Mode::Detail => screens::detail::render(frame, area, state),
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let link = state
        .history
        .share_link()
        .map(|link| format!("/history?{link}"))
        .unwrap_or_else(|| "/history".to_string());
    let (status, status_style) = match state.last_error.as_deref() {
        None => ("OK".to_string(), Style::default().fg(theme.positive)),
        Some(err) => (format!("ERR {err}"), Style::default().fg(theme.error)),
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Link", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {link}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::hints::hints_to_spans(
        components::hints::for_mode(state.mode),
        theme,
    );

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
