use engine::MoneyCents;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::centered_box,
        screens::history::{category_label, format_day},
        theme::Theme,
    },
};

/// Read-only detail of the selected expense.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(record) = state.selected_record() else {
        return;
    };
    let theme = Theme::default();
    let popup = centered_box(50, 10, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", record.title),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused));

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<13}"), Style::default().fg(theme.dim)),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    };

    let lines = vec![
        field(
            "Amount",
            MoneyCents::from_major(record.amount).format(&state.currency_symbol),
        ),
        field("Date", format_day(record.date, &state.timezone)),
        field(
            "Category",
            category_label(record.category.as_ref()).to_string(),
        ),
        field(
            "Description",
            record
                .description
                .clone()
                .filter(|description| !description.trim().is_empty())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        popup,
    );
}
