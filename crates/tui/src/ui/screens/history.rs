use api_types::expense::{CategoryRef, ExpenseRecord};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use engine::{MoneyCents, Summary};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let block = Block::default()
        .title(Span::styled(" History ", Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.history.is_loading() {
        render_message(frame, inner, "Loading expenses...", &theme);
        return;
    }

    // After a failed fetch the records still belong to the last applied range.
    let Some(range) = state
        .history
        .applied_range()
        .or_else(|| state.history.range())
    else {
        render_message(
            frame,
            inner,
            "No date range selected. Pick a range above to view history.",
            &theme,
        );
        return;
    };

    let summary = state.history.summary();
    let breakdown_height = if state.show_breakdown {
        summary.breakdown.len().max(1) as u16
    } else {
        0
    };

    // Layout: range line, summary card, record list
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5 + breakdown_height),
            Constraint::Min(3),
        ])
        .split(inner);

    let range_line = Line::from(vec![
        Span::styled("Showing records from ", Style::default().fg(theme.text_muted)),
        Span::styled(
            format_day(range.from(), &state.timezone),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to ", Style::default().fg(theme.text_muted)),
        Span::styled(
            format_day(range.to(), &state.timezone),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(range_line), layout[0]);

    render_summary(frame, layout[1], state, summary, &theme);
    render_records(frame, layout[2], state, &theme);
}

fn render_message(frame: &mut Frame<'_>, area: Rect, message: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            message.to_string(),
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        area,
    );
}

fn render_summary(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    summary: &Summary,
    theme: &Theme,
) {
    let block = Block::default()
        .title(Span::styled(" Summary ", Style::default().fg(theme.accent)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let symbol = state.currency_symbol.as_str();
    let toggle = if state.show_breakdown { "▲" } else { "▼" };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Total Expenses: ", Style::default().fg(theme.text_muted)),
            Span::styled(
                summary.total_count.to_string(),
                Style::default()
                    .fg(theme.amount)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total Amount:   ", Style::default().fg(theme.text_muted)),
            Span::styled(
                summary.total_amount.format(symbol),
                Style::default()
                    .fg(theme.amount)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("b", Style::default().fg(theme.accent)),
            Span::styled(
                format!(" Category Breakdown {toggle}"),
                Style::default().fg(theme.accent),
            ),
        ]),
    ];

    if state.show_breakdown {
        if summary.breakdown.is_empty() {
            lines.push(Line::from(Span::styled(
                "No categories to display.",
                Style::default()
                    .fg(theme.dim)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        for category in summary.breakdown.iter() {
            let plural = if category.count == 1 { "" } else { "s" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}", category.name),
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        ": {} expense{plural} ({})",
                        category.count,
                        category.amount.format(symbol)
                    ),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_records(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let records = state.history.records();
    let block = Block::default()
        .title(Span::styled(
            format!(" Expenses ({}) ", records.len()),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if records.is_empty() {
        render_message(frame, inner, "No expenses found for this range.", theme);
        return;
    }

    // Keep the selected row visible.
    let height = inner.height as usize;
    let offset = state.selected.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = records
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, record)| record_line(record, i == state.selected, state, theme))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn record_line(
    record: &ExpenseRecord,
    selected: bool,
    state: &AppState,
    theme: &Theme,
) -> Line<'static> {
    let row_style = if selected {
        Style::default().bg(theme.selected_bg)
    } else {
        Style::default()
    };
    let marker = if selected { "▸ " } else { "  " };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(
            format!("{:<24}", truncate(&record.title, 23)),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!("{:<13}", format_day(record.date, &state.timezone)),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(
            format!(
                "{:>12}",
                MoneyCents::from_major(record.amount).format(&state.currency_symbol)
            ),
            Style::default().fg(theme.amount),
        ),
        Span::raw("  "),
        Span::styled(
            category_label(record.category.as_ref()).to_string(),
            Style::default().fg(theme.accent),
        ),
    ])
    .style(row_style)
}

pub(crate) fn format_day(instant: DateTime<Utc>, tz: &Tz) -> String {
    instant.with_timezone(tz).format("%d %b %Y").to_string()
}

/// Category as shown on a single record (`N/A` when missing).
pub(crate) fn category_label(category: Option<&CategoryRef>) -> &str {
    let label = match category {
        Some(CategoryRef::Expanded(category)) => category.name.as_str(),
        Some(CategoryRef::Reference(id)) => id.as_str(),
        None => "",
    };
    if label.trim().is_empty() { "N/A" } else { label }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
