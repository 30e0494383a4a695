use chrono::Datelike;
use engine::{Picker, Selection};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::AppState,
    ui::{components::centered_box, theme::Theme},
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(picker) = state.picker.as_ref() else {
        return;
    };
    let theme = Theme::default();
    let popup = centered_box(40, 15, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            " Custom Date Range ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Month header
            Constraint::Length(1), // Weekdays
            Constraint::Length(6), // Weeks
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Selection
            Constraint::Min(0),
        ])
        .split(inner);

    let grid = picker.grid();
    let header = Line::from(vec![
        Span::styled("← ", Style::default().fg(theme.accent)),
        Span::styled(
            format!("{} {}", month_name(grid.month), grid.year),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" →", Style::default().fg(theme.accent)),
    ]);
    frame.render_widget(
        Paragraph::new(header).alignment(Alignment::Center),
        layout[0],
    );

    let weekdays: Vec<Span> = WEEKDAYS
        .iter()
        .map(|day| Span::styled(format!("{day:>4} "), Style::default().fg(theme.text_muted)))
        .collect();
    frame.render_widget(Paragraph::new(Line::from(weekdays)), layout[1]);

    let weeks: Vec<Line> = grid
        .weeks()
        .iter()
        .map(|week| {
            Line::from(
                week.iter()
                    .map(|cell| day_cell(*cell, picker, &theme))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(weeks), layout[2]);

    frame.render_widget(
        Paragraph::new(selection_line(picker.selection(), &theme)).alignment(Alignment::Center),
        layout[4],
    );
}

fn day_cell(cell: Option<chrono::NaiveDate>, picker: &Picker, theme: &Theme) -> Span<'static> {
    let Some(day) = cell else {
        return Span::raw("     ");
    };
    let selection = picker.selection();

    let mut style = if selection.is_endpoint(day) {
        Style::default()
            .bg(theme.accent)
            .fg(theme.text)
            .add_modifier(Modifier::BOLD)
    } else if selection.contains(day) {
        Style::default().bg(theme.range_bg).fg(theme.text)
    } else {
        Style::default().fg(theme.text)
    };
    if day == picker.cursor() {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Span::styled(format!("{:>4} ", day.day()), style)
}

fn selection_line(selection: Selection, theme: &Theme) -> Line<'static> {
    let text = match selection {
        Selection::Empty => "Pick the first day".to_string(),
        Selection::AnchorSet { from } => format!("{} → pick the last day", from.format("%d %b")),
        Selection::RangeSet { from, to } => {
            format!("{} → {}  (a to apply)", from.format("%d %b"), to.format("%d %b"))
        }
    };
    Line::from(Span::styled(text, Style::default().fg(theme.text_muted)))
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
