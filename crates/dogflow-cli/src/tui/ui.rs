//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use dogflow_core::session::{self, Progress};
use dogflow_db::DocumentStore;

use super::app::{App, View};
use crate::format;

/// Render the current view.
pub fn render<S: DocumentStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match &app.current_view {
        View::Today => render_today(f, app, chunks[0]),
        View::ChecklistDetail(template) => render_checklist(f, app, template, chunks[0]),
        View::History => render_history(f, app, chunks[0]),
        View::Costs => render_costs(f, app, chunks[0]),
        View::Help => render_help(f, chunks[0]),
    }

    render_status_bar(f, app, chunks[1]);
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    Row::new(cells).height(1)
}

fn render_today<S: DocumentStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let rows = app.today_rows.iter().enumerate().map(|(i, row)| {
        let (progress, status) = match &row.progress {
            Some(p) => (p.to_string(), progress_status(p)),
            None => (
                "-".to_string(),
                Span::styled("not started", Style::default().fg(Color::DarkGray)),
            ),
        };
        Row::new(vec![
            Cell::from(row.template_name.clone()),
            Cell::from(progress),
            Cell::from(status),
        ])
        .style(selected_style(i == app.selected_row))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Checklist", "Progress", "Status"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Today {} ", app.today)),
    );

    f.render_widget(table, area);
}

fn render_checklist<S: DocumentStore>(f: &mut Frame, app: &App<S>, template: &str, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let header_text = match &app.checklist {
        Some(checklist) => format!(
            " {} | {} | {}",
            checklist.template_name,
            checklist.date,
            session::progress(checklist)
        ),
        None => format!(" {template}"),
    };
    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Checklist "),
    );
    f.render_widget(header, chunks[0]);

    let items = app.checklist.as_ref().map(|c| c.items.as_slice()).unwrap_or_default();
    let rows = items.iter().enumerate().map(|(i, item)| {
        let mark = if item.done {
            Span::styled("[x]", Style::default().fg(Color::Green))
        } else {
            Span::styled("[ ]", Style::default().fg(Color::DarkGray))
        };
        let done_at = item
            .completed_at
            .map(format::timestamp)
            .unwrap_or_default();
        Row::new(vec![
            Cell::from(format!("{:02}", i + 1)),
            Cell::from(mark),
            Cell::from(item.name.clone()),
            Cell::from(done_at),
        ])
        .style(selected_style(i == app.selected_item))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Percentage(70),
            Constraint::Length(20),
        ],
    )
    .header(header_row(&["#", "", "Item", "Done at"]))
    .block(Block::default().borders(Borders::ALL).title(" Items "));

    f.render_widget(table, chunks[1]);
}

fn render_history<S: DocumentStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let rows = app.history.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.checklist.date.to_string()),
            Cell::from(entry.checklist.template_name.clone()),
            Cell::from(format::progress_cell(&entry.progress)),
            Cell::from(progress_status(&entry.progress)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Percentage(50),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header_row(&["Date", "Checklist", "Progress", "Status"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" History ({}) ", app.history.len())),
    );

    f.render_widget(table, area);
}

fn render_costs<S: DocumentStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let rows = app.costs.iter().map(|row| {
        let margin_style = if row.margin_percent.is_sign_negative() && !row.margin_percent.is_zero() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Row::new(vec![
            Cell::from(row.product_name.clone()),
            Cell::from(format::money(&app.currency, row.total_cost)),
            Cell::from(format::money(&app.currency, row.sale_price)),
            Cell::from(format!("{}%", format::percent(row.margin_percent))).style(margin_style),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(10),
        ],
    )
    .header(header_row(&["Product", "Cost", "Price", "Margin"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Costs & Margins (unit) "),
    );

    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )])
    };
    let text = vec![
        Line::from(""),
        section("  Navigation"),
        Line::from("    j/Down    Move down"),
        Line::from("    k/Up      Move up"),
        Line::from("    Enter     Open today's checklist for the selected template"),
        Line::from("    Esc/q     Back / Quit"),
        Line::from("    Tab       Cycle Today / History / Costs"),
        Line::from(""),
        section("  Actions"),
        Line::from("    Space/x   Check or uncheck the selected item"),
        Line::from(""),
        section("  Other"),
        Line::from("    ?         Show this help"),
        Line::from(""),
    ];

    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, area);
}

fn render_status_bar<S: DocumentStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let view_name = match &app.current_view {
        View::Today => "Today",
        View::ChecklistDetail(_) => "Checklist",
        View::History => "History",
        View::Costs => "Costs",
        View::Help => "Help",
    };

    let pending = app
        .today_rows
        .iter()
        .filter(|r| r.progress.is_some_and(|p| !p.is_complete()))
        .count();

    let status_msg = app.status_message.as_deref().unwrap_or("");

    let bar = Line::from(vec![
        Span::styled(
            format!(" {view_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        if pending > 0 {
            Span::styled(
                format!("{pending} open today"),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::styled("nothing open today", Style::default().fg(Color::DarkGray))
        },
        Span::raw("  "),
        Span::styled(status_msg, Style::default().fg(Color::Green)),
        Span::raw("  q:back  ?:help  Tab:switch view"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn progress_status(progress: &Progress) -> Span<'static> {
    let (text, color) = if progress.is_complete() {
        ("approved", Color::Green)
    } else if progress.done > 0 {
        ("in progress", Color::Cyan)
    } else {
        ("pending", Color::DarkGray)
    };
    Span::styled(text, Style::default().fg(color))
}
