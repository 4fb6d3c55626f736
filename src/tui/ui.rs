use crate::tui::app::App;
use crate::tui::colors;
use crate::{format_count, Notification, NotificationKind, ResultRow};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let notifications = app.controller.notifications();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                          // Search bar
            Constraint::Length(notifications.len() as u16), // Notifications
            Constraint::Min(5),                             // Results
            Constraint::Length(1),                          // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    draw_notifications(frame, &notifications, chunks[1]);
    draw_results(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    if app.search.focused {
        // Border (1) + space (1) + search icon (2 cols) + space (1)
        let cursor_x = chunks[0].x + 5 + app.search.cursor_column();
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search users (Enter to submit) ");

    let search_text = format!(" \u{1F50D} {}", app.search.query);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// One line per notification; error and loading can show together
fn draw_notifications(frame: &mut Frame, notifications: &[Notification], area: Rect) {
    for (i, notification) in notifications.iter().enumerate() {
        if i as u16 >= area.height {
            break;
        }
        let (fg, bg) = colors::notification_colors(notification.kind);
        let icon = match notification.kind {
            NotificationKind::Error => "\u{26A0}",
            NotificationKind::Loading => "\u{23F3}",
        };
        let line_area = Rect::new(area.x, area.y + i as u16, area.width, 1);
        let text = format!(" {} {}", icon, notification.message);
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)),
            line_area,
        );
    }
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    // Area height minus header row
    let inner_height = area.height.saturating_sub(1) as usize;
    app.table.visible_rows = inner_height;

    let header = Row::new(["#", "Login", "Type", "Profile", "Score"].map(|name| {
        Cell::from(name).style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 95, 135))
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    let total = app.controller.profiles().len();
    let viewport = app.table.viewport(total);
    let more_available = app
        .controller
        .session()
        .map(|s| !s.is_exhausted())
        .unwrap_or(false);

    let rows: Vec<Row> = app
        .controller
        .rows()
        .skip(viewport.start)
        .take(viewport.len())
        .enumerate()
        .map(|(visual_idx, row)| {
            render_row(row, visual_idx, app.table.selected == Some(row.index), more_available)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(28),
        Constraint::Length(16),
        Constraint::Fill(1),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(table, area);
}

/// Render one profile. The sentinel row gets a marker while more pages exist.
fn render_row<'a>(row: ResultRow<'a>, visual_idx: usize, is_selected: bool, more: bool) -> Row<'a> {
    let profile = row.profile;

    let bg = if is_selected {
        Color::Rgb(60, 60, 80)
    } else if visual_idx % 2 == 1 {
        Color::Rgb(25, 25, 35)
    } else {
        Color::Reset
    };
    let fg_modifier = if is_selected {
        Modifier::BOLD
    } else {
        Modifier::empty()
    };

    let marker = if row.is_sentinel && more { "\u{2193}" } else { " " };
    let index_cell = Cell::from(format!("{}{:>4}", marker, row.index + 1))
        .style(Style::default().fg(Color::DarkGray).bg(bg));

    let icon = colors::icon_for_account(&profile.account_type);
    let login_cell = Cell::from(format!("{} {}", icon, profile.login)).style(
        Style::default()
            .fg(colors::color_for_account(&profile.account_type))
            .bg(bg)
            .add_modifier(fg_modifier),
    );
    let type_cell = Cell::from(colors::type_label(&profile.account_type)).style(
        Style::default()
            .fg(Color::DarkGray)
            .bg(bg)
            .add_modifier(Modifier::ITALIC),
    );
    let url_cell =
        Cell::from(profile.html_url.as_str()).style(Style::default().fg(Color::Gray).bg(bg));
    let score_cell = Cell::from(format!("{:.1}", profile.score))
        .style(Style::default().fg(Color::Green).bg(bg));

    Row::new(vec![index_cell, login_cell, type_cell, url_cell, score_cell])
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let left_text = match controller.session() {
        None => format!(" {}", app.status_message),
        Some(session) => {
            let total = session
                .total_count()
                .map(format_count)
                .unwrap_or_else(|| "?".to_string());
            format!(
                " '{}' | {} of {} loaded | page {} | {}",
                session.query(),
                format_count(session.profiles().len() as u64),
                total,
                session.page(),
                app.status_message
            )
        }
    };

    let right_text = " Enter:Search/Open  Tab:Focus  \u{2191}\u{2193}:Scroll  y:Copy URL  Ctrl+Q:Quit ";

    let available_width = area.width as usize;
    let left_len = left_text.chars().count();
    let right_len = right_text.chars().count();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let paragraph = Paragraph::new(status_str).style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(40, 40, 50)),
    );
    frame.render_widget(paragraph, area);
}
