use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::view::{EditDialog, Field, Fields, Rendering};

const FIELDS: [Field; 3] = [Field::Title, Field::Description, Field::DueDate];

pub fn draw<B: Backend, S>(f: &mut Frame<B>, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.size());

    let form_focus = match app.focus {
        Focus::Form(field) if app.view.edit_dialog.is_none() => Some(field),
        _ => None,
    };
    draw_fields(f, &app.view.form.fields, form_focus, chunks[0]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);
    draw_list(
        f,
        "Pending",
        app.view.pending(),
        app.focus == Focus::Pending,
        app.pending_selected,
        lists[0],
    );
    draw_list(
        f,
        "Completed",
        app.view.completed(),
        app.focus == Focus::Completed,
        app.completed_selected,
        lists[1],
    );

    draw_footer(f, app, chunks[2]);

    if let Some(dialog) = &app.view.edit_dialog {
        draw_edit_dialog(f, dialog);
    }
    if let Some(alert) = &app.view.alert {
        draw_alert(f, alert);
    }
}

fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_fields<B: Backend>(f: &mut Frame<B>, fields: &Fields, focus: Option<Field>, area: Rect) {
    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(30),
                Constraint::Percentage(45),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(area);

    for (field, area) in FIELDS.iter().zip(inputs.iter()) {
        let focused = focus == Some(*field);
        let value = fields.get(*field);
        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .title(field.label())
                .border_style(border(focused)),
        );
        f.render_widget(input, *area);

        if focused {
            f.set_cursor(cursor_x(*area, value), area.y + 1);
        }
    }
}

fn rendering_item(rendering: &Rendering) -> ListItem<'static> {
    let muted = if rendering.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    ListItem::new(vec![
        Spans::from(Span::styled(
            rendering.title.clone(),
            muted.fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(
            rendering.description.clone(),
            muted.fg(Color::LightBlue),
        )),
        Spans::from(vec![
            Span::styled("Due: ", muted.add_modifier(Modifier::BOLD)),
            Span::styled(rendering.due_label(), muted),
            Span::raw("  "),
            Span::styled("Created on: ", muted.add_modifier(Modifier::BOLD)),
            Span::styled(rendering.created_label(), muted),
        ]),
        Spans::from(""),
    ])
}

fn draw_list<B: Backend>(
    f: &mut Frame<B>,
    title: &str,
    renderings: &[Rendering],
    focused: bool,
    selected: usize,
    area: Rect,
) {
    let items: Vec<ListItem> = renderings.iter().map(rendering_item).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{title} ({})", renderings.len()))
                .border_style(border(focused)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if focused && !renderings.is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_footer<B: Backend, S>(f: &mut Frame<B>, app: &App<S>, area: Rect) {
    let mut spans = vec![Span::styled(
        format!("sort: {} ", app.sort()),
        Style::default().fg(Color::Green),
    )];
    if app.busy {
        spans.push(Span::styled("working… ", Style::default().fg(Color::Yellow)));
    }
    match &app.status {
        Some(status) => spans.push(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )),
        None => spans.push(Span::styled(
            "tab focus · enter add · d done · u not done · e edit · x delete · s sort · r refresh · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    }
    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}

fn draw_edit_dialog<B: Backend>(f: &mut Frame<B>, dialog: &EditDialog) {
    let area = centered_rect(60, 11, f.size());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Edit task (enter save · esc cancel)")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3); 3].as_ref())
        .split(inner);
    for (field, row) in FIELDS.iter().zip(rows.iter()) {
        let focused = dialog.focus == *field;
        let value = dialog.fields.get(*field);
        f.render_widget(
            Paragraph::new(value).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(field.label())
                    .border_style(border(focused)),
            ),
            *row,
        );
        if focused {
            f.set_cursor(cursor_x(*row, value), row.y + 1);
        }
    }
}

fn draw_alert<B: Backend>(f: &mut Frame<B>, message: &str) {
    let area = centered_rect(50, 5, f.size());
    f.render_widget(Clear, area);
    let alert = Paragraph::new(vec![
        Spans::from(Span::styled(
            message.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled("press enter", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Alert")
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(alert, area);
}

/// Column just past `value` inside a bordered input, clamped to the last
/// inner column.
fn cursor_x(area: Rect, value: &str) -> u16 {
    let typed = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
    let last = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(typed).min(last)
}

/// `percent_x` wide, `height` rows tall, centred in `r`.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let scaled = u32::from(r.width) * u32::from(percent_x.min(100)) / 100;
    let width = u16::try_from(scaled).unwrap_or(r.width);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
