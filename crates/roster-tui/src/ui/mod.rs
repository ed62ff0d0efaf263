use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use roster_core::time::format_timestamp_datetime;

use crate::app::{App, ConfirmState, Mode, StudentForm, LIST_EMPTY, LIST_LOADING};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(size);

    render_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_list(frame, body[0], app);
    render_form(frame, body[1], &app.form, app.mode == Mode::Form);

    render_footer(frame, chunks[2], app);

    if let Mode::Confirm(state) = &app.mode {
        render_confirm(frame, size, state);
    }
    if app.show_help {
        render_help(frame, size);
    }
    if let Some(message) = &app.alert {
        render_alert(frame, size, message);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let title = format!(
        "roster  students: {}  api: {}",
        app.students.len(),
        app.api_label
    );
    let block = Block::default().borders(Borders::ALL).title("roster");
    let paragraph = Paragraph::new(Line::from(title)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hint = match app.mode {
        Mode::List => "j/k move  a add  e/enter edit  d delete  r refresh  ? help  q quit",
        Mode::Form => "tab next  shift+tab prev  enter select  esc cancel",
        Mode::Confirm(_) => "y confirm  n cancel",
    };

    let mut lines = vec![Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Students");
    if app.loading || app.students.is_empty() {
        let text = if app.loading { LIST_LOADING } else { LIST_EMPTY };
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .students
        .iter()
        .map(|student| {
            let editing = app.form.editing == Some(student.id);
            let name_style = if editing {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            ListItem::new(Line::from(vec![
                Span::styled(student.full_name.clone(), name_style),
                Span::raw("  "),
                Span::raw(student.email.clone()),
                Span::raw("  "),
                Span::styled(student.course.clone(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(
                    format_timestamp_datetime(student.created_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ");

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, form: &StudentForm, active: bool) {
    let title = if form.editing.is_some() {
        "Edit Student"
    } else {
        "Add Student"
    };
    let border_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let mut lines = Vec::new();
    for (index, field) in StudentForm::FIELDS.iter().enumerate() {
        lines.push(field_line(
            field.label(),
            form.value(*field),
            active && form.focus == index,
        ));
        if let Some(message) = form.error_for(*field) {
            lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from(""));

    let save_style = if active && form.is_save_focus() {
        Style::default().fg(Color::Black).bg(Color::LightGreen)
    } else {
        Style::default().fg(Color::Green)
    };
    let cancel_style = if active && form.is_cancel_focus() {
        Style::default().fg(Color::Black).bg(Color::LightRed)
    } else {
        Style::default().fg(Color::Red)
    };
    lines.push(Line::from(vec![
        Span::styled("[Save]", save_style),
        Span::raw("  "),
        Span::styled("[Cancel]", cancel_style),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, state: &ConfirmState) {
    let modal = centered_rect(50, 20, area);
    frame.render_widget(Clear, modal);
    let paragraph = Paragraph::new(state.message.clone())
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, modal);
}

fn render_alert(frame: &mut Frame<'_>, area: Rect, message: &str) {
    let modal = centered_rect(50, 25, area);
    frame.render_widget(Clear, modal);
    let text = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "enter to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let modal = centered_rect(60, 50, area);
    frame.render_widget(Clear, modal);

    let text = vec![
        Line::from("Global: Ctrl+C quit"),
        Line::from("List: j/k move, a add, e or enter edit, d delete, r refresh, ? help, q quit"),
        Line::from("Form: tab/shift+tab move, enter activate, esc cancel, Ctrl+U clear, Ctrl+W delete word"),
        Line::from("Confirm: y delete, n or esc keep"),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(
            format!("{}: ", label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(value.to_string(), style),
    ])
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
