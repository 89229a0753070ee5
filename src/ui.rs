use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Gauge, List, ListItem, ListState, Paragraph, Row, Table,
        Tabs, Wrap,
    },
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::app::{App, AuthMode, EventForm, LinkForm, ProfileForm, Screen, Tab, ToastKind, AVATARS};
use crate::calendar::MonthCursor;

const ACCENT: Color = Color::Magenta;
const MUTED: Color = Color::DarkGray;

pub fn draw(app: &App, f: &mut Frame) {
    match app.screen {
        Screen::Auth => render_auth(app, f),
        Screen::Dashboard => render_dashboard(app, f),
    }
    render_toasts(app, f);
}

fn render_auth(app: &App, f: &mut Frame) {
    let area = centered_rect(50, 60, f.area());
    let title = match app.auth.mode {
        AuthMode::Login => "CozySpace — Sign In",
        AuthMode::Register => "CozySpace — Create Account",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
    f.render_widget(Clear, area);
    f.render_widget(&block, area);
    let inner = block.inner(area);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Your cozy corner of the internet",
        Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
    ))];
    lines.push(Line::default());

    let fields: Vec<(&str, String, bool)> = match app.auth.mode {
        AuthMode::Login => vec![
            ("Email", app.auth.email.clone(), false),
            ("Password", app.auth.password.clone(), true),
        ],
        AuthMode::Register => vec![
            ("Name", app.auth.name.clone(), false),
            ("Email", app.auth.email.clone(), false),
            ("Password", app.auth.password.clone(), true),
            ("Confirm", app.auth.confirm.clone(), true),
        ],
    };
    for (i, (label, value, masked)) in fields.into_iter().enumerate() {
        let shown = if masked {
            "•".repeat(value.chars().count())
        } else {
            value
        };
        let style = if i == app.auth.field {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>9}: "), style),
            Span::raw(shown),
            if i == app.auth.field {
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))
            } else {
                Span::raw("")
            },
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!(
            "demo: {} / {}",
            crate::profile::DEMO_EMAIL,
            crate::profile::DEMO_PASSWORD
        ),
        Style::default().fg(MUTED),
    )));
    lines.push(Line::from(Span::styled(
        "(tab) next field  (enter) submit  (ctrl-r) switch mode  (esc) quit",
        Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_dashboard(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // widget body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_header(app, f, chunks[0]);

    let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.to_string()).collect::<Vec<_>>())
        .select(app.tab.index())
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .divider("·");
    f.render_widget(tabs, chunks[1]);

    match app.tab {
        Tab::Todos => render_todos(app, f, chunks[2]),
        Tab::Timer => render_timer(app, f, chunks[2]),
        Tab::Notes => render_notes(app, f, chunks[2]),
        Tab::Links => render_links(app, f, chunks[2]),
        Tab::Calendar => render_calendar(app, f, chunks[2]),
        Tab::Profile => render_profile(app, f, chunks[2]),
    }

    render_footer(app, f, chunks[3]);

    if let Some(input) = &app.todo_input {
        render_todo_input(input, f);
    } else if let Some(form) = &app.link_form {
        render_link_form(form, f);
    } else if let Some(form) = &app.event_form {
        render_event_form(form, f);
    } else if let Some(form) = &app.profile_form {
        render_profile_form(form, f);
    }
}

fn render_header(app: &App, f: &mut Frame, area: Rect) {
    let name = app
        .data
        .user
        .as_ref()
        .map(|u| u.name.as_str())
        .unwrap_or("friend");
    let stats = &app.data.timer.stats;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Good {}, {}! ", app.greeting(), name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                Local::now().format("%A, %B %-d").to_string(),
                Style::default().fg(MUTED),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "{} sessions today · {}h focused · {} day streak · {} tasks done",
                stats.sessions_today,
                stats.total_focus_hours(),
                stats.current_streak,
                stats.tasks_completed
            ),
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_footer(app: &App, f: &mut Frame, area: Rect) {
    let hints = match app.tab {
        Tab::Todos => "(a)dd  (space) toggle  (d)elete  (j/k) move",
        Tab::Timer => "(s)tart (p)ause (r)eset  [/] focus  {/} break  (m)usic (n)otify (b)reaks",
        Tab::Notes => "(e)dit  (o) export  (x) clear",
        Tab::Links => "(a)dd  (o)pen  (d)elete  (j/k) move",
        Tab::Calendar => "(a)dd event  (j/k) select  (d)elete  (h/l) month  (t)oday",
        Tab::Profile => "(e)dit  (x) export data  (z) reset  l(o)gout",
    };
    let line = Line::from(vec![
        Span::styled(hints, Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)),
        Span::raw("   "),
        Span::styled(
            format!("♪ {}", app.ambient_status),
            Style::default().fg(MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_todos(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(
            "Tasks ({} remaining)",
            app.data.todos.incomplete_count()
        ))
        .borders(Borders::ALL);
    if app.data.todos.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press (a) to add one!")
            .style(Style::default().fg(MUTED))
            .block(block);
        f.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = app
        .data
        .todos
        .items()
        .iter()
        .map(|t| {
            let mark = if t.completed { "☑" } else { "☐" };
            let style = if t.completed {
                Style::default().fg(MUTED).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{mark} ")),
                Span::styled(t.text.clone(), style),
                Span::styled(
                    format!("  {}", humanized_age(t.created_at)),
                    Style::default().fg(MUTED),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(60, 50, 80)))
        .highlight_symbol("▸ ");
    let mut state = ListState::default().with_selected(Some(app.todo_sel));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_timer(app: &App, f: &mut Frame, area: Rect) {
    let timer = &app.data.timer;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(2), // mode + session
            Constraint::Length(3), // gauge
            Constraint::Length(1), // status
            Constraint::Min(1),    // settings
        ])
        .split(area);

    let mode_color = match timer.mode() {
        crate::timer::Mode::Focus => ACCENT,
        crate::timer::Mode::Break => Color::Green,
    };
    let header = vec![
        Line::from(Span::styled(
            timer.mode().label(),
            Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Session #{}", timer.session_number()),
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(mode_color))
        .ratio(timer.progress())
        .label(timer.formatted_time());
    f.render_widget(gauge, chunks[1]);

    let status = if timer.auto_start_pending() {
        "Break starting shortly..."
    } else if timer.is_running() {
        "Running"
    } else {
        "Paused"
    };
    f.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(MUTED))),
        chunks[2],
    );

    let s = &timer.settings;
    let on_off = |b: bool| if b { "ON" } else { "OFF" };
    let settings = vec![
        Line::default(),
        Line::from(format!(
            "Focus: {} min   Break: {} min",
            s.focus_duration_mins, s.break_duration_mins
        )),
        Line::from(format!(
            "Ambient sound: {}   Notifications: {}   Auto-start breaks: {}",
            on_off(s.ambient_sound),
            on_off(s.notifications),
            on_off(s.auto_start_breaks)
        )),
    ];
    f.render_widget(
        Paragraph::new(settings).style(Style::default().fg(MUTED)),
        chunks[3],
    );
}

fn render_notes(app: &App, f: &mut Frame, area: Rect) {
    let title = if app.notes_editing {
        format!("Notes — editing ({} words)", app.data.notes.word_count())
    } else {
        format!("Notes ({} words)", app.data.notes.word_count())
    };
    let border = if app.notes_editing {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    let body = if app.data.notes.is_empty() && !app.notes_editing {
        Paragraph::new("Capture your thoughts... press (e) to start writing.")
            .style(Style::default().fg(MUTED))
    } else {
        Paragraph::new(app.data.notes.content().to_string()).wrap(Wrap { trim: false })
    };
    f.render_widget(
        body.block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border),
        ),
        area,
    );
}

fn render_links(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default().title("Quick Links").borders(Borders::ALL);
    if app.data.links.is_empty() {
        let empty = Paragraph::new("No links saved. Press (a) to add one!")
            .style(Style::default().fg(MUTED))
            .block(block);
        f.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = app
        .data
        .links
        .links()
        .iter()
        .map(|l| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", l.icon)),
                Span::styled(l.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}  {}", crate::links::domain_of(&l.url), humanized_age(l.created_at)),
                    Style::default().fg(MUTED),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(60, 50, 80)))
        .highlight_symbol("▸ ");
    let mut state = ListState::default().with_selected(Some(app.link_sel));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_calendar(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    f.render_widget(month_grid(app.month, app), chunks[0]);

    let today = Local::now().date_naive();
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Today",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let events = app.data.events.events_on(today);
    if events.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing scheduled.",
            Style::default().fg(MUTED),
        )));
    }
    for (i, event) in events.into_iter().enumerate() {
        let time = match event.end_time {
            Some(end) => format!(
                "{}–{}",
                event.start_time.format("%H:%M"),
                end.format("%H:%M")
            ),
            None => event.start_time.format("%H:%M").to_string(),
        };
        let marker = if i == app.event_sel { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::styled(format!("{time} "), Style::default().fg(MUTED)),
            Span::raw(event.title.clone()),
        ]));
        if !event.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("      {}", event.description),
                Style::default().fg(MUTED),
            )));
        }
    }
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn month_grid<'a>(month: MonthCursor, app: &App) -> Table<'a> {
    let today = Local::now().date_naive();
    let header = Row::new(["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"])
        .style(Style::default().fg(MUTED).add_modifier(Modifier::BOLD));

    let mut rows: Vec<Row> = Vec::new();
    let mut week: Vec<Cell> = (0..month.leading_blanks())
        .map(|_| Cell::from(""))
        .collect();
    for day in 1..=month.days_in_month() {
        let date = month.date(day);
        let marker = if date.is_some_and(|d| app.data.events.has_events(d)) {
            "•"
        } else {
            " "
        };
        let mut style = Style::default();
        if date == Some(today) {
            style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        }
        week.push(Cell::from(format!("{day:>2}{marker}")).style(style));
        if week.len() == 7 {
            rows.push(Row::new(std::mem::take(&mut week)));
        }
    }
    if !week.is_empty() {
        rows.push(Row::new(week));
    }

    Table::new(rows, [Constraint::Length(4); 7])
        .header(header)
        .block(Block::default().title(month.label()).borders(Borders::ALL))
}

fn render_profile(app: &App, f: &mut Frame, area: Rect) {
    let Some(user) = app.data.user.as_ref() else {
        return;
    };
    let stats = &app.data.timer.stats;
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", user.avatar)),
            Span::styled(
                user.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            user.email.clone(),
            Style::default().fg(MUTED),
        )),
        Line::from(Span::styled(
            if user.bio.is_empty() {
                "No bio yet.".to_string()
            } else {
                user.bio.clone()
            },
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(Span::styled(
            format!("Timezone: {}", user.timezone),
            Style::default().fg(MUTED),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Your stats",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Focus sessions today: {}", stats.sessions_today)),
        Line::from(format!("Total focus time: {}h", stats.total_focus_hours())),
        Line::from(format!("Current streak: {} days", stats.current_streak)),
        Line::from(format!("Tasks completed: {}", stats.tasks_completed)),
        Line::default(),
        Line::from(format!(
            "{} tasks · {} links · {} events saved",
            app.data.todos.len(),
            app.data.links.len(),
            app.data.events.len()
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title("Profile").borders(Borders::ALL)),
        area,
    );
}

fn render_todo_input(input: &str, f: &mut Frame) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let body = Paragraph::new(format!("{input}_")).block(
        Block::default()
            .title("New task — (enter) add, (esc) cancel")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(body, area);
}

fn render_link_form(form: &LinkForm, f: &mut Frame) {
    let fields = [("Title", form.title.as_str()), ("URL", form.url.as_str())];
    render_form("New link — (enter) next/add, (esc) cancel", &fields, form.field, None, f);
}

fn render_event_form(form: &EventForm, f: &mut Frame) {
    let fields = [
        ("Title", form.title.as_str()),
        ("Date", form.date.as_str()),
        ("Start", form.start.as_str()),
        ("End", form.end.as_str()),
        ("Notes", form.description.as_str()),
    ];
    let color = format!("◄ {} ►", crate::app::event_color_choices()[form.color]);
    render_form(
        "New event — (tab) field, (enter) next/create, (esc) cancel",
        &fields,
        form.field,
        Some(("Color", color)),
        f,
    );
}

fn render_profile_form(form: &ProfileForm, f: &mut Frame) {
    let fields = [
        ("Name", form.name.as_str()),
        ("Bio", form.bio.as_str()),
        ("Timezone", form.timezone.as_str()),
    ];
    let avatar = format!("◄ {} ►", AVATARS[form.avatar]);
    render_form(
        "Edit profile — (tab) field, (enter) next/save, (esc) cancel",
        &fields,
        form.field,
        Some(("Avatar", avatar)),
        f,
    );
}

/// Shared popup body for the small text-field forms. The optional trailing
/// pair is a left/right picker rather than a text field.
fn render_form(
    title: &str,
    fields: &[(&str, &str)],
    focused: usize,
    picker: Option<(&str, String)>,
    f: &mut Frame,
) {
    let area = centered_rect(55, 50, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, (label, value)) in fields.iter().enumerate() {
        let style = if i == focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if i == focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>9}: "), style),
            Span::raw(format!("{value}{cursor}")),
        ]));
    }
    if let Some((label, value)) = picker {
        let style = if focused == fields.len() {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>9}: "), style),
            Span::raw(value),
        ]));
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(body, area);
}

fn render_toasts(app: &App, f: &mut Frame) {
    if app.toasts.is_empty() {
        return;
    }
    let width = f.area().width.min(44);
    let height = app.toasts.len() as u16;
    let area = Rect::new(
        f.area().right().saturating_sub(width + 1),
        f.area().bottom().saturating_sub(height + 1),
        width,
        height,
    );
    let lines: Vec<Line> = app
        .toasts
        .iter()
        .map(|t| {
            let (symbol, color) = match t.kind {
                ToastKind::Success => ("✓", Color::Green),
                ToastKind::Error => ("✗", Color::Red),
                ToastKind::Info => ("ℹ", Color::Cyan),
            };
            Line::from(Span::styled(
                format!("{symbol} {}", t.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        })
        .collect();
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Right), area);
}

fn humanized_age(created_at: DateTime<Local>) -> String {
    let age_secs = (Local::now() - created_at).num_seconds().max(0) as u64;
    HumanTime::from(std::time::Duration::from_secs(age_secs))
        .to_text_en(Accuracy::Rough, Tense::Past)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
