use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use webbrowser::Browser;

use crate::calendar::{EventColor, MonthCursor};
use crate::notes::Format;
use crate::profile;
use crate::storage::ProfileData;
use crate::timer::TimerSignal;
use crate::util::greeting_for_hour;

pub const AVATARS: [&str; 6] = ["👤", "🦊", "🐱", "🌙", "🌿", "⭐"];
const EVENT_COLORS: [EventColor; 4] = [
    EventColor::Lavender,
    EventColor::Mint,
    EventColor::Peach,
    EventColor::Sky,
];

/// Display labels for the event color picker, in cycle order.
pub fn event_color_choices() -> [String; 4] {
    EVENT_COLORS.map(|c| c.to_string())
}

// Toasts age out on the one-second tick, mirroring the 4s auto-dismiss of
// the original dashboard.
const TOAST_TICKS: u8 = 4;

const FOCUS_MINS_RANGE: (u32, u32) = (5, 90);
const BREAK_MINS_RANGE: (u32, u32) = (1, 30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Tab {
    Todos,
    Timer,
    Notes,
    Links,
    Calendar,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Todos,
        Tab::Timer,
        Tab::Notes,
        Tab::Links,
        Tab::Calendar,
        Tab::Profile,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Login/registration form state. Field order is name, email, password,
/// confirm; login mode only exposes the middle two.
#[derive(Clone, Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub field: usize,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            field: 0,
        }
    }
}

impl AuthForm {
    pub fn field_count(&self) -> usize {
        match self.mode {
            AuthMode::Login => 2,
            AuthMode::Register => 4,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match (self.mode, self.field) {
            (AuthMode::Login, 0) => &mut self.email,
            (AuthMode::Login, _) => &mut self.password,
            (AuthMode::Register, 0) => &mut self.name,
            (AuthMode::Register, 1) => &mut self.email,
            (AuthMode::Register, 2) => &mut self.password,
            (AuthMode::Register, _) => &mut self.confirm,
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.field = 0;
    }
}

#[derive(Clone, Debug, Default)]
pub struct LinkForm {
    pub title: String,
    pub url: String,
    pub field: usize,
}

#[derive(Clone, Debug)]
pub struct EventForm {
    pub title: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub color: usize,
    pub field: usize,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: Local::now().format("%Y-%m-%d").to_string(),
            start: String::new(),
            end: String::new(),
            description: String::new(),
            color: 0,
            field: 0,
        }
    }
}

impl EventForm {
    // title, date, start, end, description, color picker
    const FIELDS: usize = 6;

    fn focused_mut(&mut self) -> Option<&mut String> {
        match self.field {
            0 => Some(&mut self.title),
            1 => Some(&mut self.date),
            2 => Some(&mut self.start),
            3 => Some(&mut self.end),
            4 => Some(&mut self.description),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub name: String,
    pub bio: String,
    pub timezone: String,
    pub avatar: usize,
    pub field: usize,
}

impl ProfileForm {
    // name, bio, timezone, avatar picker
    const FIELDS: usize = 4;

    fn focused_mut(&mut self) -> Option<&mut String> {
        match self.field {
            0 => Some(&mut self.name),
            1 => Some(&mut self.bio),
            2 => Some(&mut self.timezone),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub ticks_left: u8,
}

/// Whole-application state: one user, one timer engine, and the in-memory
/// widget lists, driven by key events and the one-second tick.
pub struct App {
    pub screen: Screen,
    pub tab: Tab,
    pub auth: AuthForm,
    pub data: ProfileData,
    pub month: MonthCursor,
    pub todo_sel: usize,
    pub link_sel: usize,
    pub event_sel: usize,
    pub todo_input: Option<String>,
    pub link_form: Option<LinkForm>,
    pub event_form: Option<EventForm>,
    pub profile_form: Option<ProfileForm>,
    pub notes_editing: bool,
    pub ambient_status: String,
    pub toasts: Vec<Toast>,
    pub dirty: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(data: ProfileData) -> Self {
        let screen = if data.user.is_some() {
            Screen::Dashboard
        } else {
            Screen::Auth
        };
        Self {
            screen,
            tab: Tab::Todos,
            auth: AuthForm::default(),
            data,
            month: MonthCursor::current(),
            todo_sel: 0,
            link_sel: 0,
            event_sel: 0,
            todo_input: None,
            link_form: None,
            event_form: None,
            profile_form: None,
            notes_editing: false,
            ambient_status: "Ready".to_string(),
            toasts: Vec::new(),
            dirty: false,
            should_quit: false,
        }
    }

    pub fn greeting(&self) -> &'static str {
        greeting_for_hour(Local::now().hour())
    }

    pub fn push_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toasts.push(Toast {
            message: message.into(),
            kind,
            ticks_left: TOAST_TICKS,
        });
        if self.toasts.len() > 3 {
            self.toasts.remove(0);
        }
    }

    /// Advance the single app timeline by one second.
    pub fn on_tick(&mut self) {
        let signals = self.data.timer.on_tick();
        self.apply_signals(signals);
        for toast in &mut self.toasts {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
        }
        self.toasts.retain(|t| t.ticks_left > 0);
    }

    fn apply_signals(&mut self, signals: Vec<TimerSignal>) {
        for signal in signals {
            match signal {
                TimerSignal::Notify(n) => {
                    // The TUI toast is the only notification sink, so the
                    // notifications toggle gates it. Delivery is
                    // fire-and-forget either way; stats still changed.
                    if self.data.timer.settings.notifications {
                        self.push_toast(format!("{} {}", n.title, n.body), ToastKind::Success);
                    }
                    self.dirty = true;
                }
                TimerSignal::AmbientPlay => {
                    self.ambient_status = "Playing ambient sound".to_string();
                }
                TimerSignal::AmbientStop => {
                    self.ambient_status = "Ready".to_string();
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.screen {
            Screen::Auth => self.handle_auth_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
        }
    }

    fn handle_auth_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            self.auth.toggle_mode();
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => {
                self.auth.field = (self.auth.field + 1) % self.auth.field_count();
            }
            KeyCode::BackTab | KeyCode::Up => {
                let count = self.auth.field_count();
                self.auth.field = (self.auth.field + count - 1) % count;
            }
            KeyCode::Backspace => {
                self.auth.focused_mut().pop();
            }
            KeyCode::Char(c) => self.auth.focused_mut().push(c),
            KeyCode::Enter => self.submit_auth(),
            _ => {}
        }
    }

    fn submit_auth(&mut self) {
        let result = match self.auth.mode {
            AuthMode::Login => profile::login(&self.auth.email, &self.auth.password),
            AuthMode::Register => profile::register(
                &self.auth.name,
                &self.auth.email,
                &self.auth.password,
                &self.auth.confirm,
            ),
        };
        match result {
            Ok(user) => {
                self.data.user = Some(user);
                self.screen = Screen::Dashboard;
                self.auth = AuthForm::default();
                self.dirty = true;
                self.push_toast("Welcome to CozySpace!", ToastKind::Success);
            }
            Err(err) => self.push_toast(err.to_string(), ToastKind::Error),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if self.todo_input.is_some() {
            self.handle_todo_input_key(key);
        } else if self.link_form.is_some() {
            self.handle_link_form_key(key);
        } else if self.event_form.is_some() {
            self.handle_event_form_key(key);
        } else if self.profile_form.is_some() {
            self.handle_profile_form_key(key);
        } else if self.notes_editing {
            self.handle_notes_edit_key(key);
        } else {
            self.handle_widget_key(key);
        }
    }

    fn handle_widget_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::Char(c @ '1'..='6') => {
                self.tab = Tab::ALL[c as usize - '1' as usize];
                return;
            }
            _ => {}
        }
        match self.tab {
            Tab::Todos => self.handle_todos_key(key),
            Tab::Timer => self.handle_timer_key(key),
            Tab::Notes => self.handle_notes_key(key),
            Tab::Links => self.handle_links_key(key),
            Tab::Calendar => self.handle_calendar_key(key),
            Tab::Profile => self.handle_profile_key(key),
        }
    }

    fn handle_todos_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.todo_input = Some(String::new()),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.todo_sel + 1 < self.data.todos.len() {
                    self.todo_sel += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.todo_sel = self.todo_sel.saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(todo) = self.data.todos.items().get(self.todo_sel) {
                    let id = todo.id;
                    if let Some(delta) = self.data.todos.toggle(id) {
                        self.data.timer.notify_task_completed(delta);
                        if delta > 0 {
                            self.push_toast("Task completed!", ToastKind::Success);
                        }
                        self.dirty = true;
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(todo) = self.data.todos.items().get(self.todo_sel) {
                    let id = todo.id;
                    if let Some(delta) = self.data.todos.remove(id) {
                        self.data.timer.notify_task_completed(delta);
                        self.push_toast("Task deleted", ToastKind::Success);
                        self.dirty = true;
                    }
                    self.clamp_selections();
                }
            }
            _ => {}
        }
    }

    fn handle_todo_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.todo_input = None,
            KeyCode::Backspace => {
                if let Some(input) = self.todo_input.as_mut() {
                    input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = self.todo_input.as_mut() {
                    input.push(c);
                }
            }
            KeyCode::Enter => {
                let text = self.todo_input.take().unwrap_or_default();
                if self.data.todos.add(&text).is_some() {
                    self.todo_sel = 0;
                    self.dirty = true;
                    self.push_toast("Task added successfully!", ToastKind::Success);
                } else {
                    self.push_toast("Please enter a task", ToastKind::Error);
                }
            }
            _ => {}
        }
    }

    fn handle_timer_key(&mut self, key: KeyEvent) {
        let timer = &mut self.data.timer;
        let signals = match key.code {
            KeyCode::Char('s') | KeyCode::Enter => Some(timer.start()),
            KeyCode::Char('p') => Some(timer.pause()),
            KeyCode::Char('r') => Some(timer.reset()),
            KeyCode::Char('[') => {
                let mins = timer.settings.focus_duration_mins.saturating_sub(5);
                timer.set_focus_duration(mins.clamp(FOCUS_MINS_RANGE.0, FOCUS_MINS_RANGE.1));
                None
            }
            KeyCode::Char(']') => {
                let mins = timer.settings.focus_duration_mins + 5;
                timer.set_focus_duration(mins.clamp(FOCUS_MINS_RANGE.0, FOCUS_MINS_RANGE.1));
                None
            }
            KeyCode::Char('{') => {
                let mins = timer.settings.break_duration_mins.saturating_sub(1);
                timer.set_break_duration(mins.clamp(BREAK_MINS_RANGE.0, BREAK_MINS_RANGE.1));
                None
            }
            KeyCode::Char('}') => {
                let mins = timer.settings.break_duration_mins + 1;
                timer.set_break_duration(mins.clamp(BREAK_MINS_RANGE.0, BREAK_MINS_RANGE.1));
                None
            }
            KeyCode::Char('m') => {
                timer.settings.ambient_sound = !timer.settings.ambient_sound;
                None
            }
            KeyCode::Char('n') => {
                timer.settings.notifications = !timer.settings.notifications;
                None
            }
            KeyCode::Char('b') => {
                timer.settings.auto_start_breaks = !timer.settings.auto_start_breaks;
                None
            }
            _ => return,
        };
        self.dirty = true;
        if let Some(signals) = signals {
            self.apply_signals(signals);
        }
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') | KeyCode::Enter => self.notes_editing = true,
            KeyCode::Char('x') => {
                self.data.notes.clear();
                self.dirty = true;
                self.push_toast("Notes cleared", ToastKind::Success);
            }
            KeyCode::Char('o') => {
                let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
                match self.data.notes.export_to(&dir) {
                    Ok(path) => self.push_toast(
                        format!("Notes exported to {}", path.display()),
                        ToastKind::Success,
                    ),
                    Err(_) => self.push_toast("Could not export notes", ToastKind::Error),
                }
            }
            _ => {}
        }
    }

    fn handle_notes_edit_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('b') => {
                    self.data.notes.format_last_word(Format::Bold);
                    self.dirty = true;
                }
                KeyCode::Char('i') => {
                    self.data.notes.format_last_word(Format::Italic);
                    self.dirty = true;
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.notes_editing = false,
            KeyCode::Enter => {
                self.data.notes.push_char('\n');
                self.dirty = true;
            }
            KeyCode::Backspace => {
                self.data.notes.backspace();
                self.dirty = true;
            }
            KeyCode::Char(c) => {
                self.data.notes.push_char(c);
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn handle_links_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.link_form = Some(LinkForm::default()),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.link_sel + 1 < self.data.links.len() {
                    self.link_sel += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.link_sel = self.link_sel.saturating_sub(1);
            }
            KeyCode::Char('d') => {
                if let Some(link) = self.data.links.links().get(self.link_sel) {
                    let id = link.id;
                    if self.data.links.remove(id) {
                        self.push_toast("Link deleted", ToastKind::Success);
                        self.dirty = true;
                    }
                    self.clamp_selections();
                }
            }
            KeyCode::Char('o') | KeyCode::Enter => {
                if let Some(link) = self.data.links.links().get(self.link_sel) {
                    if Browser::is_available() {
                        webbrowser::open(&link.url).unwrap_or_default();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_link_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.link_form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.link_form = None,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
                form.field = (form.field + 1) % 2;
            }
            KeyCode::Backspace => {
                let field = if form.field == 0 {
                    &mut form.title
                } else {
                    &mut form.url
                };
                field.pop();
            }
            KeyCode::Char(c) => {
                let field = if form.field == 0 {
                    &mut form.title
                } else {
                    &mut form.url
                };
                field.push(c);
            }
            KeyCode::Enter => {
                if form.field == 0 {
                    form.field = 1;
                    return;
                }
                let (title, url) = (form.title.clone(), form.url.clone());
                match self.data.links.add(&title, &url) {
                    Ok(_) => {
                        self.link_form = None;
                        self.link_sel = 0;
                        self.dirty = true;
                        self.push_toast("Link added successfully!", ToastKind::Success);
                    }
                    Err(err) => self.push_toast(err.to_string(), ToastKind::Error),
                }
            }
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.event_form = Some(EventForm::default()),
            KeyCode::Left | KeyCode::Char('h') => self.month = self.month.prev(),
            KeyCode::Right | KeyCode::Char('l') => self.month = self.month.next(),
            KeyCode::Char('t') => self.month = MonthCursor::current(),
            KeyCode::Down | KeyCode::Char('j') => {
                let today = Local::now().date_naive();
                if self.event_sel + 1 < self.data.events.events_on(today).len() {
                    self.event_sel += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.event_sel = self.event_sel.saturating_sub(1);
            }
            KeyCode::Char('d') => {
                let today = Local::now().date_naive();
                let id = self
                    .data
                    .events
                    .events_on(today)
                    .get(self.event_sel)
                    .map(|e| e.id);
                if let Some(id) = id {
                    if self.data.events.remove(id) {
                        self.push_toast("Event deleted", ToastKind::Success);
                        self.dirty = true;
                    }
                    let remaining = self.data.events.events_on(today).len();
                    if self.event_sel >= remaining {
                        self.event_sel = remaining.saturating_sub(1);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_event_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.event_form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.event_form = None,
            KeyCode::Tab | KeyCode::Down => form.field = (form.field + 1) % EventForm::FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                form.field = (form.field + EventForm::FIELDS - 1) % EventForm::FIELDS;
            }
            KeyCode::Left => {
                if form.field == EventForm::FIELDS - 1 {
                    form.color = (form.color + EVENT_COLORS.len() - 1) % EVENT_COLORS.len();
                }
            }
            KeyCode::Right => {
                if form.field == EventForm::FIELDS - 1 {
                    form.color = (form.color + 1) % EVENT_COLORS.len();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = form.focused_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = form.focused_mut() {
                    field.push(c);
                }
            }
            KeyCode::Enter => {
                if form.field + 1 < EventForm::FIELDS {
                    form.field += 1;
                    return;
                }
                self.submit_event_form();
            }
            _ => {}
        }
    }

    fn submit_event_form(&mut self) {
        let Some(form) = self.event_form.as_ref() else {
            return;
        };
        let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d");
        let start = NaiveTime::parse_from_str(form.start.trim(), "%H:%M");
        let (Ok(date), Ok(start)) = (date, start) else {
            self.push_toast("Please fill in required fields", ToastKind::Error);
            return;
        };
        let end = NaiveTime::parse_from_str(form.end.trim(), "%H:%M").ok();
        let color = EVENT_COLORS[form.color];
        let (title, description) = (form.title.clone(), form.description.clone());
        if self
            .data
            .events
            .add(&title, date, start, end, &description, color)
            .is_some()
        {
            self.event_form = None;
            self.dirty = true;
            self.push_toast("Event created successfully!", ToastKind::Success);
        } else {
            self.push_toast("Please fill in required fields", ToastKind::Error);
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') => {
                let user = self.data.user.clone().unwrap_or_default();
                let avatar = AVATARS
                    .iter()
                    .position(|a| *a == user.avatar)
                    .unwrap_or(0);
                self.profile_form = Some(ProfileForm {
                    name: user.name,
                    bio: user.bio,
                    timezone: user.timezone,
                    avatar,
                    field: 0,
                });
            }
            KeyCode::Char('x') => {
                let date = Local::now().format("%Y-%m-%d");
                let path = std::env::current_dir()
                    .unwrap_or_else(|_| ".".into())
                    .join(format!("CozySpace_Export_{date}.json"));
                match crate::storage::export_to(&path, &self.data) {
                    Ok(()) => self.push_toast("Data exported successfully!", ToastKind::Success),
                    Err(_) => self.push_toast("Could not export data", ToastKind::Error),
                }
            }
            KeyCode::Char('z') => self.reset_profile(),
            KeyCode::Char('o') => {
                self.data.user = None;
                self.screen = Screen::Auth;
                self.dirty = true;
                self.push_toast("Logged out successfully", ToastKind::Success);
            }
            _ => {}
        }
    }

    fn handle_profile_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.profile_form.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.profile_form = None,
            KeyCode::Tab | KeyCode::Down => form.field = (form.field + 1) % ProfileForm::FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                form.field = (form.field + ProfileForm::FIELDS - 1) % ProfileForm::FIELDS;
            }
            KeyCode::Left => {
                if form.field == ProfileForm::FIELDS - 1 {
                    form.avatar = (form.avatar + AVATARS.len() - 1) % AVATARS.len();
                }
            }
            KeyCode::Right => {
                if form.field == ProfileForm::FIELDS - 1 {
                    form.avatar = (form.avatar + 1) % AVATARS.len();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = form.focused_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = form.focused_mut() {
                    field.push(c);
                }
            }
            KeyCode::Enter => {
                if form.field + 1 < ProfileForm::FIELDS {
                    form.field += 1;
                    return;
                }
                self.submit_profile_form();
            }
            _ => {}
        }
    }

    fn submit_profile_form(&mut self) {
        let Some(form) = self.profile_form.take() else {
            return;
        };
        if form.name.trim().is_empty() {
            self.push_toast("Name is required", ToastKind::Error);
            self.profile_form = Some(form);
            return;
        }
        if let Some(user) = self.data.user.as_mut() {
            user.name = form.name.trim().to_string();
            user.bio = form.bio.trim().to_string();
            user.timezone = form.timezone.trim().to_string();
            user.avatar = AVATARS[form.avatar].to_string();
            self.dirty = true;
            self.push_toast("Profile updated successfully!", ToastKind::Success);
        }
    }

    /// Deletes all widget data and restores the timer and stats to
    /// defaults. The logged-in user survives.
    fn reset_profile(&mut self) {
        self.data.todos.clear();
        self.data.notes.clear();
        self.data.links.clear();
        self.data.events.clear();
        self.data.timer.reset_to_defaults();
        self.todo_sel = 0;
        self.link_sel = 0;
        self.event_sel = 0;
        self.dirty = true;
        self.push_toast("Profile reset successfully!", ToastKind::Success);
    }

    fn clamp_selections(&mut self) {
        if self.todo_sel >= self.data.todos.len() {
            self.todo_sel = self.data.todos.len().saturating_sub(1);
        }
        if self.link_sel >= self.data.links.len() {
            self.link_sel = self.data.links.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Mode;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(c));
        }
    }

    fn logged_in_app() -> App {
        let mut app = App::new(ProfileData::default());
        type_str(&mut app, "ada@lovelace.dev");
        app.handle_key(code(KeyCode::Tab));
        type_str(&mut app, "pw");
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Dashboard);
        app
    }

    #[test]
    fn fresh_app_starts_on_auth_screen() {
        let app = App::new(ProfileData::default());
        assert_eq!(app.screen, Screen::Auth);
    }

    #[test]
    fn app_with_saved_user_skips_auth() {
        let mut data = ProfileData::default();
        data.user = Some(profile::login("ada@lovelace.dev", "pw").unwrap());
        let app = App::new(data);
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn login_flow_reaches_dashboard() {
        let app = logged_in_app();
        assert_eq!(app.data.user.as_ref().unwrap().name, "ada");
        assert!(app.dirty);
    }

    #[test]
    fn failed_login_shows_error_toast() {
        let mut app = App::new(ProfileData::default());
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Auth);
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].kind, ToastKind::Error);
    }

    #[test]
    fn register_mode_validates_password_confirmation() {
        let mut app = App::new(ProfileData::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(app.auth.mode, AuthMode::Register);
        type_str(&mut app, "Ada");
        app.handle_key(code(KeyCode::Tab));
        type_str(&mut app, "ada@b.c");
        app.handle_key(code(KeyCode::Tab));
        type_str(&mut app, "pw");
        app.handle_key(code(KeyCode::Tab));
        type_str(&mut app, "other");
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Auth);
        assert_eq!(app.toasts[0].message, "Passwords do not match");
    }

    #[test]
    fn tab_switching() {
        let mut app = logged_in_app();
        assert_eq!(app.tab, Tab::Todos);
        app.handle_key(code(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Timer);
        app.handle_key(key('5'));
        assert_eq!(app.tab, Tab::Calendar);
        app.handle_key(key('1'));
        assert_eq!(app.tab, Tab::Todos);
    }

    #[test]
    fn todo_add_toggle_delete_flow() {
        let mut app = logged_in_app();
        app.handle_key(key('a'));
        type_str(&mut app, "water plants");
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.data.todos.len(), 1);

        app.handle_key(key(' '));
        assert!(app.data.todos.items()[0].completed);
        assert_eq!(app.data.timer.stats.tasks_completed, 1);

        app.handle_key(key('d'));
        assert!(app.data.todos.is_empty());
        assert_eq!(app.data.timer.stats.tasks_completed, 0);
    }

    #[test]
    fn blank_todo_is_rejected_with_toast() {
        let mut app = logged_in_app();
        app.handle_key(key('a'));
        app.handle_key(code(KeyCode::Enter));
        assert!(app.data.todos.is_empty());
        assert!(app
            .toasts
            .iter()
            .any(|t| t.message == "Please enter a task"));
    }

    #[test]
    fn timer_keys_drive_the_engine() {
        let mut app = logged_in_app();
        app.handle_key(key('2'));
        app.handle_key(key('s'));
        assert!(app.data.timer.is_running());
        app.on_tick();
        assert_eq!(app.data.timer.time_left_secs(), 1499);
        app.handle_key(key('p'));
        assert!(!app.data.timer.is_running());
        app.handle_key(key('r'));
        assert_eq!(app.data.timer.time_left_secs(), 1500);
    }

    #[test]
    fn duration_keys_respect_bounds() {
        let mut app = logged_in_app();
        app.handle_key(key('2'));
        for _ in 0..30 {
            app.handle_key(key('['));
        }
        assert_eq!(app.data.timer.settings.focus_duration_mins, 5);
        for _ in 0..30 {
            app.handle_key(key(']'));
        }
        assert_eq!(app.data.timer.settings.focus_duration_mins, 90);
        for _ in 0..40 {
            app.handle_key(key('{'));
        }
        assert_eq!(app.data.timer.settings.break_duration_mins, 1);
    }

    #[test]
    fn completion_toast_appears_on_focus_complete() {
        let mut app = logged_in_app();
        app.handle_key(key('2'));
        for _ in 0..17 {
            app.handle_key(key('['));
        }
        assert_eq!(app.data.timer.settings.focus_duration_mins, 5);
        app.handle_key(key('s'));
        for _ in 0..300 {
            app.on_tick();
        }
        assert_eq!(app.data.timer.mode(), Mode::Break);
        assert!(app
            .toasts
            .iter()
            .any(|t| t.message.starts_with("Focus Complete!")));
    }

    #[test]
    fn notifications_toggle_silences_completion_toasts() {
        let mut app = logged_in_app();
        app.handle_key(key('2'));
        for _ in 0..17 {
            app.handle_key(key('['));
        }
        app.handle_key(key('n')); // notifications off
        assert!(!app.data.timer.settings.notifications);
        app.handle_key(key('s'));
        app.toasts.clear();
        for _ in 0..300 {
            app.on_tick();
        }
        assert_eq!(app.data.timer.mode(), Mode::Break);
        assert_eq!(app.data.timer.stats.sessions_today, 1);
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn notes_editing_and_formatting() {
        let mut app = logged_in_app();
        app.handle_key(key('3'));
        app.handle_key(key('e'));
        assert!(app.notes_editing);
        type_str(&mut app, "hello world");
        app.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        assert_eq!(app.data.notes.content(), "hello **world**");
        app.handle_key(code(KeyCode::Esc));
        assert!(!app.notes_editing);
        app.handle_key(key('x'));
        assert!(app.data.notes.is_empty());
    }

    #[test]
    fn link_form_validation_keeps_form_open() {
        let mut app = logged_in_app();
        app.handle_key(key('4'));
        app.handle_key(key('a'));
        type_str(&mut app, "Rust");
        app.handle_key(code(KeyCode::Enter));
        type_str(&mut app, "not a url");
        app.handle_key(code(KeyCode::Enter));
        assert!(app.link_form.is_some());
        assert!(app
            .toasts
            .iter()
            .any(|t| t.message == "Please enter a valid URL"));
    }

    #[test]
    fn link_form_happy_path() {
        let mut app = logged_in_app();
        app.handle_key(key('4'));
        app.handle_key(key('a'));
        type_str(&mut app, "Rust");
        app.handle_key(code(KeyCode::Enter));
        type_str(&mut app, "https://www.rust-lang.org");
        app.handle_key(code(KeyCode::Enter));
        assert!(app.link_form.is_none());
        assert_eq!(app.data.links.len(), 1);
        assert_eq!(app.data.links.links()[0].title, "Rust");
    }

    #[test]
    fn calendar_month_navigation() {
        let mut app = logged_in_app();
        app.handle_key(key('5'));
        let start = app.month;
        app.handle_key(code(KeyCode::Right));
        assert_eq!(app.month, start.next());
        app.handle_key(key('t'));
        assert_eq!(app.month, start);
    }

    #[test]
    fn event_form_submits_with_valid_date_and_time() {
        let mut app = logged_in_app();
        app.handle_key(key('5'));
        app.handle_key(key('a'));
        type_str(&mut app, "standup");
        app.handle_key(code(KeyCode::Enter)); // to date (prefilled today)
        app.handle_key(code(KeyCode::Enter)); // to start
        type_str(&mut app, "09:00");
        // skip through end, description, color
        app.handle_key(code(KeyCode::Enter));
        app.handle_key(code(KeyCode::Enter));
        app.handle_key(code(KeyCode::Enter));
        app.handle_key(code(KeyCode::Enter));
        assert!(app.event_form.is_none());
        assert_eq!(app.data.events.len(), 1);
        let today = Local::now().date_naive();
        assert_eq!(app.data.events.events_on(today)[0].title, "standup");
    }

    fn add_today_event(app: &mut App, title: &str, start: &str) {
        app.handle_key(key('a'));
        type_str(app, title);
        app.handle_key(code(KeyCode::Enter)); // date is prefilled with today
        app.handle_key(code(KeyCode::Enter));
        type_str(app, start);
        for _ in 0..4 {
            app.handle_key(code(KeyCode::Enter));
        }
    }

    #[test]
    fn selected_event_can_be_deleted() {
        let mut app = logged_in_app();
        app.handle_key(key('5'));
        add_today_event(&mut app, "standup", "09:00");
        add_today_event(&mut app, "review", "15:00");
        assert_eq!(app.data.events.len(), 2);

        // move to the later event and delete it
        app.handle_key(key('j'));
        app.handle_key(key('d'));
        let today = Local::now().date_naive();
        let left = app.data.events.events_on(today);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].title, "standup");
        assert!(app
            .toasts
            .iter()
            .any(|t| t.message == "Event deleted"));

        // selection clamps back onto the remaining event
        assert_eq!(app.event_sel, 0);
        app.handle_key(key('d'));
        assert!(app.data.events.is_empty());
        app.handle_key(key('d'));
        assert!(app.data.events.is_empty());
    }

    #[test]
    fn event_form_rejects_bad_times() {
        let mut app = logged_in_app();
        app.handle_key(key('5'));
        app.handle_key(key('a'));
        type_str(&mut app, "standup");
        app.handle_key(code(KeyCode::Enter));
        app.handle_key(code(KeyCode::Enter));
        type_str(&mut app, "nine-ish");
        for _ in 0..4 {
            app.handle_key(code(KeyCode::Enter));
        }
        assert!(app.event_form.is_some());
        assert!(app.data.events.is_empty());
    }

    #[test]
    fn profile_edit_updates_user() {
        let mut app = logged_in_app();
        app.handle_key(key('6'));
        app.handle_key(key('e'));
        let form = app.profile_form.as_mut().unwrap();
        form.name.clear();
        type_str(&mut app, "Ada Lovelace");
        for _ in 0..4 {
            app.handle_key(code(KeyCode::Enter));
        }
        assert!(app.profile_form.is_none());
        assert_eq!(app.data.user.as_ref().unwrap().name, "Ada Lovelace");
    }

    #[test]
    fn profile_reset_clears_everything_but_the_user() {
        let mut app = logged_in_app();
        app.handle_key(key('a'));
        type_str(&mut app, "task");
        app.handle_key(code(KeyCode::Enter));
        app.handle_key(key('2'));
        app.handle_key(key('s'));
        for _ in 0..5 {
            app.on_tick();
        }
        app.handle_key(key('6'));
        app.handle_key(key('z'));
        assert!(app.data.todos.is_empty());
        assert_eq!(app.data.timer.time_left_secs(), 1500);
        assert!(app.data.user.is_some());
    }

    #[test]
    fn logout_returns_to_auth() {
        let mut app = logged_in_app();
        app.handle_key(key('6'));
        app.handle_key(key('o'));
        assert_eq!(app.screen, Screen::Auth);
        assert!(app.data.user.is_none());
    }

    #[test]
    fn toasts_age_out_on_ticks() {
        let mut app = logged_in_app();
        app.push_toast("hi", ToastKind::Info);
        for _ in 0..TOAST_TICKS {
            app.on_tick();
        }
        assert!(app.toasts.is_empty());
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut app = App::new(ProfileData::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
