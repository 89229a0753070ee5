use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum EventColor {
    #[default]
    Lavender,
    Mint,
    Peach,
    Sky,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub description: String,
    pub color: EventColor,
}

/// Simple event log backing the calendar widget.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLog {
    events: Vec<CalendarEvent>,
    next_id: u64,
}

impl EventLog {
    /// Title, date and start time are required; everything else is
    /// optional decoration.
    pub fn add(
        &mut self,
        title: &str,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: Option<NaiveTime>,
        description: &str,
        color: EventColor,
    ) -> Option<u64> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.events.push(CalendarEvent {
            id,
            title: title.to_string(),
            date,
            start_time,
            end_time,
            description: description.trim().to_string(),
            color,
        });
        Some(id)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        self.events.len() != before
    }

    /// Events on a given day, ordered by start time.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        let mut day: Vec<&CalendarEvent> =
            self.events.iter().filter(|e| e.date == date).collect();
        day.sort_by_key(|e| e.start_time);
        day
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|e| e.date == date)
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// The month currently shown by the calendar widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // month is always kept in 1..=12
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid month cursor")
    }

    /// Number of leading blanks in a Sunday-first month grid.
    pub fn leading_blanks(self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn days_in_month(self) -> u32 {
        let next = self.next().first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    pub fn label(self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}
