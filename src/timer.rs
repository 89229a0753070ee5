use serde::{Deserialize, Serialize};

use crate::stats::Stats;
use crate::util::format_mm_ss;

/// Ticks (one per second) between a focus completion and the deferred
/// auto-started break.
pub const AUTO_START_DELAY_TICKS: u32 = 2;

/// Upper bound on configurable block lengths. Flag-provided and persisted
/// values are clamped to it too, keeping the seconds arithmetic well inside
/// u32 no matter what the profile file says.
pub const MAX_DURATION_MINS: u32 = 600;

fn clamp_mins(mins: u32) -> u32 {
    mins.clamp(1, MAX_DURATION_MINS)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Focus => "Focus Time",
            Mode::Break => "Break Time",
        }
    }
}

/// User-configurable timer knobs, persisted with the profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerSettings {
    pub focus_duration_mins: u32,
    pub break_duration_mins: u32,
    pub ambient_sound: bool,
    pub notifications: bool,
    pub auto_start_breaks: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_duration_mins: 25,
            break_duration_mins: 5,
            ambient_sound: false,
            notifications: true,
            auto_start_breaks: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    FocusComplete,
    BreakComplete,
}

/// Completion event handed to the notification sink. Delivery is the sink's
/// concern; the engine never observes whether it surfaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub body: &'static str,
}

impl Notification {
    fn focus_complete() -> Self {
        Self {
            kind: NotificationKind::FocusComplete,
            title: "Focus Complete!",
            body: "Great work! Time for a break.",
        }
    }

    fn break_complete() -> Self {
        Self {
            kind: NotificationKind::BreakComplete,
            title: "Break Complete!",
            body: "Ready for another focus session?",
        }
    }
}

/// Side effects requested by a state transition. The engine stays pure;
/// the app layer executes these against its collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerSignal {
    Notify(Notification),
    AmbientPlay,
    AmbientStop,
}

/// Pomodoro-style countdown state machine with session/statistics
/// bookkeeping.
///
/// States are (mode, running) pairs: Idle-Focus, Running-Focus, Idle-Break,
/// Running-Break. Ticks arrive once per second from the app runtime and are
/// only honored while running, so a stale tick queued before `pause()`
/// returned cannot corrupt the countdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerEngine {
    time_left_secs: u32,
    is_running: bool,
    mode: Mode,
    session_number: u32,
    pub settings: TimerSettings,
    pub stats: Stats,
    // Remaining ticks until a deferred auto-started break kicks in.
    pending_auto_start: Option<u32>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl TimerEngine {
    pub fn new(settings: TimerSettings) -> Self {
        let time_left_secs = settings.focus_duration_mins * 60;
        Self {
            time_left_secs,
            is_running: false,
            mode: Mode::Focus,
            session_number: 1,
            settings,
            stats: Stats::default(),
            pending_auto_start: None,
        }
    }

    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn session_number(&self) -> u32 {
        self.session_number
    }

    pub fn formatted_time(&self) -> String {
        format_mm_ss(self.time_left_secs)
    }

    /// Fraction of the current block already elapsed, for display only.
    pub fn progress(&self) -> f64 {
        let total = self.duration_secs_for(self.mode);
        if total == 0 {
            return 0.0;
        }
        f64::from(total - self.time_left_secs.min(total)) / f64::from(total)
    }

    fn duration_secs_for(&self, mode: Mode) -> u32 {
        let mins = match mode {
            Mode::Focus => self.settings.focus_duration_mins,
            Mode::Break => self.settings.break_duration_mins,
        };
        clamp_mins(mins) * 60
    }

    /// Begin the countdown. No-op while already running, so repeated calls
    /// never double the decrement rate.
    pub fn start(&mut self) -> Vec<TimerSignal> {
        self.pending_auto_start = None;
        if self.is_running {
            return Vec::new();
        }
        self.is_running = true;
        if self.settings.ambient_sound {
            vec![TimerSignal::AmbientPlay]
        } else {
            Vec::new()
        }
    }

    /// Stop the countdown. No-op when already paused. Always cancels a
    /// pending auto-started break; the original never did, which left a
    /// deferred start firing after the user had intervened.
    pub fn pause(&mut self) -> Vec<TimerSignal> {
        self.pending_auto_start = None;
        if !self.is_running {
            return Vec::new();
        }
        self.is_running = false;
        if self.settings.ambient_sound {
            vec![TimerSignal::AmbientStop]
        } else {
            Vec::new()
        }
    }

    /// Stop, then restore the countdown from the current mode's configured
    /// duration. Mode, session number and stats are untouched.
    pub fn reset(&mut self) -> Vec<TimerSignal> {
        let signals = self.pause();
        self.time_left_secs = self.duration_secs_for(self.mode);
        signals
    }

    /// One-second tick from the host scheduler. Ignored while paused: an
    /// in-flight tick that lands after `pause()` must not decrement the
    /// countdown, and a tick after `reset()` must not touch the restored
    /// value.
    pub fn on_tick(&mut self) -> Vec<TimerSignal> {
        if let Some(remaining) = self.pending_auto_start {
            return if remaining <= 1 {
                self.pending_auto_start = None;
                self.start()
            } else {
                self.pending_auto_start = Some(remaining - 1);
                Vec::new()
            };
        }

        if !self.is_running {
            return Vec::new();
        }

        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs == 0 {
            self.complete()
        } else {
            Vec::new()
        }
    }

    fn complete(&mut self) -> Vec<TimerSignal> {
        let mut signals = self.pause();

        match self.mode {
            Mode::Focus => {
                self.stats
                    .record_focus_session(clamp_mins(self.settings.focus_duration_mins));
                self.mode = Mode::Break;
                self.time_left_secs = self.duration_secs_for(Mode::Break);
                signals.push(TimerSignal::Notify(Notification::focus_complete()));
                if self.settings.auto_start_breaks {
                    self.pending_auto_start = Some(AUTO_START_DELAY_TICKS);
                }
            }
            Mode::Break => {
                self.mode = Mode::Focus;
                self.session_number += 1;
                self.time_left_secs = self.duration_secs_for(Mode::Focus);
                signals.push(TimerSignal::Notify(Notification::break_complete()));
            }
        }

        signals
    }

    /// Updating a duration while idle in the matching mode rewrites the
    /// countdown immediately (live preview); while running it takes effect
    /// on the next reset or completion. Values clamp to
    /// 1..=[`MAX_DURATION_MINS`].
    pub fn set_focus_duration(&mut self, mins: u32) {
        self.settings.focus_duration_mins = clamp_mins(mins);
        if !self.is_running && self.mode == Mode::Focus {
            self.time_left_secs = self.duration_secs_for(Mode::Focus);
        }
    }

    pub fn set_break_duration(&mut self, mins: u32) {
        self.settings.break_duration_mins = clamp_mins(mins);
        if !self.is_running && self.mode == Mode::Break {
            self.time_left_secs = self.duration_secs_for(Mode::Break);
        }
    }

    /// Explicit coupling point for the todo widget; +1 when a task is
    /// checked off, -1 when it is unchecked or a completed task is deleted.
    pub fn notify_task_completed(&mut self, delta: i32) {
        self.stats.record_task_toggle(delta);
    }

    pub fn auto_start_pending(&self) -> bool {
        self.pending_auto_start.is_some()
    }

    /// Clears the countdown and stats back to a fresh engine, keeping only
    /// default settings. Used by the profile-reset operation.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }
}
