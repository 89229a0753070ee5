use serde::{Deserialize, Serialize};

/// Aggregate productivity counters shown in the sidebar and on the timer
/// widget. Mutated only through the methods below; the streak has no
/// breaking logic, it only grows or resets with the profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub sessions_today: u32,
    pub tasks_completed: u32,
    pub current_streak: u32,
    pub total_focus_mins: u32,
}

impl Stats {
    /// A focus block ran to completion.
    pub fn record_focus_session(&mut self, focus_mins: u32) {
        self.sessions_today += 1;
        self.total_focus_mins += focus_mins;
        self.current_streak += 1;
    }

    /// Task completion toggled somewhere; negative deltas clamp at zero.
    pub fn record_task_toggle(&mut self, delta: i32) {
        if delta >= 0 {
            self.tasks_completed += delta as u32;
        } else {
            self.tasks_completed = self.tasks_completed.saturating_sub(delta.unsigned_abs());
        }
    }

    /// Whole hours of accumulated focus time, as shown on the timer widget.
    pub fn total_focus_hours(&self) -> u32 {
        self.total_focus_mins / 60
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
