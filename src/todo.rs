use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Local>,
}

/// In-memory task list. Newest entries sit at the front.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoList {
    items: Vec<Todo>,
    next_id: u64,
}

impl TodoList {
    /// Adds a task at the front of the list. Blank text is rejected.
    pub fn add(&mut self, text: &str) -> Option<u64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(
            0,
            Todo {
                id,
                text: text.to_string(),
                completed: false,
                created_at: Local::now(),
            },
        );
        Some(id)
    }

    /// Flips a task's completion flag. Returns the task-completed delta
    /// (+1 / -1) the caller should report to the timer engine.
    pub fn toggle(&mut self, id: u64) -> Option<i32> {
        let todo = self.items.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(if todo.completed { 1 } else { -1 })
    }

    /// Removes a task. Deleting a completed task returns a -1 delta so the
    /// completed counter stays honest.
    pub fn remove(&mut self, id: u64) -> Option<i32> {
        let idx = self.items.iter().position(|t| t.id == id)?;
        let removed = self.items.remove(idx);
        Some(if removed.completed { -1 } else { 0 })
    }

    pub fn incomplete_count(&self) -> usize {
        self.items.iter().filter(|t| !t.completed).count()
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
