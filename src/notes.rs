use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::util::word_count;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
}

impl Format {
    fn marker(&self) -> &'static str {
        match self {
            Format::Bold => "**",
            Format::Italic => "*",
        }
    }
}

/// Free-form notes pad. The content is plain text with optional markdown
/// emphasis markers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notes {
    content: String,
}

impl Notes {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub fn push_char(&mut self, c: char) {
        self.content.push(c);
    }

    pub fn backspace(&mut self) {
        self.content.pop();
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.content)
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Wraps the last whitespace-delimited word in markdown emphasis
    /// markers. Nothing happens on an empty or trailing-whitespace buffer.
    pub fn format_last_word(&mut self, format: Format) {
        let trimmed_len = self.content.trim_end().len();
        if trimmed_len == 0 || trimmed_len != self.content.len() {
            return;
        }
        let start = self
            .content
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let marker = format.marker();
        self.content.insert_str(start, marker);
        self.content.push_str(marker);
    }

    /// Writes the notes to `CozySpace_Notes_<date>.txt` under `dir` and
    /// returns the path.
    pub fn export_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let name = format!("CozySpace_Notes_{}.txt", Local::now().format("%Y-%m-%d"));
        let path = dir.join(name);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn typing_and_backspace() {
        let mut notes = Notes::default();
        for c in "hi!".chars() {
            notes.push_char(c);
        }
        assert_eq!(notes.content(), "hi!");
        notes.backspace();
        assert_eq!(notes.content(), "hi");
        notes.backspace();
        notes.backspace();
        notes.backspace();
        assert_eq!(notes.content(), "");
    }

    #[test]
    fn word_count_tracks_content() {
        let mut notes = Notes::default();
        assert_eq!(notes.word_count(), 0);
        notes.set_content("three little words".into());
        assert_eq!(notes.word_count(), 3);
    }

    #[test]
    fn format_wraps_last_word() {
        let mut notes = Notes::default();
        notes.set_content("make this bold".into());
        notes.format_last_word(Format::Bold);
        assert_eq!(notes.content(), "make this **bold**");

        notes.set_content("single".into());
        notes.format_last_word(Format::Italic);
        assert_eq!(notes.content(), "*single*");
    }

    #[test]
    fn format_ignores_empty_or_dangling_whitespace() {
        let mut notes = Notes::default();
        notes.format_last_word(Format::Bold);
        assert_eq!(notes.content(), "");

        notes.set_content("mid sentence ".into());
        notes.format_last_word(Format::Bold);
        assert_eq!(notes.content(), "mid sentence ");
    }

    #[test]
    fn clear_empties_the_pad() {
        let mut notes = Notes::default();
        notes.set_content("scratch".into());
        notes.clear();
        assert!(notes.is_empty());
    }

    #[test]
    fn export_writes_a_dated_file() {
        let dir = tempdir().unwrap();
        let mut notes = Notes::default();
        notes.set_content("remember the milk".into());
        let path = notes.export_to(dir.path()).unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("CozySpace_Notes_"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "remember the milk");
    }

    #[test]
    fn serde_round_trip() {
        let mut notes = Notes::default();
        notes.set_content("a **bold** plan".into());
        let json = serde_json::to_string(&notes).unwrap();
        let back: Notes = serde_json::from_str(&json).unwrap();
        assert_eq!(notes, back);
    }
}
