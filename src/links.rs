use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub created_at: DateTime<Local>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    EmptyField,
    InvalidUrl,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::EmptyField => write!(f, "Please enter both title and URL"),
            LinkError::InvalidUrl => write!(f, "Please enter a valid URL"),
        }
    }
}

impl std::error::Error for LinkError {}

/// Bookmark collection. Newest entries sit at the front.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkBoard {
    links: Vec<Link>,
    next_id: u64,
}

impl LinkBoard {
    pub fn add(&mut self, title: &str, url: &str) -> Result<u64, LinkError> {
        let title = title.trim();
        let url = url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(LinkError::EmptyField);
        }
        if !is_valid_url(url) {
            return Err(LinkError::InvalidUrl);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.links.insert(
            0,
            Link {
                id,
                title: title.to_string(),
                url: url.to_string(),
                icon: icon_for(&domain_of(url)).to_string(),
                created_at: Local::now(),
            },
        );
        Ok(id)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        self.links.len() != before
    }

    pub fn get(&self, id: u64) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }
}

/// Form-level URL check: an http(s) scheme followed by a non-empty host.
pub fn is_valid_url(url: &str) -> bool {
    let rest = match url.strip_prefix("https://").or(url.strip_prefix("http://")) {
        Some(rest) => rest,
        None => return false,
    };
    let host = rest.split('/').next().unwrap_or("");
    !host.is_empty() && !host.contains(char::is_whitespace)
}

/// Hostname without scheme, leading `www.` or path, for display.
pub fn domain_of(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or(url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = rest.split('/').next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host).to_lowercase()
}

pub fn icon_for(domain: &str) -> &'static str {
    match domain {
        "github.com" => "🐙",
        "youtube.com" => "📺",
        "google.com" => "🔍",
        "twitter.com" => "🐦",
        "facebook.com" => "📘",
        "linkedin.com" => "💼",
        "instagram.com" => "📷",
        "reddit.com" => "🤖",
        "stackoverflow.com" => "💻",
        "medium.com" => "📝",
        "gmail.com" => "📧",
        _ => "🔗",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn add_inserts_at_front_with_icon() {
        let mut board = LinkBoard::default();
        board.add("Rust", "https://www.rust-lang.org/learn").unwrap();
        board.add("GitHub", "https://github.com/rust-lang").unwrap();
        assert_eq!(board.links()[0].title, "GitHub");
        assert_eq!(board.links()[0].icon, "🐙");
        assert_eq!(board.links()[1].icon, "🔗");
    }

    #[test]
    fn validation_errors() {
        let mut board = LinkBoard::default();
        assert_matches!(board.add("", "https://a.io"), Err(LinkError::EmptyField));
        assert_matches!(board.add("a", "   "), Err(LinkError::EmptyField));
        assert_matches!(board.add("a", "ftp://a.io"), Err(LinkError::InvalidUrl));
        assert_matches!(board.add("a", "not a url"), Err(LinkError::InvalidUrl));
        assert_matches!(board.add("a", "https://"), Err(LinkError::InvalidUrl));
        assert!(board.is_empty());
    }

    #[test]
    fn remove_by_id() {
        let mut board = LinkBoard::default();
        let id = board.add("Docs", "https://docs.rs").unwrap();
        assert!(board.remove(id));
        assert!(!board.remove(id));
        assert!(board.is_empty());
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://www.github.com/foo/bar"), "github.com");
        assert_eq!(domain_of("http://Example.COM"), "example.com");
        assert_eq!(domain_of("https://docs.rs"), "docs.rs");
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://github.com"));
        assert!(is_valid_url("http://a.io/path?q=1"));
        assert!(!is_valid_url("github.com"));
        assert!(!is_valid_url("https:// spaced.com"));
        assert!(!is_valid_url("https:///nohost"));
    }

    #[test]
    fn serde_round_trip() {
        let mut board = LinkBoard::default();
        board.add("HN", "https://news.ycombinator.com").unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: LinkBoard = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
