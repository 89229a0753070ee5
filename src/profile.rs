use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEMO_EMAIL: &str = "demo@cozyspace.com";
pub const DEMO_PASSWORD: &str = "demo123";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub bio: String,
    pub timezone: String,
}

impl Default for User {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            avatar: "👤".to_string(),
            bio: String::new(),
            timezone: "auto".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthError {
    EmptyCredentials,
    MissingFields,
    PasswordMismatch,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::EmptyCredentials => write!(f, "Please enter valid credentials"),
            AuthError::MissingFields => write!(f, "Please fill in all fields"),
            AuthError::PasswordMismatch => write!(f, "Passwords do not match"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Lightweight local login. There is no real verification: the demo
/// account gets a canned profile, any other non-empty pair is accepted
/// with the mailbox name as display name.
pub fn login(email: &str, password: &str) -> Result<User, AuthError> {
    let email = email.trim();
    if email == DEMO_EMAIL && password == DEMO_PASSWORD {
        return Ok(User {
            name: "Demo User".to_string(),
            email: DEMO_EMAIL.to_string(),
            bio: "Welcome to CozySpace!".to_string(),
            ..User::default()
        });
    }
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::EmptyCredentials);
    }
    Ok(User {
        name: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        ..User::default()
    })
}

pub fn register(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<User, AuthError> {
    if password != confirm_password {
        return Err(AuthError::PasswordMismatch);
    }
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok(User {
        name: name.to_string(),
        email: email.to_string(),
        ..User::default()
    })
}
