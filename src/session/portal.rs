//! The remote school-portal backend, seen from the terminal.

use serde::Deserialize;

use crate::core::error::PortalError;

/// Opaque credential returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(pub String);

/// A message in the portal inbox
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub subject: String,
    pub sent_at: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
}

/// A single grade entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Grade {
    pub subject: String,
    pub value: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub category: String,
    pub date: String,
}

fn default_weight() -> u32 {
    1
}

/// A single missed lesson
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Absence {
    pub date: String,
    pub lesson: u32,
    pub subject: String,
    #[serde(default)]
    pub excused: bool,
}

/// Request/response surface of the portal. Implementations own whatever
/// transport they use; the terminal only sees these calls.
pub trait Portal {
    fn login(&mut self, username: &str, password: &str) -> Result<AuthToken, PortalError>;

    fn logout(&mut self, token: &AuthToken) -> Result<(), PortalError>;

    fn messages(&self, token: &AuthToken) -> Result<Vec<Message>, PortalError>;

    /// Fetch one message and mark it read
    fn read_message(&mut self, token: &AuthToken, id: &str) -> Result<Message, PortalError>;

    fn grades(&self, token: &AuthToken) -> Result<Vec<Grade>, PortalError>;

    fn absences(&self, token: &AuthToken) -> Result<Vec<Absence>, PortalError>;
}
