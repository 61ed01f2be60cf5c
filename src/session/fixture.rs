//! Offline portal backed by a TOML fixture
//!
//! Used for the demo binary and for tests. Each `[[accounts]]` table holds the
//! credentials and the inbox, grades and absences of one student.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{PortalError, Result, TerminalError};
use crate::session::portal::{Absence, AuthToken, Grade, Message, Portal};

/// Demo data compiled into the binary
pub const DEMO_FIXTURE: &str = include_str!("../../data/demo_portal.toml");

#[derive(Debug, Clone, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    accounts: Vec<FixtureAccount>,
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureAccount {
    username: String,
    password: String,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    grades: Vec<Grade>,
    #[serde(default)]
    absences: Vec<Absence>,
}

/// In-memory portal loaded from TOML
#[derive(Debug)]
pub struct FixturePortal {
    accounts: Vec<FixtureAccount>,
    /// token -> index into `accounts`
    sessions: HashMap<AuthToken, usize>,
    next_token: u64,
}

impl FixturePortal {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FixtureFile = toml::from_str(content)
            .map_err(|e| TerminalError::FixtureError(format!("Invalid TOML: {}", e)))?;

        let mut seen = std::collections::HashSet::new();
        for account in &file.accounts {
            if !seen.insert(account.username.as_str()) {
                return Err(TerminalError::FixtureError(format!(
                    "account {} defined twice",
                    account.username
                )));
            }
        }

        Ok(Self {
            accounts: file.accounts,
            sessions: HashMap::new(),
            next_token: 1,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TerminalError::FixtureError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn demo() -> Result<Self> {
        Self::from_toml_str(DEMO_FIXTURE)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn account(&self, token: &AuthToken) -> std::result::Result<&FixtureAccount, PortalError> {
        self.sessions
            .get(token)
            .and_then(|&idx| self.accounts.get(idx))
            .ok_or_else(|| PortalError::Unavailable("session rejected by portal".into()))
    }
}

impl Portal for FixturePortal {
    fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> std::result::Result<AuthToken, PortalError> {
        let idx = self
            .accounts
            .iter()
            .position(|a| a.username == username && a.password == password)
            .ok_or(PortalError::InvalidCredentials)?;

        let token = AuthToken(format!("{}-{}", username, self.next_token));
        self.next_token += 1;
        self.sessions.insert(token.clone(), idx);
        Ok(token)
    }

    fn logout(&mut self, token: &AuthToken) -> std::result::Result<(), PortalError> {
        self.sessions.remove(token);
        Ok(())
    }

    fn messages(&self, token: &AuthToken) -> std::result::Result<Vec<Message>, PortalError> {
        Ok(self.account(token)?.messages.clone())
    }

    fn read_message(
        &mut self,
        token: &AuthToken,
        id: &str,
    ) -> std::result::Result<Message, PortalError> {
        let idx = *self
            .sessions
            .get(token)
            .ok_or_else(|| PortalError::Unavailable("session rejected by portal".into()))?;
        let account = self
            .accounts
            .get_mut(idx)
            .ok_or_else(|| PortalError::Unavailable("account vanished".into()))?;

        let message = account
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PortalError::NotFound {
                what: format!("message {}", id),
            })?;
        message.read = true;
        Ok(message.clone())
    }

    fn grades(&self, token: &AuthToken) -> std::result::Result<Vec<Grade>, PortalError> {
        Ok(self.account(token)?.grades.clone())
    }

    fn absences(&self, token: &AuthToken) -> std::result::Result<Vec<Absence>, PortalError> {
        Ok(self.account(token)?.absences.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
[[accounts]]
username = "anna"
password = "secret"

[[accounts.messages]]
id = "7"
sender = "Wychowawca"
subject = "Wycieczka"
sent_at = "2024-05-02 08:15"
body = "Zbiórka o 7:30."
"#;

    #[test]
    fn test_demo_fixture_parses() {
        let portal = FixturePortal::demo().unwrap();
        assert!(portal.account_count() > 0);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let mut portal = FixturePortal::from_toml_str(FIXTURE).unwrap();
        assert_eq!(
            portal.login("anna", "nope"),
            Err(PortalError::InvalidCredentials)
        );
    }

    #[test]
    fn test_read_message_marks_read() {
        let mut portal = FixturePortal::from_toml_str(FIXTURE).unwrap();
        let token = portal.login("anna", "secret").unwrap();

        assert!(!portal.messages(&token).unwrap()[0].read);
        let message = portal.read_message(&token, "7").unwrap();
        assert_eq!(message.subject, "Wycieczka");
        assert!(portal.messages(&token).unwrap()[0].read);
    }

    #[test]
    fn test_logout_invalidates_token() {
        let mut portal = FixturePortal::from_toml_str(FIXTURE).unwrap();
        let token = portal.login("anna", "secret").unwrap();
        portal.logout(&token).unwrap();
        assert!(portal.grades(&token).is_err());
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let doubled = format!("{FIXTURE}\n{FIXTURE}");
        assert!(FixturePortal::from_toml_str(&doubled).is_err());
    }
}
