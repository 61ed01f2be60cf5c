//! Authenticated session against the portal

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::core::error::CommandError;
use crate::session::portal::{Absence, AuthToken, Grade, Message, Portal};
use crate::terminal::interrupt::InterruptFlag;

const NOT_LOGGED_IN: &str = "you are not logged in";
const SESSION_EXPIRED: &str = "your session has expired, log in again";

struct ActiveLogin {
    token: AuthToken,
    username: String,
    /// `None` when the lifetime reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

/// The user's session: the portal backend plus the current login, if any.
pub struct Session {
    portal: Box<dyn Portal>,
    login: Option<ActiveLogin>,
    lifetime: Duration,
    interrupt: InterruptFlag,
}

impl Session {
    pub fn new(portal: Box<dyn Portal>, lifetime: Duration) -> Self {
        Self {
            portal,
            login: None,
            lifetime,
            interrupt: InterruptFlag::new(),
        }
    }

    /// Share the terminal's interrupt flag so portal calls can be cancelled.
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Fails with `NotAuthorized` when nobody is logged in or the login expired.
    pub fn check_if_expired(&self) -> Result<(), CommandError> {
        match &self.login {
            None => Err(CommandError::not_authorized(NOT_LOGGED_IN)),
            Some(ActiveLogin {
                expires_at: Some(expires_at),
                ..
            }) if Instant::now() >= *expires_at => {
                Err(CommandError::not_authorized(SESSION_EXPIRED))
            }
            Some(_) => Ok(()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.check_if_expired().is_ok()
    }

    pub fn username(&self) -> Option<&str> {
        self.login.as_ref().map(|l| l.username.as_str())
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<(), CommandError> {
        self.interrupt.check()?;
        let token = self.portal.login(username, password)?;
        self.interrupt.check()?;

        tracing::info!(username, "logged in");
        self.login = Some(ActiveLogin {
            token,
            username: username.to_string(),
            expires_at: Instant::now().checked_add(self.lifetime),
        });
        Ok(())
    }

    /// Ends the login. An expired login is dropped locally and still reported
    /// as not authorized.
    pub fn logout(&mut self) -> Result<(), CommandError> {
        if let Err(e) = self.check_if_expired() {
            self.login = None;
            return Err(e);
        }
        let Some(login) = self.login.take() else {
            return Err(CommandError::not_authorized(NOT_LOGGED_IN));
        };
        self.portal.logout(&login.token)?;
        tracing::info!(username = %login.username, "logged out");
        Ok(())
    }

    pub fn messages(&self) -> Result<Vec<Message>, CommandError> {
        let token = self.active_token()?;
        self.interrupt.check()?;
        let messages = self.portal.messages(token)?;
        self.interrupt.check()?;
        Ok(messages)
    }

    pub fn read_message(&mut self, id: &str) -> Result<Message, CommandError> {
        let token = self.active_token()?.clone();
        self.interrupt.check()?;
        let message = self.portal.read_message(&token, id)?;
        self.interrupt.check()?;
        Ok(message)
    }

    pub fn grades(&self) -> Result<Vec<Grade>, CommandError> {
        let token = self.active_token()?;
        self.interrupt.check()?;
        let grades = self.portal.grades(token)?;
        self.interrupt.check()?;
        Ok(grades)
    }

    pub fn absences(&self) -> Result<Vec<Absence>, CommandError> {
        let token = self.active_token()?;
        self.interrupt.check()?;
        let absences = self.portal.absences(token)?;
        self.interrupt.check()?;
        Ok(absences)
    }

    fn active_token(&self) -> Result<&AuthToken, CommandError> {
        self.check_if_expired()?;
        self.login
            .as_ref()
            .map(|l| &l.token)
            .ok_or_else(|| CommandError::not_authorized(NOT_LOGGED_IN))
    }
}

/// Shared reference to the session, injected as the first argument of every
/// command. The terminal is single-threaded, so `Rc<RefCell<_>>` is enough.
#[derive(Clone)]
pub struct SessionHandle(Rc<RefCell<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Rc::new(RefCell::new(session)))
    }

    pub fn borrow(&self) -> Ref<'_, Session> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Session> {
        self.0.borrow_mut()
    }

    pub fn check_if_expired(&self) -> Result<(), CommandError> {
        self.0.borrow().check_if_expired()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0.borrow();
        f.debug_struct("SessionHandle")
            .field("username", &session.username())
            .finish()
    }
}
