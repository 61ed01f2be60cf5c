use thiserror::Error;

use crate::core::value::{Value, ValueKind};

/// Process-level failures: the only errors that can end the terminal.
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Fixture error: {0}")]
    FixtureError(String),

    #[error("Readline error: {0}")]
    ReadlineError(String),

    #[error("Interrupt handler error: {0}")]
    InterruptHandlerError(String),

    #[error("Invalid command declaration: {0}")]
    Descriptor(#[from] DescriptorError),
}

pub type Result<T> = std::result::Result<T, TerminalError>;

/// Faults raised while running a single command. Every variant is recoverable:
/// the terminal prints one line for it and prompts again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("not authorized: {message_for_user}")]
    NotAuthorized { message_for_user: String },

    #[error("not enough arguments, missing: {}", .missing.join(", "))]
    NotEnoughArguments { missing: Vec<String> },

    #[error("too many arguments ({} unexpected)", .unexpected.len())]
    TooManyArguments { unexpected: Vec<Value> },

    #[error("argument {index} ({name}) has invalid type, expected {expected}, got {passed}")]
    InvalidArgumentType {
        index: usize,
        name: String,
        expected: ValueKind,
        passed: ValueKind,
    },

    #[error("unknown keyword argument: {name}")]
    UnknownNamedArgument { name: String },

    #[error("keyword argument {name} has invalid type, expected {expected}, got {passed}")]
    InvalidNamedArgumentType {
        name: String,
        expected: ValueKind,
        passed: ValueKind,
    },

    #[error("command interrupted")]
    Interrupted,

    #[error("parameter {name} is not bound for this command")]
    UnboundParameter { name: String },

    #[error(transparent)]
    Portal(#[from] PortalError),
}

impl CommandError {
    pub fn not_authorized(message_for_user: impl Into<String>) -> Self {
        Self::NotAuthorized {
            message_for_user: message_for_user.into(),
        }
    }

    /// True for the deterministic faults produced by argument validation.
    pub fn is_validation_fault(&self) -> bool {
        matches!(
            self,
            Self::NotEnoughArguments { .. }
                | Self::TooManyArguments { .. }
                | Self::InvalidArgumentType { .. }
                | Self::UnknownNamedArgument { .. }
                | Self::InvalidNamedArgumentType { .. }
        )
    }
}

/// A malformed input line. `errors` carries every problem found, not just the first.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub errors: Vec<String>,
}

/// Failures reported by the remote portal backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortalError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("portal unavailable: {0}")]
    Unavailable(String),
}

/// Developer-time errors in a command declaration, caught when the registry is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("command {command}: parameter name must not be empty")]
    EmptyName { command: String },

    #[error("command {command}: parameter {name} declared twice")]
    DuplicateParameter { command: String, name: String },

    #[error("command {command}: default for {name} is {passed}, declared {expected}")]
    DefaultTypeMismatch {
        command: String,
        name: String,
        expected: ValueKind,
        passed: ValueKind,
    },

    #[error("command {command}: only the injected session slot may be of kind session")]
    SessionParameter { command: String },

    #[error("command name {0:?} registered twice")]
    DuplicateCommand(String),

    #[error("alias {alias:?} points at unregistered command {target:?}")]
    UnknownAliasTarget { alias: String, target: String },
}
