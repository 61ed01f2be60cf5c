pub mod config;
pub mod error;
pub mod value;

pub use config::TerminalConfig;
pub use error::{CommandError, DescriptorError, ParseError, PortalError, Result, TerminalError};
pub use value::{Value, ValueKind};
