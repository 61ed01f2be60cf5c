//! Turns a raw input line into a command name, positional options and
//! named arguments.

pub mod parser;

pub use parser::{parse_command, ParsedLine};
