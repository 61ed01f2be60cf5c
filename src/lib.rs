//! Librus Terminal - interactive console for a school-portal account

pub mod command;
pub mod commands;
pub mod core;
pub mod parsing;
pub mod session;
pub mod terminal;
