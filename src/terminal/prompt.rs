//! Prompt and color styling

use crossterm::style::{Color, Stylize};

use crate::core::error::CommandError;
use crate::session::SessionHandle;

/// Applies ANSI colors, or passes text through when colors are off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enable_color: bool,
}

impl Palette {
    pub const fn new(enable_color: bool) -> Self {
        Self { enable_color }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if !self.enable_color {
            return text.to_string();
        }
        format!("{}", text.with(color))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Whether the prompt should show the session as logged in.
///
/// Only `NotAuthorized` is an expected answer; anything else is logged and
/// shown as logged out rather than breaking the prompt.
pub fn session_is_valid(session: &SessionHandle) -> bool {
    match session.check_if_expired() {
        Ok(()) => true,
        Err(CommandError::NotAuthorized { .. }) => false,
        Err(other) => {
            tracing::warn!(error = %other, "unexpected fault while checking session");
            false
        }
    }
}

/// `[Librus (logged in)] >> `
pub fn render_prompt(label: &str, session: &SessionHandle, palette: Palette) -> String {
    let (state, color) = if session_is_valid(session) {
        ("logged in", Color::Blue)
    } else {
        ("not logged in", Color::Red)
    };

    format!(
        "{}{}{}",
        palette.paint(&format!("[{} (", label), Color::Green),
        palette.paint(state, color),
        palette.paint(")] >> ", Color::Green)
    )
}
