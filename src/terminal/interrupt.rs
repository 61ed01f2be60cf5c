//! Ctrl-C delivery outside the prompt
//!
//! While the line editor owns the terminal, Ctrl-C arrives as a key press and
//! stops the loop. During dispatch it arrives as SIGINT; the handler installed
//! here only raises a flag, which long-running portal calls poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::error::{CommandError, Result, TerminalError};

#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once the flag has been raised.
    pub fn check(&self) -> std::result::Result<(), CommandError> {
        if self.is_raised() {
            Err(CommandError::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Route SIGINT into this flag. Can only be done once per process.
    pub fn install_handler(&self) -> Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.raise())
            .map_err(|e| TerminalError::InterruptHandlerError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = InterruptFlag::new();
        let other = flag.clone();
        other.raise();
        assert_eq!(flag.check(), Err(CommandError::Interrupted));
        flag.clear();
        assert!(!other.is_raised());
    }
}
