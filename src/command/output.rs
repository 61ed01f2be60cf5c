/// What the terminal should do after printing a command's message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoopAction {
    #[default]
    None,
    ClearScreen,
    /// Render help for one command, or the overview when `None`
    ShowHelp(Option<String>),
    Exit,
}

/// Result of a successful command body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub message: String,
    pub action: LoopAction,
}

impl CommandOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: LoopAction::None,
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_action(action: LoopAction) -> Self {
        Self {
            message: String::new(),
            action,
        }
    }
}
