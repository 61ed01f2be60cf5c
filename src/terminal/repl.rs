//! The read-parse-dispatch-report loop
//!
//! Every fault a command can raise is turned into one printed line and the
//! loop prompts again. Only Ctrl-C or end of input at the prompt, or the
//! `exit` command, stop it.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::command::{CommandOutput, CommandRegistry, LoopAction};
use crate::core::config::TerminalConfig;
use crate::core::error::{CommandError, ParseError, Result};
use crate::core::value::Value;
use crate::parsing::parse_command;
use crate::session::SessionHandle;
use crate::terminal::input::{LineReader, ReadOutcome};
use crate::terminal::interrupt::InterruptFlag;
use crate::terminal::prompt::{render_prompt, Palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingInput,
    Parsing,
    Dispatching,
    Stopped,
}

pub struct Terminal<R, W> {
    session: SessionHandle,
    registry: CommandRegistry,
    reader: R,
    out: W,
    palette: Palette,
    label: String,
    interrupt: InterruptFlag,
    state: LoopState,
}

impl<R: LineReader, W: Write> Terminal<R, W> {
    pub fn new(session: SessionHandle, registry: CommandRegistry, reader: R, out: W) -> Self {
        let defaults = TerminalConfig::default();
        Self {
            session,
            registry,
            reader,
            out,
            palette: Palette::new(defaults.enable_color),
            label: defaults.prompt_label,
            interrupt: InterruptFlag::new(),
            state: LoopState::AwaitingInput,
        }
    }

    pub fn with_config(mut self, config: &TerminalConfig) -> Self {
        self.palette = Palette::new(config.enable_color);
        self.label = config.prompt_label.clone();
        self
    }

    /// Share the flag the SIGINT handler raises
    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the loop stops. Errors here are I/O failures of the console
    /// itself, never command faults.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(commands = self.registry.len(), "terminal started");
        while self.state != LoopState::Stopped {
            self.step()?;
        }
        tracing::info!("terminal stopped");
        Ok(())
    }

    /// One iteration: prompt, read, and handle the line.
    pub fn step(&mut self) -> Result<()> {
        let prompt = render_prompt(&self.label, &self.session, self.palette);
        match self.reader.read_line(&prompt)? {
            ReadOutcome::Line(line) => self.handle_line(&line)?,
            ReadOutcome::Interrupted | ReadOutcome::Eof => {
                writeln!(self.out)?;
                self.state = LoopState::Stopped;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Parse and dispatch one line, printing whatever it produces.
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }

        self.state = LoopState::Parsing;
        let parsed = match parse_command(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.state = LoopState::AwaitingInput;
                writeln!(self.out, "{}", parse_error_line(&e))?;
                return Ok(());
            }
        };
        let Some((name, options, named)) = parsed.into_command() else {
            self.state = LoopState::AwaitingInput;
            return Ok(());
        };

        self.state = LoopState::Dispatching;
        let Some(command) = self.registry.get(&name) else {
            self.state = LoopState::AwaitingInput;
            writeln!(self.out, "no such command: {}", name)?;
            return Ok(());
        };

        let mut args = Vec::with_capacity(options.len() + 1);
        args.push(Value::Session(self.session.clone()));
        tracing::debug!(command = %name, options = options.len(), "dispatching");
        args.extend(options.into_iter().map(Value::Str));

        self.interrupt.clear();
        let result = command.run(args, named);
        self.state = LoopState::AwaitingInput;

        match result {
            Ok(output) => self.apply(output),
            Err(fault) => self.report(&fault),
        }
    }

    fn apply(&mut self, output: CommandOutput) -> Result<()> {
        if !output.message.is_empty() {
            writeln!(self.out, "{}", output.message)?;
        }

        match output.action {
            LoopAction::None => {}
            LoopAction::ClearScreen => {
                execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
            }
            LoopAction::ShowHelp(topic) => {
                let text = match topic {
                    None => self.registry.overview(),
                    Some(name) => self
                        .registry
                        .help_for(&name)
                        .unwrap_or_else(|| format!("no such command: {}", name)),
                };
                writeln!(self.out, "{}", text)?;
            }
            LoopAction::Exit => self.state = LoopState::Stopped,
        }
        Ok(())
    }

    fn report(&mut self, fault: &CommandError) -> Result<()> {
        if fault.is_validation_fault() {
            tracing::debug!(error = %fault, "arguments rejected");
        }
        match fault_line(fault) {
            Some(line) => writeln!(self.out, "{}", line)?,
            None => tracing::debug!("command cancelled"),
        }
        Ok(())
    }
}

/// Parse failure message followed by each sub-error
pub fn parse_error_line(error: &ParseError) -> String {
    std::iter::once(error.message.as_str())
        .chain(error.errors.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The single line printed for a fault; `None` for a cancelled command.
pub fn fault_line(fault: &CommandError) -> Option<String> {
    let line = match fault {
        CommandError::NotAuthorized { message_for_user } => message_for_user.clone(),
        CommandError::NotEnoughArguments { missing } => {
            format!("not enough options {} are missing", missing.join(", "))
        }
        CommandError::InvalidArgumentType {
            expected, passed, ..
        } => format!("invalid option type, expected {}, got {}", expected, passed),
        CommandError::TooManyArguments { .. } => "too many options".to_string(),
        CommandError::UnknownNamedArgument { name } => format!("unknown argument: {}", name),
        CommandError::InvalidNamedArgumentType {
            name,
            expected,
            passed,
        } => format!(
            "invalid argument type ({}), expected {}, got {}",
            name, expected, passed
        ),
        CommandError::Interrupted => return None,
        CommandError::UnboundParameter { .. } | CommandError::Portal(_) => {
            tracing::warn!(error = %fault, "command failed");
            format!("error: {}", fault)
        }
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ValueKind;

    #[test]
    fn test_fault_lines() {
        assert_eq!(
            fault_line(&CommandError::NotEnoughArguments {
                missing: vec!["username".into(), "password".into()]
            })
            .unwrap(),
            "not enough options username, password are missing"
        );
        assert_eq!(
            fault_line(&CommandError::InvalidNamedArgumentType {
                name: "limit".into(),
                expected: ValueKind::Int,
                passed: ValueKind::Str,
            })
            .unwrap(),
            "invalid argument type (limit), expected int, got str"
        );
        assert_eq!(fault_line(&CommandError::Interrupted), None);
    }

    #[test]
    fn test_validation_faults_classified() {
        let validation = [
            CommandError::NotEnoughArguments { missing: vec!["id".into()] },
            CommandError::TooManyArguments { unexpected: vec![Value::Int(1)] },
            CommandError::UnknownNamedArgument { name: "x".into() },
        ];
        for fault in &validation {
            assert!(fault.is_validation_fault());
            assert!(fault_line(fault).is_some());
        }

        let other = [
            CommandError::not_authorized("you are not logged in"),
            CommandError::Interrupted,
            CommandError::UnboundParameter { name: "id".into() },
        ];
        for fault in &other {
            assert!(!fault.is_validation_fault());
        }
        assert_eq!(
            fault_line(&CommandError::UnboundParameter { name: "id".into() }).unwrap(),
            "error: parameter id is not bound for this command"
        );
    }

    #[test]
    fn test_parse_error_line_joins_sub_errors() {
        let error = ParseError {
            message: "malformed command".into(),
            errors: vec!["a".into(), "b".into()],
        };
        assert_eq!(parse_error_line(&error), "malformed command a b");
    }
}
