//! A registered command: its descriptors plus the body that runs it

use std::fmt;
use std::rc::Rc;

use crate::command::arguments::{BoundArguments, NamedArgs};
use crate::command::descriptor::{
    extract_descriptors, ArgumentDescriptors, ParameterDecl, INJECTED_SLOTS,
};
use crate::command::output::CommandOutput;
use crate::core::error::{CommandError, DescriptorError};
use crate::core::value::{Value, ValueKind};

pub type CommandResult = Result<CommandOutput, CommandError>;

type Handler = Rc<dyn Fn(BoundArguments) -> CommandResult>;

/// One invocable unit. Descriptors are extracted in `CommandBuilder::build`
/// and never change afterwards.
#[derive(Clone)]
pub struct Command {
    name: String,
    summary: String,
    descriptors: ArgumentDescriptors,
    handler: Handler,
}

impl Command {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            summary: String::new(),
            params: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn descriptors(&self) -> &ArgumentDescriptors {
        &self.descriptors
    }

    /// Check arity, then the type of each positional value in order.
    ///
    /// `args` includes the injected session, which is counted but not
    /// type-checked.
    pub fn validate_positional(&self, args: &[Value]) -> Result<(), CommandError> {
        let expected = self.descriptors.positional();

        if args.len() < expected.len() {
            return Err(CommandError::NotEnoughArguments {
                missing: expected[args.len()..]
                    .iter()
                    .map(|d| d.name.clone())
                    .collect(),
            });
        }

        if args.len() > expected.len() {
            return Err(CommandError::TooManyArguments {
                unexpected: args[expected.len()..].to_vec(),
            });
        }

        for (index, (arg, descriptor)) in args
            .iter()
            .zip(expected)
            .enumerate()
            .skip(INJECTED_SLOTS)
        {
            if !descriptor.kind.accepts(arg.kind()) {
                return Err(CommandError::InvalidArgumentType {
                    index,
                    name: descriptor.name.clone(),
                    expected: descriptor.kind,
                    passed: arg.kind(),
                });
            }
        }

        Ok(())
    }

    /// Check that every supplied key is a declared named parameter with a
    /// value of the declared type. Missing keys fall back to their defaults.
    pub fn validate_named(&self, kwargs: &NamedArgs) -> Result<(), CommandError> {
        for (name, value) in kwargs {
            let Some(descriptor) = self.descriptors.named().get(name) else {
                return Err(CommandError::UnknownNamedArgument { name: name.clone() });
            };

            if !descriptor.kind.accepts(value.kind()) {
                return Err(CommandError::InvalidNamedArgumentType {
                    name: name.clone(),
                    expected: descriptor.kind,
                    passed: value.kind(),
                });
            }
        }

        Ok(())
    }

    /// Validate positional arguments, then named ones, and only then call the
    /// body. Whatever the body returns is passed through untouched.
    pub fn run(&self, args: Vec<Value>, kwargs: NamedArgs) -> CommandResult {
        self.validate_positional(&args)?;
        self.validate_named(&kwargs)?;

        let bound = BoundArguments::bind(&self.descriptors, args, kwargs);
        (self.handler)(bound)
    }

    /// One-line usage, e.g. `rmes <message_id>` or `gmes [unread=bool] [limit=int]`
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for param in self.descriptors.user_positional() {
            usage.push_str(&format!(" <{}>", param.name));
        }
        for (name, descriptor) in self.descriptors.named() {
            usage.push_str(&format!(" [{}={}]", name, descriptor.kind));
        }
        usage
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

/// Declares a command's parameters in signature order.
///
/// ```
/// use librus_terminal::command::{Command, CommandOutput};
/// use librus_terminal::core::ValueKind;
///
/// let cmd = Command::builder("rmes")
///     .summary("read a message")
///     .positional("message_id", ValueKind::Str)
///     .build(|args| Ok(CommandOutput::new(args.str("message_id")?)))
///     .unwrap();
/// assert_eq!(cmd.usage(), "rmes <message_id>");
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    name: String,
    summary: String,
    params: Vec<ParameterDecl>,
}

impl CommandBuilder {
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Add a required parameter, matched by position
    pub fn positional(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.params.push(ParameterDecl::Required {
            name: name.into(),
            kind,
        });
        self
    }

    /// Add an optional parameter, matched by name
    pub fn named(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        default: impl Into<Value>,
    ) -> Self {
        self.params.push(ParameterDecl::Defaulted {
            name: name.into(),
            kind,
            default: default.into(),
        });
        self
    }

    /// Extract descriptors and attach the body.
    pub fn build<F>(self, handler: F) -> Result<Command, DescriptorError>
    where
        F: Fn(BoundArguments) -> CommandResult + 'static,
    {
        let descriptors = extract_descriptors(&self.name, &self.params)?;
        Ok(Command {
            name: self.name,
            summary: self.summary,
            descriptors,
            handler: Rc::new(handler),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::output::LoopAction;
    use std::cell::Cell;

    fn read_message() -> Command {
        Command::builder("rmes")
            .positional("message_id", ValueKind::Str)
            .positional("page", ValueKind::Int)
            .named("raw", ValueKind::Bool, false)
            .build(|args| Ok(CommandOutput::new(args.str("message_id")?)))
            .unwrap()
    }

    fn session_stub() -> Value {
        // The session slot is never type-checked, so any value stands in for it.
        Value::Str("session".into())
    }

    #[test]
    fn test_too_few_lists_missing_trailing_names() {
        let cmd = read_message();
        let err = cmd.validate_positional(&[session_stub()]).unwrap_err();
        assert_eq!(
            err,
            CommandError::NotEnoughArguments {
                missing: vec!["message_id".into(), "page".into()]
            }
        );
    }

    #[test]
    fn test_too_many_reports_extra_values() {
        let cmd = read_message();
        let err = cmd
            .validate_positional(&[session_stub(), "1".into(), Value::Int(2), "x".into()])
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::TooManyArguments {
                unexpected: vec!["x".into()]
            }
        );
    }

    #[test]
    fn test_first_bad_type_wins() {
        let cmd = read_message();
        let err = cmd
            .validate_positional(&[session_stub(), Value::Int(1), "two".into()])
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidArgumentType {
                index: 1,
                name: "message_id".into(),
                expected: ValueKind::Str,
                passed: ValueKind::Int,
            }
        );
    }

    #[test]
    fn test_bool_accepted_for_int_positional() {
        let cmd = read_message();
        assert!(cmd
            .validate_positional(&[session_stub(), "1".into(), Value::Bool(true)])
            .is_ok());
    }

    #[test]
    fn test_unknown_named_rejected_regardless_of_value() {
        let cmd = read_message();
        let mut kwargs = NamedArgs::new();
        kwargs.insert("verbose".into(), Value::Bool(false));
        assert_eq!(
            cmd.validate_named(&kwargs),
            Err(CommandError::UnknownNamedArgument {
                name: "verbose".into()
            })
        );
    }

    #[test]
    fn test_named_type_mismatch() {
        let cmd = read_message();
        let mut kwargs = NamedArgs::new();
        kwargs.insert("raw".into(), Value::Int(1));
        assert_eq!(
            cmd.validate_named(&kwargs),
            Err(CommandError::InvalidNamedArgumentType {
                name: "raw".into(),
                expected: ValueKind::Bool,
                passed: ValueKind::Int,
            })
        );
    }

    #[test]
    fn test_positional_fault_takes_priority() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let cmd = Command::builder("x")
            .positional("id", ValueKind::Str)
            .build(move |_| {
                counter.set(counter.get() + 1);
                Ok(CommandOutput::silent())
            })
            .unwrap();

        let mut kwargs = NamedArgs::new();
        kwargs.insert("nope".into(), Value::Int(1));
        let err = cmd.run(vec![session_stub()], kwargs).unwrap_err();

        assert!(matches!(err, CommandError::NotEnoughArguments { .. }));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_defaults_filled_when_not_supplied() {
        let cmd = Command::builder("gmes")
            .named("limit", ValueKind::Int, 20_i64)
            .named("unread", ValueKind::Bool, false)
            .build(|args| {
                assert_eq!(args.supplied_named(), ["unread".to_string()]);
                Ok(CommandOutput::new(format!(
                    "{} {}",
                    args.int("limit")?,
                    args.bool("unread")?
                )))
            })
            .unwrap();

        let mut kwargs = NamedArgs::new();
        kwargs.insert("unread".into(), Value::Bool(true));
        let output = cmd.run(vec![session_stub()], kwargs).unwrap();
        assert_eq!(output.message, "20 true");
    }

    #[test]
    fn test_body_result_passes_through() {
        let cmd = Command::builder("exit")
            .build(|_| Ok(CommandOutput::with_action(LoopAction::Exit)))
            .unwrap();
        let output = cmd.run(vec![session_stub()], NamedArgs::new()).unwrap();
        assert_eq!(output.action, LoopAction::Exit);

        let failing = Command::builder("fail")
            .build(|_| Err(CommandError::not_authorized("log in first")))
            .unwrap();
        assert_eq!(
            failing.run(vec![session_stub()], NamedArgs::new()),
            Err(CommandError::not_authorized("log in first"))
        );
    }

    #[test]
    fn test_usage_lists_user_parameters() {
        assert_eq!(read_message().usage(), "rmes <message_id> <page> [raw=bool]");
    }
}
