use crate::command::{BoundArguments, Command, CommandOutput, CommandResult};
use crate::core::error::DescriptorError;
use crate::core::value::ValueKind;
use crate::session::Message;

const DEFAULT_LIMIT: i64 = 20;

pub fn get_messages_command() -> Result<Command, DescriptorError> {
    Command::builder("gmes")
        .summary("list inbox messages")
        .named("unread", ValueKind::Bool, false)
        .named("limit", ValueKind::Int, DEFAULT_LIMIT)
        .build(get_messages)
}

pub fn read_message_command() -> Result<Command, DescriptorError> {
    Command::builder("rmes")
        .summary("show one message and mark it read")
        .positional("message_id", ValueKind::Str)
        .build(read_message)
}

fn get_messages(args: BoundArguments) -> CommandResult {
    let unread_only = args.bool("unread")?;
    let limit = usize::try_from(args.int("limit")?).unwrap_or(0);

    let messages = args.session()?.borrow().messages()?;
    let lines: Vec<String> = messages
        .iter()
        .filter(|m| !unread_only || !m.read)
        .take(limit)
        .map(summary_line)
        .collect();

    if lines.is_empty() {
        return Ok(CommandOutput::new("no messages"));
    }
    Ok(CommandOutput::new(lines.join("\n")))
}

fn read_message(args: BoundArguments) -> CommandResult {
    let id = args.str("message_id")?;
    let message = args.session()?.borrow_mut().read_message(id)?;
    Ok(CommandOutput::new(format!(
        "From:    {}\nDate:    {}\nSubject: {}\n\n{}",
        message.sender, message.sent_at, message.subject, message.body
    )))
}

fn summary_line(message: &Message) -> String {
    let marker = if message.read { ' ' } else { '*' };
    format!(
        "{} [{}] {}  {}  {}",
        marker, message.id, message.sent_at, message.sender, message.subject
    )
}
