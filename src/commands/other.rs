use crate::command::{BoundArguments, Command, CommandOutput, CommandResult, LoopAction};
use crate::core::error::DescriptorError;
use crate::core::value::ValueKind;

pub fn exit_command() -> Result<Command, DescriptorError> {
    Command::builder("exit")
        .summary("leave the terminal")
        .build(|_| Ok(CommandOutput::with_action(LoopAction::Exit)))
}

pub fn clear_command() -> Result<Command, DescriptorError> {
    Command::builder("clear")
        .summary("clear the screen")
        .build(|_| Ok(CommandOutput::with_action(LoopAction::ClearScreen)))
}

pub fn help_command() -> Result<Command, DescriptorError> {
    Command::builder("help")
        .summary("list commands, or describe one with command=<name>")
        .named("command", ValueKind::Str, "")
        .build(help)
}

pub fn absences_command() -> Result<Command, DescriptorError> {
    Command::builder("abs")
        .summary("list absences")
        .named("unexcused", ValueKind::Bool, false)
        .build(absences)
}

fn help(args: BoundArguments) -> CommandResult {
    let topic = args.str("command")?.trim();
    let topic = (!topic.is_empty()).then(|| topic.to_string());
    Ok(CommandOutput::with_action(LoopAction::ShowHelp(topic)))
}

fn absences(args: BoundArguments) -> CommandResult {
    let unexcused_only = args.bool("unexcused")?;
    let absences = args.session()?.borrow().absences()?;

    let lines: Vec<String> = absences
        .iter()
        .filter(|a| !unexcused_only || !a.excused)
        .map(|a| {
            format!(
                "{}  lesson {}  {}{}",
                a.date,
                a.lesson,
                a.subject,
                if a.excused { "  (excused)" } else { "" }
            )
        })
        .collect();

    if lines.is_empty() {
        return Ok(CommandOutput::new("no absences"));
    }
    Ok(CommandOutput::new(lines.join("\n")))
}
