use crate::command::{BoundArguments, Command, CommandOutput, CommandResult};
use crate::core::error::DescriptorError;
use crate::core::value::ValueKind;

pub fn login_command() -> Result<Command, DescriptorError> {
    Command::builder("login")
        .summary("log in to the portal")
        .positional("username", ValueKind::Str)
        .positional("password", ValueKind::Str)
        .build(login)
}

pub fn logout_command() -> Result<Command, DescriptorError> {
    Command::builder("logout")
        .summary("end the current session")
        .build(logout)
}

fn login(args: BoundArguments) -> CommandResult {
    let session = args.session()?;
    let username = args.str("username")?;
    session
        .borrow_mut()
        .login(username, args.str("password")?)?;
    Ok(CommandOutput::new(format!("logged in as {}", username)))
}

fn logout(args: BoundArguments) -> CommandResult {
    args.session()?.borrow_mut().logout()?;
    Ok(CommandOutput::new("logged out"))
}
