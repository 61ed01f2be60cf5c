//! Built-in commands of the portal terminal

pub mod authorization;
pub mod grades;
pub mod messages;
pub mod other;

use crate::command::CommandRegistry;
use crate::core::error::DescriptorError;

/// The registry the binary runs with
pub fn default_registry() -> Result<CommandRegistry, DescriptorError> {
    Ok(CommandRegistry::builder()
        .command(messages::get_messages_command()?)?
        .command(other::exit_command()?)?
        .command(other::clear_command()?)?
        .alias("cls", "clear")?
        .command(authorization::login_command()?)?
        .command(authorization::logout_command()?)?
        .command(messages::read_message_command()?)?
        .command(other::help_command()?)?
        .command(other::absences_command()?)?
        .command(grades::grades_command()?)?
        .build())
}
