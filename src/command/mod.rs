//! Command registration and validation
//!
//! Each command declares its parameters once at registration; `Command::run`
//! checks typed-in arguments against that declaration before calling the body:
//! raw line -> parsing -> registry lookup -> `Command::run` -> `CommandOutput`

pub mod arguments;
#[allow(clippy::module_inception)]
pub mod command;
pub mod descriptor;
pub mod output;
pub mod registry;

pub use arguments::{BoundArguments, NamedArgs};
pub use command::{Command, CommandBuilder, CommandResult};
pub use descriptor::{ArgumentDescriptors, NamedDescriptor, PositionalDescriptor};
pub use output::{CommandOutput, LoopAction};
pub use registry::{CommandRegistry, RegistryBuilder};
