//! Command registry: name -> command, fixed before the terminal starts

use indexmap::IndexMap;

use crate::command::command::Command;
use crate::core::error::DescriptorError;

/// Read-only lookup table of commands. Built once through `RegistryBuilder`.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Command>,
    /// alias -> canonical command name
    aliases: IndexMap<String, String>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a command by name or alias
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|canonical| self.commands.get(canonical))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical commands in registration order
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn aliases_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .filter(move |(_, canonical)| canonical.as_str() == name)
            .map(|(alias, _)| alias.as_str())
    }

    /// Number of names that resolve: commands plus aliases
    pub fn len(&self) -> usize {
        self.commands.len() + self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Usage and summary of one command, or `None` if it is not registered
    pub fn help_for(&self, name: &str) -> Option<String> {
        let command = self.get(name)?;
        let mut text = command.usage();
        let aliases: Vec<&str> = self.aliases_of(command.name()).collect();
        if !aliases.is_empty() {
            text.push_str(&format!("  (also: {})", aliases.join(", ")));
        }
        if !command.summary().is_empty() {
            text.push_str(&format!("\n    {}", command.summary()));
        }
        for (param, descriptor) in command.descriptors().named() {
            text.push_str(&format!(
                "\n    {}={} (default: {})",
                param, descriptor.kind, descriptor.default
            ));
        }
        Some(text)
    }

    /// Every command with its usage line
    pub fn overview(&self) -> String {
        let width = self
            .commands()
            .map(|c| c.usage().len())
            .max()
            .unwrap_or(0);

        let mut lines = vec!["Commands:".to_string()];
        for command in self.commands() {
            lines.push(format!(
                "  {:width$}  {}",
                command.usage(),
                command.summary(),
                width = width
            ));
        }
        lines.join("\n")
    }
}

/// Collects commands before the registry is frozen
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: CommandRegistry,
}

impl RegistryBuilder {
    /// Register a command under its own name
    pub fn command(mut self, command: Command) -> Result<Self, DescriptorError> {
        let name = command.name().to_string();
        self.ensure_free(&name)?;
        self.registry.commands.insert(name, command);
        Ok(self)
    }

    /// Make `alias` resolve to the already registered `target`
    pub fn alias(mut self, alias: &str, target: &str) -> Result<Self, DescriptorError> {
        self.ensure_free(alias)?;
        if !self.registry.commands.contains_key(target) {
            return Err(DescriptorError::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }
        self.registry
            .aliases
            .insert(alias.to_string(), target.to_string());
        Ok(self)
    }

    pub fn build(self) -> CommandRegistry {
        tracing::debug!(commands = self.registry.len(), "command registry built");
        self.registry
    }

    fn ensure_free(&self, name: &str) -> Result<(), DescriptorError> {
        if self.registry.contains(name) {
            return Err(DescriptorError::DuplicateCommand(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::output::CommandOutput;

    fn noop(name: &str) -> Command {
        Command::builder(name)
            .summary("does nothing")
            .build(|_| Ok(CommandOutput::silent()))
            .unwrap()
    }

    #[test]
    fn test_lookup_by_alias() {
        let registry = CommandRegistry::builder()
            .command(noop("clear"))
            .unwrap()
            .alias("cls", "clear")
            .unwrap()
            .build();

        assert_eq!(registry.get("cls").map(Command::name), Some("clear"));
        assert!(registry.get("frobnicate").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_len_and_is_empty_agree() {
        let empty = CommandRegistry::builder().build();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let one = CommandRegistry::builder().command(noop("exit")).unwrap().build();
        assert!(!one.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = CommandRegistry::builder()
            .command(noop("exit"))
            .unwrap()
            .command(noop("exit"))
            .unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateCommand("exit".into()));
    }

    #[test]
    fn test_alias_needs_target() {
        let err = CommandRegistry::builder()
            .alias("cls", "clear")
            .unwrap_err();
        assert!(matches!(err, DescriptorError::UnknownAliasTarget { .. }));
    }

    #[test]
    fn test_help_mentions_aliases() {
        let registry = CommandRegistry::builder()
            .command(noop("clear"))
            .unwrap()
            .alias("cls", "clear")
            .unwrap()
            .build();
        let help = registry.help_for("cls").unwrap();
        assert!(help.starts_with("clear"));
        assert!(help.contains("also: cls"));
    }
}
