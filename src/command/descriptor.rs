//! Argument descriptors
//!
//! A command declares its parameters once, in signature order, when it is
//! registered. Extraction splits the declaration into the ordered required
//! (positional) parameters and the defaulted (named) ones, so validation at
//! call time never has to look at the declaration again.

use indexmap::IndexMap;

use crate::core::error::DescriptorError;
use crate::core::value::{Value, ValueKind};

/// Name of the implicit first parameter every command receives
pub const SESSION_PARAMETER: &str = "session";

/// Leading positional slots filled by the terminal rather than the user.
/// They count towards arity but are never type-checked.
pub const INJECTED_SLOTS: usize = 1;

/// One parameter as written in a command declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterDecl {
    Required { name: String, kind: ValueKind },
    Defaulted {
        name: String,
        kind: ValueKind,
        default: Value,
    },
}

impl ParameterDecl {
    pub fn name(&self) -> &str {
        match self {
            Self::Required { name, .. } | Self::Defaulted { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Required { kind, .. } | Self::Defaulted { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionalDescriptor {
    pub name: String,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedDescriptor {
    pub kind: ValueKind,
    pub default: Value,
}

/// Extracted parameter shape of a command. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDescriptors {
    positional: Vec<PositionalDescriptor>,
    named: IndexMap<String, NamedDescriptor>,
}

impl ArgumentDescriptors {
    /// Required parameters in declaration order, session slot first
    pub fn positional(&self) -> &[PositionalDescriptor] {
        &self.positional
    }

    /// Required parameters the user types, i.e. without injected slots
    pub fn user_positional(&self) -> &[PositionalDescriptor] {
        self.positional.get(INJECTED_SLOTS..).unwrap_or(&[])
    }

    pub fn named(&self) -> &IndexMap<String, NamedDescriptor> {
        &self.named
    }

    pub fn required_count(&self) -> usize {
        self.positional.len()
    }
}

/// Split a declaration into descriptors. `params` excludes the session slot,
/// which is always prepended.
pub fn extract_descriptors(
    command: &str,
    params: &[ParameterDecl],
) -> Result<ArgumentDescriptors, DescriptorError> {
    let mut positional = vec![PositionalDescriptor {
        name: SESSION_PARAMETER.to_string(),
        kind: ValueKind::Session,
    }];
    let mut named = IndexMap::new();

    for param in params {
        let name = param.name();
        if name.trim().is_empty() {
            return Err(DescriptorError::EmptyName {
                command: command.to_string(),
            });
        }
        if name == SESSION_PARAMETER
            || positional.iter().any(|p| p.name == name)
            || named.contains_key(name)
        {
            return Err(DescriptorError::DuplicateParameter {
                command: command.to_string(),
                name: name.to_string(),
            });
        }
        if param.kind() == ValueKind::Session {
            return Err(DescriptorError::SessionParameter {
                command: command.to_string(),
            });
        }

        match param {
            ParameterDecl::Required { name, kind } => positional.push(PositionalDescriptor {
                name: name.clone(),
                kind: *kind,
            }),
            ParameterDecl::Defaulted {
                name,
                kind,
                default,
            } => {
                if !kind.accepts(default.kind()) {
                    return Err(DescriptorError::DefaultTypeMismatch {
                        command: command.to_string(),
                        name: name.clone(),
                        expected: *kind,
                        passed: default.kind(),
                    });
                }
                named.insert(
                    name.clone(),
                    NamedDescriptor {
                        kind: *kind,
                        default: default.clone(),
                    },
                );
            }
        }
    }

    Ok(ArgumentDescriptors { positional, named })
}
