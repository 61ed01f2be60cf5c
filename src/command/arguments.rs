//! Validated arguments as seen by a command body

use indexmap::IndexMap;

use crate::command::descriptor::{ArgumentDescriptors, SESSION_PARAMETER};
use crate::core::error::CommandError;
use crate::core::value::Value;
use crate::session::SessionHandle;

/// Named arguments as produced by parsing, in input order
pub type NamedArgs = IndexMap<String, Value>;

/// Arguments bound to parameter names, with named defaults filled in.
///
/// Accessors return `UnboundParameter` for a name the command never declared
/// or for a value of a different type than requested; both are bugs in the
/// command body rather than user errors.
#[derive(Debug, Clone)]
pub struct BoundArguments {
    positional: Vec<(String, Value)>,
    named: IndexMap<String, Value>,
    supplied: Vec<String>,
}

impl BoundArguments {
    /// Bind already-validated values to `descriptors`.
    pub(crate) fn bind(descriptors: &ArgumentDescriptors, args: Vec<Value>, kwargs: NamedArgs) -> Self {
        let positional = descriptors
            .positional()
            .iter()
            .map(|d| d.name.clone())
            .zip(args)
            .collect();

        let supplied = kwargs.keys().cloned().collect();
        let mut named: IndexMap<String, Value> = descriptors
            .named()
            .iter()
            .map(|(name, d)| (name.clone(), d.default.clone()))
            .collect();
        named.extend(kwargs);

        Self {
            positional,
            named,
            supplied,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.positional
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .or_else(|| self.named.get(name))
    }

    /// The injected session handle
    pub fn session(&self) -> Result<SessionHandle, CommandError> {
        self.get(SESSION_PARAMETER)
            .and_then(Value::as_session)
            .cloned()
            .ok_or_else(|| unbound(SESSION_PARAMETER))
    }

    pub fn str(&self, name: &str) -> Result<&str, CommandError> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| unbound(name))
    }

    pub fn int(&self, name: &str) -> Result<i64, CommandError> {
        self.get(name)
            .and_then(Value::as_int)
            .ok_or_else(|| unbound(name))
    }

    pub fn bool(&self, name: &str) -> Result<bool, CommandError> {
        self.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| unbound(name))
    }

    /// Number of positional values passed, session included
    pub fn positional_count(&self) -> usize {
        self.positional.len()
    }

    /// Named arguments the user actually typed, in input order
    pub fn supplied_named(&self) -> &[String] {
        &self.supplied
    }
}

fn unbound(name: &str) -> CommandError {
    CommandError::UnboundParameter {
        name: name.to_string(),
    }
}
