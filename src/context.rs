//! Context handling for Stencil templates.
//! This module loads the variable schema shipped with a template and turns
//! the loosely typed document into a [`ContextTree`] whose shape has been
//! checked once, up front.

use crate::constants::CONTEXT_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

/// A single variable: a scalar default or a list of choices.
#[derive(Debug, Clone, PartialEq)]
pub enum Variable {
    /// A string, number or boolean default.
    Scalar(Value),
    /// A non-empty list of scalar choices; the first one is the default.
    List(Vec<Value>),
}

impl Variable {
    /// Returns the value used when the variable is not prompted for.
    ///
    /// For a list this is its first element, never the whole list.
    pub fn default_value(&self) -> Value {
        match self {
            Variable::Scalar(value) => value.clone(),
            // Lists are never empty once parsed.
            Variable::List(choices) => choices.first().cloned().unwrap_or(Value::Null),
        }
    }

    fn from_json(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(Variable::Scalar(value)),
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(Error::ContextError(format!(
                        "'{name}' is an empty list, a list needs at least one choice"
                    )));
                }
                if let Some(bad) = items.iter().find(|item| !is_scalar(item)) {
                    return Err(Error::ContextError(format!(
                        "'{name}' contains the non-scalar choice {bad}"
                    )));
                }
                Ok(Variable::List(items))
            }
            Value::Null => Err(Error::ContextError(format!("'{name}' has no default value"))),
            Value::Object(_) => Err(Error::ContextError(format!(
                "'{name}' is nested too deeply, groups may only contain plain variables"
            ))),
        }
    }
}

/// A top-level entry of the context.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// A variable exposed directly.
    Variable(Variable),
    /// Variables only prompted for once the user opts into advanced mode.
    Group(IndexMap<String, Variable>),
}

/// The variable schema of a template, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextTree {
    entries: IndexMap<String, ContextValue>,
}

impl ContextTree {
    /// Builds a tree from an already parsed JSON document.
    ///
    /// # Errors
    /// * `Error::ContextError` if the document is not an object, a value
    ///   matches none of the supported shapes, groups nest deeper than one
    ///   level, or two variables share a name.
    pub fn from_json(document: Value) -> Result<Self> {
        let object = match document {
            Value::Object(object) => object,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(Error::ContextError(format!(
                    "expected a mapping of variable names, found {other}"
                )))
            }
        };

        let mut entries = IndexMap::new();
        let mut seen = HashSet::new();

        for (key, value) in object {
            let entry = match value {
                Value::Object(children) => {
                    let mut group = IndexMap::new();
                    for (child, child_value) in children {
                        claim_name(&mut seen, &child)?;
                        let variable = Variable::from_json(&child, child_value)?;
                        group.insert(child, variable);
                    }
                    ContextValue::Group(group)
                }
                other => ContextValue::Variable(Variable::from_json(&key, other)?),
            };
            claim_name(&mut seen, &key)?;
            entries.insert(key, entry);
        }

        Ok(Self { entries })
    }

    /// Parses context file contents, trying JSON first and YAML second.
    pub fn parse(content: &str) -> Result<Self> {
        let document: Value = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(_) => serde_yaml::from_str(content)
                .map_err(|e| Error::ContextError(format!("Invalid context format: {e}")))?,
        };
        Self::from_json(document)
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContextValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn claim_name(seen: &mut HashSet<String>, name: &str) -> Result<()> {
    if !seen.insert(name.to_string()) {
        return Err(Error::ContextError(format!("variable '{name}' is declared more than once")));
    }
    Ok(())
}

/// Loads the context from a template directory, trying multiple file formats.
/// Supports: project.json, project.yml, project.yaml
///
/// # Arguments
/// * `template_root` - Directory containing the context file
///
/// # Returns
/// * `Result<ContextTree>` - The parsed context, empty when no file exists
///
/// # Errors
/// * `Error::PathError` if the file exists but cannot be read
/// * `Error::ContextError` if the file is malformed
pub fn load_context<P: AsRef<Path>>(template_root: P) -> Result<ContextTree> {
    for file in CONTEXT_FILES {
        let context_path = template_root.as_ref().join(file);
        if context_path.exists() {
            debug!("Loading context from {}", context_path.display());
            let content = std::fs::read_to_string(&context_path)
                .map_err(|e| Error::path("read", &context_path, e))?;
            return ContextTree::parse(&content);
        }
    }

    debug!("No context file found (tried: {}), using an empty context", CONTEXT_FILES.join(", "));
    Ok(ContextTree::default())
}
