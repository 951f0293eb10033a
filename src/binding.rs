//! Binding of context variables to values.
//!
//! [`bind`] turns a [`ContextTree`] into a [`BindingTable`]: one [`Binding`]
//! record per variable, plus one advanced-mode gate per non-empty group. The
//! table is built before any template is evaluated and never changes shape
//! afterwards. Values are resolved lazily, on first lookup, and memoized for
//! the lifetime of the table, so a prompt is shown at most once per render
//! and only if some template actually needs the answer.

use crate::context::{ContextTree, ContextValue, Variable};
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use indexmap::IndexMap;
use log::{debug, warn};
use minijinja::value::{Object, Value as TemplateValue};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

/// How variables get their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ask the user for every variable that is reached.
    Interactive,
    /// Never ask; every variable takes its default and every gate is closed.
    DefaultsOnly,
}

/// How a single binding produces its value once its gate (if any) is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Prompt,
    Default,
}

/// What a binding stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    /// The advanced-mode switch of the group sharing the binding's name.
    Gate,
    /// A variable, optionally hidden behind the gate of `group`.
    Variable {
        variable: Variable,
        group: Option<String>,
    },
}

/// One entry of the binding table.
#[derive(Debug)]
pub struct Binding {
    name: String,
    kind: BindingKind,
    strategy: Strategy,
    resolved: OnceLock<Value>,
}

impl Binding {
    fn new(name: &str, kind: BindingKind, strategy: Strategy) -> Self {
        Self { name: name.to_string(), kind, strategy, resolved: OnceLock::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &BindingKind {
        &self.kind
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Name of the gate this binding consults, if any.
    pub fn gate(&self) -> Option<&str> {
        match &self.kind {
            BindingKind::Variable { group, .. } => group.as_deref(),
            BindingKind::Gate => None,
        }
    }

    /// The value this binding falls back to without asking.
    pub fn default_value(&self) -> Value {
        match &self.kind {
            BindingKind::Gate => Value::Bool(false),
            BindingKind::Variable { variable, .. } => variable.default_value(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

struct Table {
    bindings: IndexMap<String, Binding>,
    prompter: Arc<dyn Prompter>,
    failure: Mutex<Option<Error>>,
}

/// The name-to-value environment templates are rendered against.
///
/// Cloning is cheap and clones share resolved values.
#[derive(Clone)]
pub struct BindingTable {
    inner: Arc<Table>,
}

/// Builds the binding table for `context`.
///
/// # Arguments
/// * `context` - The validated variable schema
/// * `mode` - Whether values are prompted for or taken from defaults
/// * `prompter` - Used for every question in interactive mode
///
/// # Returns
/// * `BindingTable` - One binding per variable and per non-empty group
pub fn bind(context: &ContextTree, mode: Mode, prompter: Arc<dyn Prompter>) -> BindingTable {
    let strategy = match mode {
        Mode::Interactive => Strategy::Prompt,
        Mode::DefaultsOnly => Strategy::Default,
    };

    let mut bindings = IndexMap::new();
    for (key, value) in context.iter() {
        match value {
            ContextValue::Group(children) => {
                if children.is_empty() {
                    debug!("Group '{key}' has no variables, skipping");
                    continue;
                }
                bindings.insert(key.clone(), Binding::new(key, BindingKind::Gate, strategy));
                for (child, variable) in children {
                    let kind = BindingKind::Variable {
                        variable: variable.clone(),
                        group: Some(key.clone()),
                    };
                    bindings.insert(child.clone(), Binding::new(child, kind, strategy));
                }
            }
            ContextValue::Variable(variable) => {
                let kind = BindingKind::Variable { variable: variable.clone(), group: None };
                bindings.insert(key.clone(), Binding::new(key, kind, strategy));
            }
        }
    }

    debug!("Bound {} variables in {:?} mode", bindings.len(), mode);
    BindingTable {
        inner: Arc::new(Table { bindings, prompter, failure: Mutex::new(None) }),
    }
}

impl BindingTable {
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.inner.bindings.get(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.inner.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.inner.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bindings.is_empty()
    }

    /// Resolves `name`, prompting at most once for it.
    ///
    /// # Errors
    /// * `Error::UnboundVariable` if the table has no such binding
    /// * `Error::PromptError` if the user aborts a prompt
    pub fn resolve(&self, name: &str) -> Result<Value> {
        let binding = self.get(name).ok_or_else(|| Error::UnboundVariable(name.to_string()))?;
        if let Some(value) = binding.resolved.get() {
            return Ok(value.clone());
        }
        let value = self.evaluate(binding)?;
        Ok(binding.resolved.get_or_init(|| value).clone())
    }

    /// Wraps the table into a template context resolving names on lookup.
    pub fn to_context(&self) -> TemplateValue {
        TemplateValue::from_object(self.clone())
    }

    /// Returns the first resolution error swallowed by a template lookup.
    pub fn take_failure(&self) -> Option<Error> {
        self.inner.failure.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    fn record_failure(&self, err: Error) {
        let mut failure = self.inner.failure.lock().unwrap_or_else(|e| e.into_inner());
        if failure.is_none() {
            *failure = Some(err);
        }
    }

    fn evaluate(&self, binding: &Binding) -> Result<Value> {
        match &binding.kind {
            BindingKind::Gate => match binding.strategy {
                Strategy::Default => Ok(Value::Bool(false)),
                Strategy::Prompt => {
                    let prompt = format!("Use advanced settings for \"{}\"", binding.name);
                    self.inner.prompter.confirm(&prompt, false).map(Value::Bool)
                }
            },
            BindingKind::Variable { variable, group } => {
                if let Some(group) = group {
                    if !self.gate_open(group)? {
                        return Ok(variable.default_value());
                    }
                }
                match binding.strategy {
                    Strategy::Prompt => ask(&*self.inner.prompter, &binding.name, variable),
                    Strategy::Default => Ok(variable.default_value()),
                }
            }
        }
    }

    fn gate_open(&self, group: &str) -> Result<bool> {
        Ok(self.resolve(group)?.as_bool().unwrap_or(false))
    }
}

impl fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inner.bindings.iter().map(|(name, b)| (name, &b.resolved)))
            .finish()
    }
}

impl Object for BindingTable {
    fn get_value(self: &Arc<Self>, key: &TemplateValue) -> Option<TemplateValue> {
        let name = key.as_str()?;
        self.get(name)?;
        match self.resolve(name) {
            Ok(value) => Some(TemplateValue::from_serialize(&value)),
            Err(err) => {
                self.record_failure(err);
                None
            }
        }
    }
}

/// How many answers a number prompt accepts before giving up.
const NUMBER_ATTEMPTS: usize = 3;

fn ask(prompter: &dyn Prompter, name: &str, variable: &Variable) -> Result<Value> {
    let prompt = format!("Please choose a value for \"{name}\"");
    match variable {
        Variable::List(choices) => {
            let labels: Vec<String> = choices.iter().map(label).collect();
            let index = prompter.select(&prompt, &labels, 0)?;
            choices.get(index).cloned().ok_or_else(|| {
                Error::PromptError(format!("choice {index} is out of range for '{name}'"))
            })
        }
        Variable::Scalar(Value::Bool(default)) => prompter.confirm(&prompt, *default).map(Value::Bool),
        Variable::Scalar(Value::Number(default)) => {
            for _ in 0..NUMBER_ATTEMPTS {
                let answer = prompter.input(&prompt, &default.to_string())?;
                match answer.trim().parse::<serde_json::Number>() {
                    Ok(number) => return Ok(Value::Number(number)),
                    Err(_) => warn!("'{answer}' is not a number, please try again"),
                }
            }
            Err(Error::PromptError(format!(
                "no valid number given for '{name}' after {NUMBER_ATTEMPTS} attempts"
            )))
        }
        Variable::Scalar(default) => prompter.input(&prompt, &label(default)).map(Value::String),
    }
}

fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
